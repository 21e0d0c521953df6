//! Core traits shared by the domain models.

use chrono::{DateTime, Utc};

/// Primary key type for all persisted entities.
pub type Id = i64;

/// Trait for entities that have a primary key.
pub trait Identifiable {
    fn id(&self) -> Option<Id>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }

    fn is_new_record(&self) -> bool {
        !self.is_persisted()
    }
}

/// Trait for entities with created_at / updated_at timestamps.
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Trait for entities that belong to a project.
pub trait ProjectScoped {
    fn project_id(&self) -> Id;
}

/// Base trait for all domain entities.
pub trait Entity: Identifiable + Timestamped + Send + Sync {
    /// The database table name
    const TABLE_NAME: &'static str;

    /// Human-readable type name for error messages
    const TYPE_NAME: &'static str;
}
