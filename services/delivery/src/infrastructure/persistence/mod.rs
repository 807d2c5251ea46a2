//! Persistence implementations

mod migrations;
mod rows;
mod sqlite;

pub use migrations::{delivery_migrations, volume_readings_migration, VOLUME_READINGS_MIGRATION_VERSION};
pub use sqlite::SqliteVolumeLedger;
