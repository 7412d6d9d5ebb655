pub mod rows;
pub mod schema_gen;
pub mod sqlite;

pub use sqlite::{export_snapshot, SqliteWriter};
