use anyhow::{Context, Result};
use rusqlite::{params_from_iter, Connection, Transaction};
use std::path::Path;
use tracing::info;

use super::rows::{table_rows, Row};
use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use crate::schema::TableSchema;
use crate::snapshot::Snapshot;
use crate::ui::{Phase, Ui};

const BATCH_SIZE: usize = 1000;

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    pub fn new(db_path: &Path) -> Result<Self> {
        // Remove existing database if present
        if db_path.exists() {
            std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        }

        let conn = Connection::open(db_path).context("Failed to create database")?;

        // Snapshot rows may reference codes missing from the reference
        // tables, so constraints are declared but not enforced
        conn.execute_batch(
            "PRAGMA foreign_keys = OFF;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self { conn })
    }

    /// Create all tables for the given schemas
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        for schema in schemas {
            let sql = generate_create_table(schema);
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }

        info!(tables = schemas.len(), "Created tables");
        Ok(())
    }

    /// Insert one table's rows inside a single transaction
    pub fn import_table(&mut self, schema: &TableSchema, rows: &[Row], ui: &mut impl Ui) -> Result<u64> {
        let insert_sql = generate_insert(schema);
        let total = rows.len() as u64;

        let tx = self.conn.transaction()?;
        let mut count: u64 = 0;

        for batch in rows.chunks(BATCH_SIZE) {
            insert_batch(&tx, &insert_sql, batch)
                .with_context(|| format!("Failed to insert into {}", schema.name))?;
            count += batch.len() as u64;
            ui.set_progress(count, total, schema.name);
        }

        tx.commit()?;
        ui.log(format!("{}: {} records", schema.name, count));

        Ok(count)
    }

    /// Finalize the database
    pub fn finalize(self) -> Result<()> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        Ok(())
    }
}

/// Insert a batch of rows into the database
fn insert_batch(tx: &Transaction, sql: &str, batch: &[Row]) -> Result<()> {
    let mut stmt = tx.prepare_cached(sql)?;

    for row in batch {
        stmt.execute(params_from_iter(row.iter()))?;
    }

    Ok(())
}

/// Write the loaded snapshot to a fresh SQLite database. Returns the number
/// of rows written.
pub fn export_snapshot(
    snapshot: &Snapshot,
    output_db: &Path,
    tables: &[&TableSchema],
    ui: &mut impl Ui,
) -> Result<u64> {
    ui.set_phase(Phase::Exporting);
    let mut writer = SqliteWriter::new(output_db)?;

    writer.create_tables(tables)?;

    let mut total_records: u64 = 0;
    for schema in tables {
        let rows = table_rows(snapshot, schema.name);
        total_records += writer.import_table(schema, &rows, ui)?;
    }

    writer.finalize()?;
    ui.set_phase(Phase::Complete);

    info!(path = %output_db.display(), records = total_records, "Exported snapshot");
    Ok(total_records)
}
