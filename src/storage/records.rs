use rusqlite::params;

use super::db::{Database, DatabaseError};
use super::models::Record;
use crate::category::Category;

impl Database {
    // ========================================================================
    // Record operations
    // ========================================================================

    /// Insert one record into the category's table.
    ///
    /// Values are bound positionally; the table name comes from the
    /// `Category` enum, never from request input. Missing fields bind as
    /// NULL and fail the table's NOT NULL constraints, so an insert either
    /// fully succeeds or writes nothing.
    pub fn insert_record(
        &self,
        category: Category,
        title: Option<&str>,
        definition: Option<&str>,
        attachment: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn()?;

        if category.accepts_attachment() {
            let sql = format!(
                "INSERT INTO {} (title, definition, attachment) VALUES (?1, ?2, ?3)",
                category.table()
            );
            conn.execute(&sql, params![title, definition, attachment])?;
        } else {
            let sql = format!(
                "INSERT INTO {} (title, definition) VALUES (?1, ?2)",
                category.table()
            );
            conn.execute(&sql, params![title, definition])?;
        }

        Ok(())
    }

    /// Fetch every record in the category's table, unfiltered and unordered.
    pub fn list_records(&self, category: Category) -> Result<Vec<Record>, DatabaseError> {
        let conn = self.conn()?;
        let mut records = Vec::new();

        if category.accepts_attachment() {
            let sql = format!(
                "SELECT id, title, definition, attachment FROM {}",
                category.table()
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok(Record {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    definition: row.get(2)?,
                    attachment: row.get(3)?,
                })
            })?;
            for row in rows {
                records.push(row?);
            }
        } else {
            let sql = format!("SELECT id, title, definition FROM {}", category.table());
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok(Record {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    definition: row.get(2)?,
                    attachment: None,
                })
            })?;
            for row in rows {
                records.push(row?);
            }
        }

        Ok(records)
    }
}
