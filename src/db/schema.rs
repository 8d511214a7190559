//! Schema introspection queries for the task database.

use super::Database;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Information about a table column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

impl Database {
    /// Get column information for a table, in declaration order.
    ///
    /// Returns an empty list when the table does not exist.
    pub fn table_columns(&self, table_name: &str) -> Result<Vec<ColumnInfo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM pragma_table_info(?1)")?;

            let columns: Vec<ColumnInfo> = stmt
                .query_map([table_name], |row| {
                    Ok(ColumnInfo {
                        name: row.get(1)?,
                        data_type: row.get::<_, String>(2)?.to_uppercase(),
                        nullable: row.get::<_, i32>(3)? == 0,
                        default_value: row.get(4)?,
                        primary_key: row.get::<_, i32>(5)? > 0,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(columns)
        })
    }
}
