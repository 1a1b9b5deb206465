//! Table model for csv2sql
//!
//! A [`Table`] is built once per conversion from the header row and the
//! sampled prefix of data rows. Column types are frozen at construction;
//! the row stream that follows never changes them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{ConvertError, ConvertResult};
use crate::inference::{infer_semantic, SemanticType};
use crate::normalize::normalize_identifier;

/// One column of the target table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header cell exactly as it appeared in the source
    pub raw_header: String,
    /// Normalized identifier used in the generated SQL
    pub name: String,
    /// Inferred semantic type
    pub semantic_type: SemanticType,
    /// Dialect rendering of `semantic_type`
    pub sql_type: &'static str,
}

/// Target table: normalized name plus ordered columns
///
/// The synthetic `id` primary key is added by the generator and is not
/// part of `columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Build a table from the header row and a bounded sample of data rows
    ///
    /// Header cells are normalized; a cell that normalizes to nothing is
    /// named `column_<n>` after its 1-based position. Sample rows of any
    /// length are used: each column takes the value at its index when the
    /// row has one. Duplicate names are kept as they are.
    ///
    /// # Arguments
    /// * `table_name` - Table name, normalized here
    /// * `headers` - Header row cells
    /// * `sample` - Bounded prefix of data rows
    /// * `dialect` - Dialect used to render the inferred types
    ///
    /// # Returns
    /// * `Ok(Table)` - The table with frozen column types
    /// * `Err(ConvertError::EmptyTableName)` - If the name normalizes to nothing
    pub fn from_sample<H: AsRef<str>>(
        table_name: &str,
        headers: &[H],
        sample: &[Vec<String>],
        dialect: Dialect,
    ) -> ConvertResult<Self> {
        let name = normalize_identifier(table_name);
        if name.is_empty() {
            return Err(ConvertError::EmptyTableName(table_name.to_string()));
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let raw_header = header.as_ref().to_string();
                let mut column_name = normalize_identifier(&raw_header);
                if column_name.is_empty() {
                    column_name = format!("column_{}", idx + 1);
                }

                let values = sample
                    .iter()
                    .filter_map(|row| row.get(idx).map(String::as_str));
                let semantic_type = infer_semantic(values);
                let sql_type = dialect.sql_type_name(semantic_type);
                debug!(column = %column_name, %semantic_type, sql_type, "inferred column type");

                Column {
                    raw_header,
                    name: column_name,
                    semantic_type,
                    sql_type,
                }
            })
            .collect();

        Ok(Table { name, columns })
    }

    /// Normalized table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in source order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of source columns; a valid data row has exactly this many fields
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column name to SQL type name, for reporting
    pub fn type_map(&self) -> BTreeMap<String, &'static str> {
        self.columns
            .iter()
            .map(|column| (column.name.clone(), column.sql_type))
            .collect()
    }
}
