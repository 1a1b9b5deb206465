//! SQL statement generation
//!
//! [`SqlGenerator`] turns a frozen [`Table`] and a stream of rows into the
//! text of the output script: a header comment, one `CREATE TABLE IF NOT
//! EXISTS` statement, and a sequence of `BEGIN; INSERT ...; COMMIT;`
//! blocks holding at most `batch_size` rows each.
//!
//! The generator moves through its states strictly in order:
//!
//! ```text
//! WritingHeader -> WritingSchema -> StreamingBatches -> FlushFinalBatch -> Done
//! ```
//!
//! Each step returns the text it produced so the caller can stream it to
//! disk without holding the whole script in memory.

use std::fmt;

use tracing::{debug, info};

use crate::dialect::Dialect;
use crate::error::{ConvertError, ConvertResult};
use crate::escape::escape_for_column;
use crate::table::Table;

/// Name of the synthetic primary key column
pub const PRIMARY_KEY_COLUMN: &str = "id";

/// Upper bound on the tuple buffer reserved up front
const MAX_PREALLOCATED_ROWS: usize = 1024;

/// Generation step the generator is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    WritingHeader,
    WritingSchema,
    StreamingBatches,
    FlushFinalBatch,
    Done,
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationState::WritingHeader => "writing header",
            GenerationState::WritingSchema => "writing schema",
            GenerationState::StreamingBatches => "streaming batches",
            GenerationState::FlushFinalBatch => "flushing final batch",
            GenerationState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Streaming generator for one table
pub struct SqlGenerator<'a> {
    table: &'a Table,
    dialect: Dialect,
    batch_size: usize,
    state: GenerationState,
    /// Escaped tuples of the batch being filled
    batch: Vec<String>,
    /// `INSERT INTO <table> (<columns>) VALUES`, computed once
    insert_prefix: String,
    record_count: usize,
    skipped_count: usize,
    batch_count: usize,
}

impl<'a> SqlGenerator<'a> {
    /// Create a generator for a table
    ///
    /// # Arguments
    /// * `table` - Table with frozen column types
    /// * `dialect` - Target dialect
    /// * `batch_size` - Maximum number of rows per INSERT block
    ///
    /// # Returns
    /// * `Ok(SqlGenerator)` - Generator in the `WritingHeader` state
    /// * `Err(ConvertError::InvalidBatchSize)` - If `batch_size` is zero
    pub fn new(table: &'a Table, dialect: Dialect, batch_size: usize) -> ConvertResult<Self> {
        if batch_size == 0 {
            return Err(ConvertError::InvalidBatchSize(batch_size));
        }

        let column_list = table
            .columns()
            .iter()
            .map(|column| dialect.quote_ident(&column.name))
            .collect::<Vec<_>>()
            .join(", ");
        let insert_prefix = format!(
            "INSERT INTO {} ({}) VALUES",
            dialect.quote_ident(table.name()),
            column_list
        );

        Ok(SqlGenerator {
            table,
            dialect,
            batch_size,
            state: GenerationState::WritingHeader,
            batch: Vec::with_capacity(batch_size.min(MAX_PREALLOCATED_ROWS)),
            insert_prefix,
            record_count: 0,
            skipped_count: 0,
            batch_count: 0,
        })
    }

    /// Current state
    pub fn state(&self) -> GenerationState {
        self.state
    }

    fn expect_state(&self, expected: GenerationState, step: &str) -> ConvertResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ConvertError::GeneratorState(format!(
                "{step} called while {}, expected {expected}",
                self.state
            )))
        }
    }

    /// Comment block naming the source and the dialect
    pub fn header_comment(&mut self, source_name: &str) -> ConvertResult<String> {
        self.expect_state(GenerationState::WritingHeader, "header_comment")?;
        self.state = GenerationState::WritingSchema;
        Ok(format!(
            "-- Generated from {source_name}\n-- Dialect: {}\n\n",
            self.dialect
        ))
    }

    /// The `CREATE TABLE IF NOT EXISTS` statement
    ///
    /// The synthetic primary key comes first. A source column literally
    /// named `id` is left out of the definition so it does not collide with
    /// it; its values are still inserted.
    pub fn schema_statement(&mut self) -> ConvertResult<String> {
        self.expect_state(GenerationState::WritingSchema, "schema_statement")?;

        let mut definitions = vec![self.dialect.primary_key_definition()];
        definitions.extend(
            self.table
                .columns()
                .iter()
                .filter(|column| column.name != PRIMARY_KEY_COLUMN)
                .map(|column| {
                    format!(
                        "{} {}",
                        self.dialect.quote_ident(&column.name),
                        self.dialect.sql_type_name(column.semantic_type)
                    )
                }),
        );

        let body = definitions
            .iter()
            .map(|definition| format!("  {definition}"))
            .collect::<Vec<_>>()
            .join(",\n");

        self.state = GenerationState::StreamingBatches;
        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n);\n\n",
            self.dialect.quote_ident(self.table.name()),
            body
        ))
    }

    /// Add one data row
    ///
    /// Rows whose field count differs from the column count are skipped and
    /// not counted. When the batch reaches `batch_size` rows the finished
    /// block is returned and a new batch starts.
    pub fn push_row<S: AsRef<str>>(&mut self, row: &[S]) -> ConvertResult<Option<String>> {
        self.expect_state(GenerationState::StreamingBatches, "push_row")?;

        if row.len() != self.table.column_count() {
            self.skipped_count += 1;
            debug!(
                expected = self.table.column_count(),
                found = row.len(),
                "skipping malformed row"
            );
            return Ok(None);
        }

        let values = row
            .iter()
            .zip(self.table.columns())
            .map(|(field, column)| escape_for_column(field.as_ref(), column.semantic_type, self.dialect))
            .collect::<Vec<_>>()
            .join(", ");
        self.batch.push(format!("({values})"));
        self.record_count += 1;

        if self.batch.len() >= self.batch_size {
            Ok(Some(self.flush_batch()))
        } else {
            Ok(None)
        }
    }

    /// Flush the final partial batch and finish
    ///
    /// Returns `None` when the last batch is empty, including when the
    /// stream had no valid rows at all.
    pub fn finish(&mut self) -> ConvertResult<Option<String>> {
        self.expect_state(GenerationState::StreamingBatches, "finish")?;
        self.state = GenerationState::FlushFinalBatch;

        let block = if self.batch.is_empty() {
            None
        } else {
            Some(self.flush_batch())
        };

        self.state = GenerationState::Done;
        info!(
            table = self.table.name(),
            records = self.record_count,
            batches = self.batch_count,
            skipped = self.skipped_count,
            "finished generating inserts"
        );
        Ok(block)
    }

    fn flush_batch(&mut self) -> String {
        let tuples = self.batch.join(",\n");
        self.batch.clear();
        self.batch_count += 1;
        debug!(batch = self.batch_count, "flushing insert batch");
        format!("BEGIN;\n{}\n{};\nCOMMIT;\n\n", self.insert_prefix, tuples)
    }

    /// Rows emitted so far
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Malformed rows skipped so far
    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    /// INSERT blocks emitted so far
    pub fn batch_count(&self) -> usize {
        self.batch_count
    }
}
