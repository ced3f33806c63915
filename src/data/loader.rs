//! Transaction Loader Module
//! Reads the transaction log with Polars and coerces it into the working table.

use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Column names of the working table, in source order.
pub const TIME: &str = "Time";
pub const ACTION: &str = "Action";
pub const FROM: &str = "From";
pub const TO: &str = "To";
pub const AMOUNT: &str = "Amount";
pub const VALUE: &str = "Value";

pub const COLUMNS: [&str; 6] = [TIME, ACTION, FROM, TO, AMOUNT, VALUE];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("'{}' not found. Please update the file path.", .0.display())]
    DataSourceNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Loads the transaction log and keeps the working table around.
pub struct TransactionLoader {
    df: Option<DataFrame>,
    dropped_rows: usize,
}

impl Default for TransactionLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            dropped_rows: 0,
        }
    }

    /// Load a transaction CSV file.
    ///
    /// Only the six transaction columns are kept. `Value` and `Time` are parsed
    /// as numbers and rows where either fails are dropped; `Time` becomes a
    /// millisecond datetime interpreted as seconds since the Unix epoch.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let path = file_path.as_ref();
        self.df = None;
        self.dropped_rows = 0;

        match File::open(path).and_then(|f| f.metadata()) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                error!(path = %path.display(), "transaction source is not a file");
                return Err(LoaderError::DataSourceNotFound(path.to_path_buf()));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "transaction source unavailable");
                return Err(LoaderError::DataSourceNotFound(path.to_path_buf()));
            }
        }

        // Every column is read as text so that a stray token in one row
        // cannot fail type inference for the whole file.
        let raw = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_dtype_overwrite(Some(Arc::new(Self::text_schema())))
            .finish()?
            .select(COLUMNS.map(col))
            .collect()?;

        self.install(raw)?;
        info!(
            path = %path.display(),
            rows = self.get_row_count(),
            dropped = self.dropped_rows,
            "transactions loaded"
        );
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Coerce a raw six-column frame and make it the working table.
    pub fn install(&mut self, raw: DataFrame) -> Result<&DataFrame, LoaderError> {
        let total = raw.height();
        let df = Self::coerce(raw.lazy()).collect()?;
        self.dropped_rows = total - df.height();
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    fn text_schema() -> Schema {
        let mut schema = Schema::with_capacity(COLUMNS.len());
        for name in COLUMNS {
            schema.with_column(name.into(), DataType::String);
        }
        schema
    }

    fn coerce(frame: LazyFrame) -> LazyFrame {
        let seconds = col(TIME).cast(DataType::Float64);
        let millis = (seconds * lit(1000.0)).cast(DataType::Int64);

        frame
            .with_columns([
                millis
                    .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                    .alias(TIME),
                col(VALUE).cast(DataType::Float64),
            ])
            .filter(
                col(VALUE)
                    .is_not_null()
                    .and(col(VALUE).is_not_nan())
                    .and(col(TIME).is_not_null()),
            )
    }

    /// Get the number of rows in the working table.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Rows discarded by the last load for a non-numeric `Value` or `Time`.
    pub fn get_dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Get a reference to the working table.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }
}
