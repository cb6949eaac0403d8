use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::GenerationError;

/// Pre-formatted value of one SQL column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Fixed two-decimal amount stored in cents.
    Money(i64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    pub fn text(value: impl Into<String>) -> Self {
        SqlValue::Text(value.into())
    }

    pub fn optional<T>(value: Option<T>, wrap: impl FnOnce(T) -> SqlValue) -> Self {
        value.map(wrap).unwrap_or(SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(value) => write!(f, "{value}"),
            SqlValue::Int(value) => write!(f, "{value}"),
            SqlValue::Money(cents) => {
                let sign = if *cents < 0 { "-" } else { "" };
                let cents = cents.unsigned_abs();
                write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
            }
            SqlValue::Text(value) => write_quoted(f, value),
            SqlValue::Date(value) => write_quoted(f, &value.format("%Y-%m-%d").to_string()),
            SqlValue::Time(value) => write_quoted(f, &value.format("%H:%M").to_string()),
            SqlValue::Timestamp(value) => {
                write_quoted(f, &value.format("%Y-%m-%d %H:%M").to_string())
            }
        }
    }
}

// Doubles embedded quotes only; values are generated, not user input.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("'")?;
    f.write_str(&value.replace('\'', "''"))?;
    f.write_str("'")
}

/// A row that knows its destination table and column order.
pub trait InsertRow {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Column values in [`InsertRow::COLUMNS`] order.
    fn values(&self) -> Vec<SqlValue>;
}

/// Totals for one written artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableWrite {
    pub rows: u64,
    pub statements: u64,
    pub bytes: u64,
}

/// Writes `rows` as bulk INSERT statements of at most `batch_size` tuples,
/// preserving row order. Returns the number of statements written.
pub fn write_inserts<W: Write, R: InsertRow>(
    out: &mut W,
    rows: &[R],
    batch_size: usize,
) -> std::io::Result<u64> {
    let header = format!(
        "INSERT INTO {} ({}) VALUES\n",
        R::TABLE,
        R::COLUMNS.join(", ")
    );
    let mut statements = 0_u64;

    for batch in rows.chunks(batch_size.max(1)) {
        out.write_all(header.as_bytes())?;
        for (index, row) in batch.iter().enumerate() {
            if index > 0 {
                out.write_all(b",\n")?;
            }
            let values: Vec<String> = row.values().iter().map(ToString::to_string).collect();
            write!(out, "({})", values.join(", "))?;
        }
        out.write_all(b";\n\n")?;
        statements += 1;
    }

    Ok(statements)
}

/// Writes one transactional SQL artifact for a table.
pub fn write_table_sql<R: InsertRow>(
    path: &Path,
    rows: &[R],
    batch_size: usize,
) -> Result<TableWrite, GenerationError> {
    let write = || -> std::io::Result<(u64, u64)> {
        let file = BufWriter::new(File::create(path)?);
        let mut out = CountingWriter::new(file);
        write!(out, "-- {}\nBEGIN;\n\n", R::TABLE)?;
        let statements = write_inserts(&mut out, rows, batch_size)?;
        out.write_all(b"COMMIT;\n")?;
        out.flush()?;
        Ok((statements, out.bytes_written()))
    };

    let (statements, bytes) = write().map_err(GenerationError::destination(path))?;
    Ok(TableWrite {
        rows: rows.len() as u64,
        statements,
        bytes,
    })
}

pub(crate) struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
