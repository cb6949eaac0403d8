pub mod rows;
pub mod sql;

pub use sql::{InsertRow, SqlValue, TableWrite, write_inserts, write_table_sql};
