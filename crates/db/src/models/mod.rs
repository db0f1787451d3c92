//! Storage records.
//!
//! Records are plain data. Table and column names live next to each record
//! as constants; the repositories do all translation to and from SQL.

pub mod example;
