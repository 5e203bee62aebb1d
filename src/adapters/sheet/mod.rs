//! Spreadsheet adapter. Implements SheetPort for course import/export.

pub mod csv_sheet;

pub use csv_sheet::{CsvSheet, csv_to_records, records_to_csv};
