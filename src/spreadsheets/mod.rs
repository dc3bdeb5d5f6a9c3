pub mod export_csv;

#[cfg(test)]
pub use export_csv::read_properties_csv;
pub use export_csv::{write_properties_csv, write_rows_csv};
