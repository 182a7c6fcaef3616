// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Table parsing with encoding fallback, and table serialization

mod csv_parser;
mod csv_writer;

pub use csv_parser::CsvParser;
pub use csv_writer::write_table;
