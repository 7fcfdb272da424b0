// ABOUTME: Delimited grid reading module
// ABOUTME: Exports the row reader, its options, the field quoting model and the tabular wrapper

pub mod error;
pub mod field;
pub mod options;
pub mod reader;
pub mod tabular;

pub use error::{CsvError, Result};
pub use field::{write_row, Field};
pub use options::ReaderOptions;
pub use reader::CsvReader;
pub use tabular::{LongLineOption, ShortLineOption, TabularOptions, TabularReader};
