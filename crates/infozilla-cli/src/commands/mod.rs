//! Command implementations.

pub mod extract;

pub use self::extract::{
    execute_extract, extract_all, process_file, resolve_charset, write_outputs, FileReport,
};
