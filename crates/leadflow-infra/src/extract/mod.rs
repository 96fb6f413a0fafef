//! Chat extractor implementations.

pub mod json_file;

pub use json_file::JsonFileExtractor;
