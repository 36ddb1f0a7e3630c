pub mod env;
pub mod extractor;
pub mod file;
