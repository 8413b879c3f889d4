pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod parse;
pub mod partition;
pub mod pipeline;
pub mod transform;

use parse::spec::SwaggerDocument;

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Trait for emitters that render one client from a tag-scoped document.
pub trait ClientEmitter {
    type Error: std::error::Error;

    /// Extension of emitted files, without the leading dot.
    fn file_extension(&self) -> &str;

    fn emit(&self, class_name: &str, spec: &SwaggerDocument) -> Result<String, Self::Error>;
}
