use tagsplit_core::ClientEmitter;
use tagsplit_core::error::ParseError;
use tagsplit_core::parse::spec::SwaggerDocument;
use thiserror::Error;

use crate::emitters;

#[derive(Debug, Error)]
pub enum TypeScriptError {
    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),

    #[error("invalid operation {method} {path}: {source}")]
    Operation {
        method: String,
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("unresolved parameter reference: {0}")]
    UnresolvedParameter(String),
}

/// Configuration for the TypeScript emitter.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptConfig {
    pub no_jsdoc: bool,
}

/// Emits one TypeScript client class per tag-scoped document.
#[derive(Debug, Clone, Default)]
pub struct TypeScriptEmitter {
    pub config: TypeScriptConfig,
}

impl TypeScriptEmitter {
    pub fn new(config: TypeScriptConfig) -> Self {
        Self { config }
    }
}

impl ClientEmitter for TypeScriptEmitter {
    type Error = TypeScriptError;

    fn file_extension(&self) -> &str {
        "ts"
    }

    fn emit(&self, class_name: &str, spec: &SwaggerDocument) -> Result<String, Self::Error> {
        emitters::client::emit_client(class_name, spec, self.config.no_jsdoc)
    }
}
