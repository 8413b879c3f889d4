use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported Swagger version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid specification: {0}")]
    InvalidSpecification(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("invalid specification: {0}")]
    InvalidSpecification(String),

    #[error("tags `{first}` and `{second}` both map to client `{class_name}`")]
    AmbiguousTagCollision {
        class_name: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("failed to prepare checkout {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),

    #[error("failed to emit client `{class_name}`: {message}")]
    Emit { class_name: String, message: String },

    #[error("refusing to write `{path}`: not a plain file name")]
    UnsafePath { path: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
