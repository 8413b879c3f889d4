pub mod operation;
pub mod parameter;
pub mod spec;

use crate::error::ParseError;
use spec::SwaggerDocument;

/// Parse a Swagger document from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerDocument, ParseError> {
    let value: serde_json::Value = serde_yaml_ng::from_str(input)?;
    from_value(value)
}

/// Parse a Swagger document from JSON.
pub fn from_json(input: &str) -> Result<SwaggerDocument, ParseError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    from_value(value)
}

/// Validate the document shape, then deserialize it.
///
/// The value must come from an order-preserving map (`serde_json` is built
/// with `preserve_order`), otherwise path and method order is lost.
pub fn from_value(value: serde_json::Value) -> Result<SwaggerDocument, ParseError> {
    let root = value.as_object().ok_or_else(|| {
        ParseError::InvalidSpecification("document root must be a mapping".to_string())
    })?;

    validate_version(root.get("swagger"))?;

    let paths = root
        .get("paths")
        .ok_or_else(|| ParseError::InvalidSpecification("missing `paths`".to_string()))?;
    let paths = paths
        .as_object()
        .ok_or_else(|| ParseError::InvalidSpecification("`paths` must be a mapping".to_string()))?;
    for (path, item) in paths {
        if !item.is_object() {
            return Err(ParseError::InvalidSpecification(format!(
                "path item `{path}` must be a mapping"
            )));
        }
    }

    Ok(serde_json::from_value(value)?)
}

fn validate_version(version: Option<&serde_json::Value>) -> Result<(), ParseError> {
    match version {
        None => Ok(()),
        Some(serde_json::Value::String(v)) if v.starts_with("2.") => Ok(()),
        Some(other) => Err(ParseError::UnsupportedVersion(match other.as_str() {
            Some(s) => s.to_string(),
            None => other.to_string(),
        })),
    }
}
