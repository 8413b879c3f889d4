use tagsplit_core::parse::parameter::{Items, Parameter, ParameterLocation};

/// Map a Swagger 2.0 primitive `type` (with optional `items`) to TypeScript.
pub fn primitive_to_ts(param_type: Option<&str>, items: Option<&Items>) -> String {
    match param_type {
        Some("string") => "string".to_string(),
        Some("integer") | Some("number") => "number".to_string(),
        Some("boolean") => "boolean".to_string(),
        Some("file") => "Blob".to_string(),
        Some("array") => {
            let inner = match items {
                Some(items) => primitive_to_ts(items.item_type.as_deref(), items.items.as_deref()),
                None => "unknown".to_string(),
            };
            array_of(inner)
        }
        _ => "unknown".to_string(),
    }
}

/// Map a JSON schema to TypeScript. Named definitions are not generated, so
/// `$ref` targets map to `any`.
pub fn schema_to_ts(schema: &serde_json::Value) -> String {
    if schema.get("$ref").is_some() {
        return "any".to_string();
    }
    match schema.get("type").and_then(|t| t.as_str()) {
        Some("array") => {
            let inner = schema
                .get("items")
                .map(schema_to_ts)
                .unwrap_or_else(|| "unknown".to_string());
            array_of(inner)
        }
        Some("object") => match schema.get("additionalProperties") {
            Some(value) if value.is_object() => {
                format!("Record<string, {}>", schema_to_ts(value))
            }
            _ => "Record<string, unknown>".to_string(),
        },
        Some(other) => primitive_to_ts(Some(other), None),
        None => "any".to_string(),
    }
}

/// TypeScript type of a parameter value.
pub fn parameter_to_ts(param: &Parameter) -> String {
    match param.location {
        ParameterLocation::Body => param
            .schema
            .as_ref()
            .map(schema_to_ts)
            .unwrap_or_else(|| "any".to_string()),
        _ => primitive_to_ts(param.param_type.as_deref(), param.items.as_ref()),
    }
}

fn array_of(inner: String) -> String {
    if inner.contains('|') || inner.contains('<') {
        format!("Array<{inner}>")
    } else {
        format!("{inner}[]")
    }
}
