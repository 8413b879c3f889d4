use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::ParameterOrRef;
use crate::error::ParseError;

/// HTTP methods a Swagger 2.0 path item may declare operations under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    /// Recognize a path item key as an HTTP method. Keys are case-sensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path item: entries keyed by HTTP method, plus shared keys such as
/// `parameters` or `$ref`.
///
/// Entries keep the order they were declared in, so the first operation of a
/// path item is well defined.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathItem {
    entries: IndexMap<String, serde_json::Value>,
}

impl PathItem {
    pub fn new(entries: IndexMap<String, serde_json::Value>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &IndexMap<String, serde_json::Value> {
        &self.entries
    }

    /// Operations in declaration order. Non-method keys are skipped.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &serde_json::Value)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| HttpMethod::from_key(key).map(|m| (m, value)))
    }

    /// The first declared operation, if any.
    pub fn first_operation(&self) -> Option<(HttpMethod, &serde_json::Value)> {
        self.operations().next()
    }

    /// Path-level parameters shared by every operation.
    pub fn shared_parameters(&self) -> Result<Vec<ParameterOrRef>, ParseError> {
        match self.entries.get("parameters") {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }
}

impl FromIterator<(String, serde_json::Value)> for PathItem {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Typed view of an operation object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

impl Operation {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ParseError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}
