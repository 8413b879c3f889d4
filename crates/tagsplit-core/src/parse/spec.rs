use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::operation::PathItem;

/// Top-level Swagger 2.0 document.
///
/// Only the keys the generator rewrites are typed. Everything else (`info`,
/// `definitions`, `schemes`, vendor extensions) is carried through `extra`
/// untouched, so scoped copies keep the rest of the document intact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwaggerDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swagger: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl SwaggerDocument {
    /// Shallow copy of this document with `paths` replaced.
    pub fn with_paths(&self, paths: IndexMap<String, PathItem>) -> Self {
        Self {
            swagger: self.swagger.clone(),
            host: self.host.clone(),
            base_path: self.base_path.clone(),
            paths,
            extra: self.extra.clone(),
        }
    }

    /// `info.title`, when present.
    pub fn title(&self) -> Option<&str> {
        self.extra
            .get("info")
            .and_then(|info| info.get("title"))
            .and_then(|title| title.as_str())
    }

    /// URL the API is served from, built from `schemes`, `host` and `basePath`.
    ///
    /// - `host = "api.example.com"`, `basePath = "/v1"` → `"https://api.example.com/v1"`
    /// - no host, `basePath = "/v1"` → `"/v1"`
    pub fn base_url(&self) -> String {
        let base_path = self.base_path.as_deref().unwrap_or("");
        match self.host {
            Some(ref host) => {
                let scheme = self
                    .extra
                    .get("schemes")
                    .and_then(|s| s.as_array())
                    .and_then(|s| s.first())
                    .and_then(|s| s.as_str())
                    .unwrap_or("https");
                format!("{scheme}://{host}{base_path}")
            }
            None => base_path.to_string(),
        }
    }

    /// Look up a top-level `#/parameters/<name>` definition.
    pub fn shared_parameter(&self, ref_path: &str) -> Option<&serde_json::Value> {
        let name = ref_path.strip_prefix("#/parameters/")?;
        self.extra.get("parameters")?.get(name)
    }
}
