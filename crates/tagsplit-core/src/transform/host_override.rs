use serde::Deserialize;

use crate::parse::spec::SwaggerDocument;

/// Per-product replacement for the document's `host` and `basePath`.
///
/// Specs checked into a service repository usually point at that service's
/// local address; generated clients should target the deployed one instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HostOverride {
    pub host: Option<String>,
    pub base_path: Option<String>,
}

impl HostOverride {
    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.base_path.is_none()
    }
}

/// Apply `overrides` to a copy of `doc`. Unset fields leave the document as is.
pub fn apply_host_override(doc: &SwaggerDocument, overrides: &HostOverride) -> SwaggerDocument {
    let mut doc = doc.clone();
    if let Some(ref host) = overrides.host {
        log::debug!("overriding host {:?} with {host}", doc.host);
        doc.host = Some(host.clone());
    }
    if let Some(ref base_path) = overrides.base_path {
        log::debug!("overriding basePath {:?} with {base_path}", doc.base_path);
        doc.base_path = Some(base_path.clone());
    }
    doc
}
