use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::HostOverride;

/// Top-level project configuration loaded from `.tagsplit.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TagsplitConfig {
    /// Directory holding one checkout per product.
    pub work_dir: String,
    /// Directory the `<Tag>Client` files are written to.
    pub output: String,
    pub emit: EmitConfig,
    pub products: IndexMap<String, ProductConfig>,
}

impl Default for TagsplitConfig {
    fn default() -> Self {
        Self {
            work_dir: "scripts/codegen".to_string(),
            output: "src/generated/client".to_string(),
            emit: EmitConfig::default(),
            products: IndexMap::new(),
        }
    }
}

impl TagsplitConfig {
    /// Local checkout directory for a product.
    pub fn checkout_dir(&self, product: &str) -> PathBuf {
        Path::new(&self.work_dir).join(product)
    }
}

/// Client emission options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    pub no_jsdoc: bool,
}

/// One API product: where its spec lives and how to retarget it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    pub repository: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    /// Spec path relative to the checkout.
    #[serde(default = "default_spec_path")]
    pub spec: String,

    #[serde(flatten)]
    pub host_override: HostOverride,
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_spec_path() -> String {
    "scripts/codegen/spec.json".to_string()
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".tagsplit.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<TagsplitConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: TagsplitConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# tagsplit configuration
work_dir: scripts/codegen       # checkouts are kept at <work_dir>/<product>
output: src/generated/client    # <Tag>Client.ts files are written here

emit:
  no_jsdoc: false

products: {}
  # waiter-income:
  #   repository: https://github.com/amadeuszi/waiter-income.git
  #   branch: master
  #   spec: scripts/codegen/spec.json   # relative to the checkout
  #   host: api.example.com             # optional, replaces `host`
  #   base_path: /v1                    # optional, replaces `basePath`
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TagsplitConfig::default();
        assert_eq!(config.work_dir, "scripts/codegen");
        assert_eq!(config.output, "src/generated/client");
        assert!(!config.emit.no_jsdoc);
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_default_content_parses() {
        let config: TagsplitConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert!(config.products.is_empty());
        assert_eq!(config.output, "src/generated/client");
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
work_dir: tmp/checkouts
output: out/clients
emit:
  no_jsdoc: true
products:
  waiter-income:
    repository: https://github.com/amadeuszi/waiter-income.git
    host: api.example.com
    base_path: /v1
  kitchen:
    repository: git@example.com:kitchen.git
    branch: main
    spec: api/swagger.yaml
"#;
        let config: TagsplitConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.work_dir, "tmp/checkouts");
        assert!(config.emit.no_jsdoc);
        assert_eq!(config.products.len(), 2);

        let waiter = &config.products["waiter-income"];
        assert_eq!(waiter.branch, "master");
        assert_eq!(waiter.spec, "scripts/codegen/spec.json");
        assert_eq!(waiter.host_override.host.as_deref(), Some("api.example.com"));
        assert_eq!(waiter.host_override.base_path.as_deref(), Some("/v1"));

        let kitchen = &config.products["kitchen"];
        assert_eq!(kitchen.branch, "main");
        assert_eq!(kitchen.spec, "api/swagger.yaml");
        assert!(kitchen.host_override.is_empty());

        let keys: Vec<&String> = config.products.keys().collect();
        assert_eq!(keys, vec!["waiter-income", "kitchen"]);
        assert_eq!(
            config.checkout_dir("kitchen"),
            PathBuf::from("tmp/checkouts/kitchen")
        );
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap().is_none());
    }
}
