//! Pun generator configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All matching/ranking options from `pungen_core::Config` (flattened via serde)
//! - The dictionary groups shown in the category menu and their sources
//! - Search priority and default selection of categories
//! - Paging hints for front ends
//!
//! # Example
//!
//! ```rust
//! use punpinyin::PunConfig;
//!
//! let config = PunConfig::from_toml_str(r#"
//!     min_match_count = 2
//!     search_order = ["成语"]
//!
//!     [[groups]]
//!     name = "经典"
//!
//!     [[groups.dicts]]
//!     name = "成语"
//!     path = "idiom.json"
//!     loader = "json_normal"
//!     key_field = "word"
//! "#).unwrap();
//! assert_eq!(config.groups[0].dicts[0].name, "成语");
//! ```
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use pungen_core::CategoryRegistry;

/// How a dictionary source file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderType {
    /// JSON array of objects; text under `key_field`.
    JsonNormal,
    /// JSON array of `{ "riddle", "answer" }` two-part sayings.
    #[serde(alias = "json_xiehouyu")]
    JsonRiddle,
    /// THUOCL word list: `word<TAB>frequency` per line.
    Thuocl,
}

/// One dictionary source, which is also one category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DictConfig {
    /// Category name under which records are indexed.
    pub name: String,
    /// Source file, relative to the configuration file's directory.
    #[serde(default)]
    pub path: String,
    /// Absent means the category is listed but nothing is loaded.
    #[serde(default)]
    pub loader: Option<LoaderType>,
    /// Field holding the text for `json_normal` sources.
    #[serde(default = "default_key_field")]
    pub key_field: String,
    /// Field holding the annotation for `json_normal` sources.
    #[serde(default)]
    pub extra_field: Option<String>,
    /// Frequency given to records from sources without one.
    #[serde(default)]
    pub default_freq: u64,
    /// Prefix results with the record annotation. Defaults to on for riddle
    /// sources and off otherwise.
    #[serde(default)]
    pub prefix_annotation: Option<bool>,
}

fn default_key_field() -> String {
    "word".to_string()
}

impl DictConfig {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, path: P, loader: LoaderType) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            loader: Some(loader),
            key_field: default_key_field(),
            extra_field: None,
            default_freq: 0,
            prefix_annotation: None,
        }
    }

    pub fn prefixes_annotation(&self) -> bool {
        self.prefix_annotation
            .unwrap_or(self.loader == Some(LoaderType::JsonRiddle))
    }
}

/// A menu group of dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub dicts: Vec<DictConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PunConfig {
    /// Base matching and ranking options.
    #[serde(flatten)]
    pub base: pungen_core::Config,

    /// Category priority when searching several at once.
    pub search_order: Vec<String>,
    /// Categories a front end selects by default.
    pub default_dict_names: Vec<String>,
    /// Dictionary groups in menu order.
    pub groups: Vec<GroupConfig>,

    /// Results shown on the first page.
    pub initial_display_size: usize,
    /// Results added by each "load more".
    pub load_more_step: usize,
}

impl Default for PunConfig {
    fn default() -> Self {
        Self {
            base: pungen_core::Config::default(),
            search_order: Vec::new(),
            default_dict_names: Vec::new(),
            groups: Vec::new(),
            initial_display_size: 20,
            load_more_step: 40,
        }
    }
}

impl PunConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parse config {}", path.display()))
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert this config into the base config for `PunEngine::new()`.
    pub fn into_base(self) -> pungen_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &pungen_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut pungen_core::Config {
        &mut self.base
    }

    /// Category registry described by this configuration: groups and
    /// categories in file order, priority, default selection and prefix
    /// flags.
    pub fn registry(&self) -> CategoryRegistry {
        let mut registry = CategoryRegistry::new()
            .with_search_order(self.search_order.as_slice())
            .with_default_selected(self.default_dict_names.as_slice());
        for group in &self.groups {
            registry.add_group(&group.name);
            for dict in &group.dicts {
                registry.register(&group.name, &dict.name);
                if dict.prefixes_annotation() {
                    registry.set_prefix_annotation(&dict.name, true);
                }
            }
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
min_match_count = 3
search_order = ["歇后语", "成语"]
default_dict_names = ["成语"]

[[groups]]
name = "经典"

[[groups.dicts]]
name = "成语"
path = "idiom.json"
loader = "json_normal"
default_freq = 10

[[groups.dicts]]
name = "歇后语"
path = "xiehouyu.json"
loader = "json_xiehouyu"

[[groups]]
name = "词库"

[[groups.dicts]]
name = "IT"
path = "THUOCL_it.txt"
loader = "thuocl"

[[groups.dicts]]
name = "待定"
"#;

    #[test]
    fn parses_groups_and_flattened_base() {
        let cfg = PunConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(cfg.base.min_match_count, 3);
        assert_eq!(cfg.base.score_tolerance, 10);
        assert_eq!(cfg.initial_display_size, 20);
        assert_eq!(cfg.groups.len(), 2);
        assert_eq!(cfg.groups[0].dicts[0].key_field, "word");
        assert_eq!(cfg.groups[0].dicts[1].loader, Some(LoaderType::JsonRiddle));
        assert_eq!(cfg.groups[1].dicts[1].loader, None);
    }

    #[test]
    fn registry_reflects_configuration() {
        let registry = PunConfig::from_toml_str(SAMPLE).unwrap().registry();
        assert_eq!(registry.categories().iter().collect::<Vec<_>>(), vec!["成语", "歇后语", "IT", "待定"]);
        assert_eq!(registry.all_types_ordered(), vec!["歇后语", "成语", "IT", "待定"]);
        assert_eq!(registry.default_selected(), &["成语"]);
        assert!(registry.has_prefix_annotation("歇后语"));
        assert!(!registry.has_prefix_annotation("成语"));
    }

    #[test]
    fn prefix_flag_can_be_overridden() {
        let mut dict = DictConfig::new("歇后语", "x.json", LoaderType::JsonRiddle);
        assert!(dict.prefixes_annotation());
        dict.prefix_annotation = Some(false);
        assert!(!dict.prefixes_annotation());
        let normal = DictConfig::new("成语", "x.json", LoaderType::JsonNormal);
        assert!(!normal.prefixes_annotation());
    }

    #[test]
    fn empty_configuration_is_valid() {
        let cfg = PunConfig::from_toml_str("").unwrap();
        assert!(cfg.groups.is_empty());
        assert!(cfg.registry().categories().is_empty());
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = PunConfig::from_toml_str(SAMPLE).unwrap();
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(PunConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn load_errors_keep_their_source() {
        let missing = std::env::temp_dir().join(format!("punpinyin_missing_{}.toml", std::process::id()));
        let err = PunConfig::load_toml(&missing).unwrap_err();
        assert!(err.to_string().starts_with("read config"));
        let io = err
            .chain()
            .find_map(|e| e.downcast_ref::<std::io::Error>())
            .expect("io error in chain");
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);

        let bad = std::env::temp_dir().join(format!("punpinyin_bad_{}.toml", std::process::id()));
        std::fs::write(&bad, "initial_display_size = \"many\"\n").unwrap();
        let err = PunConfig::load_toml(&bad).unwrap_err();
        assert!(err.chain().any(|e| e.downcast_ref::<toml::de::Error>().is_some()));
        let _ = std::fs::remove_file(bad);
    }
}
