//! punpinyin crate root
//!
//! Mandarin front end for `pungen-core`: a pinyin key resolver, dictionary
//! loaders, TOML configuration of dictionary groups and a high-level
//! `Engine` that ties them together.
//!
//! Public API exported here:
//! - `PinyinResolver` from `resolver`
//! - `PunConfig`, `GroupConfig`, `DictConfig`, `LoaderType` from `config`
//! - `Engine` from `engine`

pub mod config;
pub mod engine;
pub mod loader;
pub mod resolver;

pub use config::{DictConfig, GroupConfig, LoaderType, PunConfig};
pub use engine::Engine;
pub use loader::{load_all, load_source};
pub use resolver::PinyinResolver;

// Re-export the core types callers need for queries and results.
pub use pungen_core::{CategoryGroup, EngineStats, PunResult, PunResults, Query, ResultPage};
