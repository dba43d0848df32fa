//! Dictionary source loaders.
//!
//! Each configured dictionary is read into `RawEntry` records tagged with the
//! dictionary's name as category. A source that cannot be read or parsed as a
//! whole is an error; individual malformed records are skipped.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use pungen_core::RawEntry;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{DictConfig, LoaderType, PunConfig};

/// Resolve a dictionary path against the configuration directory.
pub fn source_path(dict: &DictConfig, base_dir: &Path) -> PathBuf {
    let path = Path::new(&dict.path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Load one dictionary source. A dictionary without a loader yields nothing.
pub fn load_source(dict: &DictConfig, base_dir: &Path) -> Result<Vec<RawEntry>> {
    let Some(loader) = dict.loader else {
        return Ok(Vec::new());
    };
    let path = source_path(dict, base_dir);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("read dictionary {} from {}", dict.name, path.display()))?;

    match loader {
        LoaderType::JsonNormal => parse_json_normal(&content, dict),
        LoaderType::JsonRiddle => parse_json_riddle(&content, dict),
        LoaderType::Thuocl => Ok(parse_thuocl(&content, dict)),
    }
}

/// Load every dictionary in `config`, in group order.
///
/// Sources that fail to load are logged and skipped.
pub fn load_all(config: &PunConfig, base_dir: &Path) -> Vec<RawEntry> {
    let mut entries = Vec::new();
    for group in &config.groups {
        for dict in &group.dicts {
            match load_source(dict, base_dir) {
                Ok(loaded) => {
                    if dict.loader.is_some() {
                        info!(
                            group = %group.name,
                            dict = %dict.name,
                            records = loaded.len(),
                            "dictionary loaded"
                        );
                    }
                    entries.extend(loaded);
                }
                Err(e) => {
                    let error = format!("{:#}", e);
                    warn!(dict = %dict.name, %error, "dictionary skipped");
                }
            }
        }
    }
    entries
}

fn json_array(content: &str, dict: &DictConfig) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content)
        .with_context(|| format!("parse dictionary {}", dict.name))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(anyhow!("dictionary {} is not a JSON array", dict.name)),
    }
}

fn non_blank<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// JSON array of objects with the text under `key_field` and an optional
/// annotation under `extra_field`.
pub fn parse_json_normal(content: &str, dict: &DictConfig) -> Result<Vec<RawEntry>> {
    let entries = json_array(content, dict)?
        .iter()
        .filter_map(|record| {
            let text = non_blank(record, &dict.key_field)?;
            let annotation = dict
                .extra_field
                .as_deref()
                .and_then(|field| record.get(field))
                .and_then(Value::as_str)
                .unwrap_or_default();
            Some(RawEntry::new(text, dict.name.as_str(), dict.default_freq).with_annotation(annotation))
        })
        .collect();
    Ok(entries)
}

/// JSON array of `{ "riddle": .., "answer": .. }`. The answer is matched and
/// the riddle becomes the annotation.
pub fn parse_json_riddle(content: &str, dict: &DictConfig) -> Result<Vec<RawEntry>> {
    let entries = json_array(content, dict)?
        .iter()
        .filter_map(|record| {
            let riddle = non_blank(record, "riddle")?;
            let answer = non_blank(record, "answer")?;
            Some(RawEntry::new(answer, dict.name.as_str(), dict.default_freq).with_annotation(riddle))
        })
        .collect();
    Ok(entries)
}

/// THUOCL word list: `word<TAB>frequency` per line.
///
/// Lines with fewer than two fields, single-character words or a
/// non-numeric frequency are skipped.
pub fn parse_thuocl(content: &str, dict: &DictConfig) -> Vec<RawEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t').map(str::trim).filter(|f| !f.is_empty());
            let text = fields.next()?;
            let freq = fields.next()?;
            if text.chars().count() < 2 {
                return None;
            }
            let frequency = freq.parse::<u64>().ok()?;
            Some(RawEntry::new(text, dict.name.as_str(), frequency))
        })
        .collect()
}
