//! Mandarin pun engine
//!
//! Wraps the generic `pungen_core::PunEngine` with the pinyin resolver and
//! the dictionary loading described by a `PunConfig`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use pungen_core::{
    CategoryGroup, EngineStats, PunEngine, PunResult, PunResults, Query, RawEntry, ResultPage,
};

use crate::config::{DictConfig, GroupConfig, LoaderType, PunConfig};
use crate::loader;
use crate::resolver::PinyinResolver;

/// Public engine for punpinyin.
///
/// The inner engine is wrapped in Arc so clones share one index.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<PunEngine<PinyinResolver>>,
    initial_display_size: usize,
    load_more_step: usize,
}

impl Engine {
    /// Empty engine using the matching options of `config`.
    pub fn new(config: &PunConfig) -> Self {
        Self {
            inner: Arc::new(PunEngine::new(PinyinResolver::new(), config.base.clone())),
            initial_display_size: config.initial_display_size,
            load_more_step: config.load_more_step,
        }
    }

    /// Build an engine and load every dictionary in `config`.
    ///
    /// Relative dictionary paths are resolved against `base_dir`.
    pub fn from_config(config: &PunConfig, base_dir: &Path) -> Self {
        let engine = Self::new(config);
        engine.reload(config, base_dir);
        engine
    }

    /// Read a TOML configuration file and load its dictionaries from paths
    /// relative to the file.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = PunConfig::load_toml(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::from_config(&config, base_dir))
    }

    /// Built-in corpus used when no configuration is given.
    pub fn demo() -> Self {
        let config = demo_config();
        let engine = Self::new(&config);
        engine.inner.rebuild(demo_entries(), config.registry());
        engine
    }

    /// Reload dictionaries and categories from `config` and publish them in
    /// one swap. Matching options stay those the engine was built with.
    pub fn reload(&self, config: &PunConfig, base_dir: &Path) -> EngineStats {
        let entries = loader::load_all(config, base_dir);
        self.inner.rebuild(entries, config.registry())
    }

    /// Get a cloned Arc to the inner core engine.
    pub fn inner_arc(&self) -> Arc<PunEngine<PinyinResolver>> {
        Arc::clone(&self.inner)
    }

    pub fn stats(&self) -> EngineStats {
        self.inner.stats()
    }

    pub fn generate(&self, query: &Query) -> PunResults {
        self.inner.generate(query)
    }

    pub fn generate_pun(&self, word: &str, categories: &[String], ignore_order: bool) -> PunResults {
        self.inner.generate_pun(word, categories, ignore_order)
    }

    pub fn category_map(&self) -> Vec<CategoryGroup> {
        self.inner.category_map()
    }

    pub fn all_types_ordered(&self) -> Vec<String> {
        self.inner.all_types_ordered()
    }

    pub fn default_selected_types(&self) -> Vec<String> {
        self.inner.default_selected_types()
    }

    /// Page `page` (0-based) of every category, sized by the configured
    /// paging hints.
    pub fn paged(&self, results: &PunResults, page: usize) -> PunResults {
        results.paged(page, self.initial_display_size, self.load_more_step)
    }

    /// Page `page` of a single result list.
    pub fn page<'a>(&self, results: &'a [PunResult], page: usize) -> ResultPage<'a> {
        ResultPage::nth(results, page, self.initial_display_size, self.load_more_step)
    }
}

fn demo_config() -> PunConfig {
    PunConfig {
        search_order: vec!["成语".into(), "歇后语".into(), "IT".into()],
        default_dict_names: vec!["成语".into()],
        groups: vec![
            GroupConfig {
                name: "经典".into(),
                dicts: vec![
                    DictConfig::new("成语", "", LoaderType::JsonNormal),
                    DictConfig::new("歇后语", "", LoaderType::JsonRiddle),
                ],
            },
            GroupConfig {
                name: "词库".into(),
                dicts: vec![DictConfig::new("IT", "", LoaderType::Thuocl)],
            },
        ],
        ..PunConfig::default()
    }
}

const DEMO_IDIOMS: &[&str] = &[
    "一生一世",
    "一心一意",
    "大江东去",
    "马到成功",
    "年年有余",
    "心想事成",
    "百年好合",
    "天长地久",
    "一帆风顺",
    "万事如意",
];

const DEMO_RIDDLES: &[(&str, &str)] = &[
    ("外甥打灯笼", "照舅"),
    ("孔夫子搬家", "尽是书"),
    ("猪八戒照镜子", "里外不是人"),
    ("小葱拌豆腐", "一清二白"),
];

const DEMO_WORDS: &[(&str, u64)] = &[
    ("程序员", 120),
    ("服务器", 90),
    ("内存", 80),
    ("算法", 75),
    ("数据库", 60),
];

fn demo_entries() -> Vec<RawEntry> {
    let idioms = DEMO_IDIOMS.iter().map(|t| RawEntry::new(*t, "成语", 0));
    let riddles = DEMO_RIDDLES
        .iter()
        .map(|(riddle, answer)| RawEntry::new(*answer, "歇后语", 0).with_annotation(*riddle));
    let words = DEMO_WORDS.iter().map(|(w, f)| RawEntry::new(*w, "IT", *f));
    idioms.chain(riddles).chain(words).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_engine_is_populated() {
        let engine = Engine::demo();
        let stats = engine.stats();
        assert_eq!(stats.items, DEMO_IDIOMS.len() + DEMO_RIDDLES.len() + DEMO_WORDS.len());
        assert_eq!(stats.categories, 3);
        assert_eq!(engine.all_types_ordered(), vec!["成语", "歇后语", "IT"]);
        assert_eq!(engine.default_selected_types(), vec!["成语"]);
    }

    #[test]
    fn demo_riddles_are_prefixed() {
        let engine = Engine::demo();
        let out = engine.generate(&Query::new("照旧").with_categories(["歇后语"]));
        let riddles = out.get("歇后语").unwrap();
        assert_eq!(riddles[0].pun, "外甥打灯笼——照旧");
        assert_eq!(riddles[0].origins.iter().collect::<Vec<_>>(), vec!["外甥打灯笼——照舅"]);
    }

    #[test]
    fn clones_share_the_index() {
        let engine = Engine::new(&PunConfig::default());
        let clone = engine.clone();
        engine.inner_arc().rebuild(demo_entries(), demo_config().registry());
        assert!(clone.stats().items > 0);
        assert_eq!(clone.stats(), engine.stats());
    }
}
