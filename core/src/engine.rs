// core/src/engine.rs
//
// Query engine over an immutable snapshot (index + category registry).
// Rebuilds construct a new snapshot off to the side and publish it with a
// single pointer swap, so readers see either the old or the new snapshot.
// Rebuilds are serialized, so published versions only ever increase.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use ahash::{AHashMap, AHashSet};
use lru::LruCache;
use tracing::{debug, info};

use crate::aggregate::{Contribution, MergeGroup};
use crate::category::{CategoryGroup, CategoryRegistry};
use crate::dict::RawEntry;
use crate::index::{min_limit, PhoneticIndex};
use crate::key::KeyResolver;
use crate::matcher::{align, MatchStrategy};
use crate::results::PunResults;
use crate::{utils, Config};

/// Everything a query reads. Never mutated after construction.
#[derive(Debug, Default)]
pub struct Snapshot {
    index: PhoneticIndex,
    registry: CategoryRegistry,
    version: u64,
}

impl Snapshot {
    /// Resolve and index `entries` under `registry`.
    pub fn build<R, I>(entries: I, registry: CategoryRegistry, resolver: &R, version: u64) -> Self
    where
        R: KeyResolver + ?Sized,
        I: IntoIterator<Item = RawEntry>,
    {
        let index = PhoneticIndex::build(entries, resolver);
        Self {
            index,
            registry,
            version,
        }
    }

    pub fn index(&self) -> &PhoneticIndex {
        &self.index
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

/// One pun request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub word: String,
    /// Categories to search; empty means every known category.
    pub categories: Vec<String>,
    /// Order-free matching when true; `None` uses the configured default.
    pub ignore_order: Option<bool>,
}

impl Query {
    pub fn new<W: Into<String>>(word: W) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignore_order(mut self, ignore_order: bool) -> Self {
        self.ignore_order = Some(ignore_order);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    version: u64,
    word: String,
    categories: Vec<String>,
    strategy: MatchStrategy,
}

/// Size of the published snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub items: usize,
    pub keys: usize,
    pub rejected: usize,
    pub categories: usize,
    pub version: u64,
}

/// Pun generation engine.
///
/// Shareable across threads; queries take no lock beyond cloning the
/// current snapshot pointer and touching the result cache.
pub struct PunEngine<R> {
    resolver: R,
    config: Config,
    snapshot: RwLock<Arc<Snapshot>>,
    cache: Option<Mutex<LruCache<CacheKey, Arc<PunResults>>>>,
    versions: AtomicU64,
    rebuild_lock: Mutex<()>,
}

impl<R: KeyResolver> PunEngine<R> {
    /// Engine with an empty index. Call `rebuild` to load data.
    pub fn new(resolver: R, config: Config) -> Self {
        let cache = NonZeroUsize::new(config.max_cache_size).map(|cap| Mutex::new(LruCache::new(cap)));
        Self {
            resolver,
            config,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
            cache,
            versions: AtomicU64::new(0),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The snapshot currently published to readers.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Build a complete new snapshot and publish it in one swap.
    ///
    /// In-flight queries keep the snapshot they started with. Concurrent
    /// rebuilds run one at a time and publish in version order.
    pub fn rebuild<I>(&self, entries: I, registry: CategoryRegistry) -> EngineStats
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let _serial = match self.rebuild_lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let version = self.versions.fetch_add(1, Ordering::SeqCst) + 1;
        let fresh = Arc::new(Snapshot::build(entries, registry, &self.resolver, version));
        let stats = Self::stats_of(&fresh);

        match self.snapshot.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.clear();
            }
        }

        info!(
            items = stats.items,
            keys = stats.keys,
            rejected = stats.rejected,
            categories = stats.categories,
            version = stats.version,
            "phonetic index published"
        );
        stats
    }

    pub fn stats(&self) -> EngineStats {
        Self::stats_of(&self.snapshot())
    }

    fn stats_of(snapshot: &Snapshot) -> EngineStats {
        EngineStats {
            items: snapshot.index.len(),
            keys: snapshot.index.key_count(),
            rejected: snapshot.index.rejected(),
            categories: snapshot.registry.categories().len(),
            version: snapshot.version,
        }
    }

    /// Menu groups (group name → category names) in insertion order.
    pub fn category_map(&self) -> Vec<CategoryGroup> {
        self.snapshot().registry.groups().to_vec()
    }

    /// Every known category sorted by configured priority.
    pub fn all_types_ordered(&self) -> Vec<String> {
        self.snapshot().registry.all_types_ordered()
    }

    /// Categories selected by default in a front end.
    pub fn default_selected_types(&self) -> Vec<String> {
        self.snapshot().registry.default_selected().to_vec()
    }

    /// Convenience wrapper over `generate`.
    pub fn generate_pun(&self, word: &str, categories: &[String], ignore_order: bool) -> PunResults {
        let query = Query {
            word: word.to_string(),
            categories: categories.to_vec(),
            ignore_order: Some(ignore_order),
        };
        self.generate(&query)
    }

    /// Generate puns for `query`.
    ///
    /// Every requested category appears in the output, in priority order,
    /// even when nothing matched or the name is unknown.
    pub fn generate(&self, query: &Query) -> PunResults {
        let snapshot = self.snapshot();
        let word = utils::normalize(&query.word);
        let strategy =
            MatchStrategy::from_ignore_order(query.ignore_order.unwrap_or(self.config.ignore_order_default));

        let key = CacheKey {
            version: snapshot.version,
            word,
            categories: query.categories.clone(),
            strategy,
        };
        if let Some(hit) = self.cache_get(&key) {
            debug!(word = %key.word, "pun cache hit");
            return (*hit).clone();
        }

        let results = self.compute(&snapshot, &key.word, &query.categories, strategy);
        self.cache_put(key, results.clone());
        results
    }

    fn cache_get(&self, key: &CacheKey) -> Option<Arc<PunResults>> {
        let mut cache = self.cache.as_ref()?.lock().ok()?;
        cache.get(key).cloned()
    }

    fn cache_put(&self, key: CacheKey, results: PunResults) {
        if let Some(cache) = &self.cache {
            if let Ok(mut cache) = cache.lock() {
                cache.put(key, Arc::new(results));
            }
        }
    }

    fn compute(
        &self,
        snapshot: &Snapshot,
        word: &str,
        requested: &[String],
        strategy: MatchStrategy,
    ) -> PunResults {
        let registry = &snapshot.registry;
        let index = &snapshot.index;

        let mut search: Vec<String> = if requested.is_empty() {
            registry.categories().iter().cloned().collect()
        } else {
            let mut seen = AHashSet::new();
            requested
                .iter()
                .filter(|c| seen.insert(c.as_str()))
                .cloned()
                .collect()
        };
        registry.sort_by_priority(&mut search);

        let mut out = PunResults::new();
        for category in &search {
            out.ensure(category);
        }
        if word.is_empty() {
            return out;
        }

        let resolved = self.resolver.resolve(word);
        if resolved.is_empty() {
            debug!(word, "no resolvable characters");
            return out;
        }

        let limit = min_limit(resolved.len(), self.config.min_match_count.max(1));
        let slots: AHashMap<&str, usize> = search
            .iter()
            .enumerate()
            .map(|(slot, name)| (name.as_str(), slot))
            .collect();
        let pool = index.retrieve(&resolved, limit, |category| slots.contains_key(category));

        let scoring = self.config.scoring();
        let separator = self.config.annotation_separator.as_str();
        let mut groups: Vec<MergeGroup> = vec![MergeGroup::new(); search.len()];
        let mut matched = 0usize;

        for id in &pool {
            let item = index.item(*id);
            let Some(m) = align(strategy, &resolved, item, limit, scoring) else {
                continue;
            };
            let Some(&slot) = slots.get(item.category()) else {
                continue;
            };
            let prefix = registry
                .has_prefix_annotation(item.category())
                .then_some(separator);
            groups[slot].add(Contribution::from_match(item, m, prefix));
            matched += 1;
        }

        debug!(
            word,
            input_len = resolved.len(),
            min_limit = limit,
            candidates = pool.len(),
            matched,
            ?strategy,
            "pun query"
        );

        let ranker = self.config.ranker();
        for (category, group) in search.iter().zip(groups) {
            if group.is_empty() {
                continue;
            }
            let ranked = ranker
                .rank(group.into_results())
                .into_iter()
                .map(|merged| merged.into_pun_result())
                .collect();
            out.set(category, ranked);
        }
        out
    }
}
