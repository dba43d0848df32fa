//! End-to-end scenarios for the pun engine.
//!
//! Uses a hand-written syllable table so that expectations do not depend on
//! any pronunciation database.

use pungen_core::{
    align, CategoryRegistry, Config, DictItem, KeyResolver, MatchStrategy, PunEngine, Query,
    RawEntry, Scoring, TableResolver,
};

fn resolver() -> TableResolver {
    TableResolver::from_table(&[
        ('甲', "jia3"),
        ('家', "jia1"),
        ('乙', "yi3"),
        ('一', "yi1"),
        ('丙', "bing3"),
        ('兵', "bing1"),
        ('丁', "ding1"),
        ('子', "zi3"),
        ('寅', "yin2"),
        ('行', "xing2 hang2"),
        ('航', "hang2"),
    ])
}

fn registry() -> CategoryRegistry {
    let mut reg = CategoryRegistry::new().with_search_order(&["成语", "词"]);
    reg.register("全部", "成语");
    reg.register("全部", "词");
    reg.register("全部", "空");
    reg
}

fn item(text: &str) -> DictItem {
    DictItem::resolve(RawEntry::new(text, "成语", 0), &resolver()).unwrap()
}

#[test]
fn single_character_input_lowers_the_floor() {
    let engine = PunEngine::new(resolver(), Config::default());
    engine.rebuild(
        vec![RawEntry::new("航", "词", 1), RawEntry::new("甲", "词", 1)],
        registry(),
    );

    let out = engine.generate(&Query::new("行").with_categories(["词"]));
    let words = out.get("词").unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].pun, "行");
    assert_eq!(words[0].origins.iter().collect::<Vec<_>>(), vec!["航"]);
    assert_eq!(words[0].highlights, vec![0]);
}

#[test]
fn non_adjacent_pair_scores_twenty_and_adjacency_only_counts_when_ordered() {
    let word = resolver().resolve("甲乙丙丁");
    let scoring = Scoring::default();

    let two = align(MatchStrategy::Unordered, &word, &item("甲子丙寅"), 2, scoring).unwrap();
    assert_eq!(two.match_count, 2);
    assert_eq!(two.score, 20);
    assert_eq!(two.indices, vec![0, 2]);

    let three = item("甲子乙丙");
    let ordered = align(MatchStrategy::Ordered, &word, &three, 2, scoring).unwrap();
    assert_eq!(ordered.match_count, 3);
    assert_eq!(ordered.score, 50);
    assert_eq!(ordered.indices, vec![0, 2, 3]);

    let unordered = align(MatchStrategy::Unordered, &word, &three, 2, scoring).unwrap();
    assert_eq!(unordered.score, 30);
}

#[test]
fn category_without_items_still_appears() {
    let engine = PunEngine::new(resolver(), Config::default());
    engine.rebuild(vec![RawEntry::new("甲乙", "成语", 1)], registry());

    let out = engine.generate(&Query::new("家一"));
    assert_eq!(out.categories().collect::<Vec<_>>(), vec!["成语", "词", "空"]);
    assert!(out.get("空").unwrap().is_empty());
    assert_eq!(out.get("成语").unwrap()[0].pun, "家一");
}

#[test]
fn unknown_category_passes_through_empty() {
    let engine = PunEngine::new(resolver(), Config::default());
    engine.rebuild(vec![RawEntry::new("甲乙", "成语", 1)], registry());

    let out = engine.generate(&Query::new("家一").with_categories(["不存在", "成语"]));
    assert_eq!(out.categories().collect::<Vec<_>>(), vec!["成语", "不存在"]);
    assert!(out.get("不存在").unwrap().is_empty());
}

#[test]
fn shorter_records_are_pruned() {
    let engine = PunEngine::new(resolver(), Config::default());
    engine.rebuild(
        vec![RawEntry::new("甲", "成语", 99), RawEntry::new("甲乙", "成语", 1)],
        registry(),
    );

    let out = engine.generate(&Query::new("家一丙").with_categories(["成语"]));
    let origins: Vec<&str> = out.get("成语").unwrap().iter().flat_map(|r| r.origins.iter().map(String::as_str)).collect();
    assert_eq!(origins, vec!["甲乙"]);
}

#[test]
fn same_pun_from_several_sources_is_merged() {
    let engine = PunEngine::new(resolver(), Config::default());
    engine.rebuild(
        vec![
            RawEntry::new("家乙", "成语", 1),
            RawEntry::new("甲一", "成语", 7),
            RawEntry::new("甲乙", "成语", 3),
        ],
        registry(),
    );

    let out = engine.generate(&Query::new("家一").with_categories(["成语"]));
    let idioms = out.get("成语").unwrap();
    assert_eq!(idioms.len(), 1);
    assert_eq!(idioms[0].pun, "家一");
    assert_eq!(idioms[0].origins.iter().collect::<Vec<_>>(), vec!["家乙", "甲一", "甲乙"]);
}

#[test]
fn ranking_prefers_more_matches_then_frequency_within_band() {
    let engine = PunEngine::new(resolver(), Config::default());
    engine.rebuild(
        vec![
            RawEntry::new("甲子乙", "成语", 1),
            RawEntry::new("甲乙丙", "成语", 1),
            RawEntry::new("丙子甲", "成语", 50),
        ],
        registry(),
    );

    let out = engine.generate(&Query::new("家一兵").with_categories(["成语"]).ignore_order(true));
    let puns: Vec<&str> = out.get("成语").unwrap().iter().map(|r| r.pun.as_str()).collect();
    // three matches first, then the two-match results ordered by frequency
    assert_eq!(puns, vec!["家一兵", "兵子家", "家子一"]);
}

#[test]
fn ordered_mode_rejects_out_of_order_records() {
    let engine = PunEngine::new(resolver(), Config::default());
    engine.rebuild(vec![RawEntry::new("乙甲", "成语", 1)], registry());

    let unordered = engine.generate(&Query::new("家一").with_categories(["成语"]).ignore_order(true));
    assert_eq!(unordered.total(), 1);

    let ordered = engine.generate(&Query::new("家一").with_categories(["成语"]).ignore_order(false));
    assert_eq!(ordered.total(), 0);
}

#[test]
fn output_is_reproducible() {
    let entries = vec![
        RawEntry::new("甲乙", "成语", 1),
        RawEntry::new("乙甲", "成语", 1),
        RawEntry::new("丙丁", "词", 1),
        RawEntry::new("丁丙", "词", 1),
    ];
    let config = Config {
        max_cache_size: 0,
        ..Config::default()
    };
    let a = PunEngine::new(resolver(), config.clone());
    a.rebuild(entries.clone(), registry());
    let b = PunEngine::new(resolver(), config);
    b.rebuild(entries, registry());

    let q = Query::new("家一兵丁");
    let first = serde_json::to_string(&a.generate(&q)).unwrap();
    let second = serde_json::to_string(&a.generate(&q)).unwrap();
    let third = serde_json::to_string(&b.generate(&q)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, third);
}
