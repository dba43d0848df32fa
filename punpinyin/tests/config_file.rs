//! Engine construction from a configuration directory on disk.

use std::path::PathBuf;

use punpinyin::{Engine, PunConfig, Query};

struct TempDir(PathBuf);

impl TempDir {
    fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("punpinyin_{}_{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        Self(dir)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

const CONFIG: &str = r#"
min_match_count = 2
initial_display_size = 1
load_more_step = 1
search_order = ["歇后语", "成语", "IT"]
default_dict_names = ["成语", "歇后语"]

[[groups]]
name = "经典"

[[groups.dicts]]
name = "成语"
path = "idiom.json"
loader = "json_normal"
key_field = "word"
extra_field = "explanation"
default_freq = 1

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
name = "坏文件"
path = "broken.json"
loader = "json_normal"
"#;

fn setup(tag: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new(tag);
    dir.write(
        "idiom.json",
        r#"[{"word": "一生一世", "explanation": "一辈子"}, {"word": "一心一意"}, {"word": ""}]"#,
    );
    dir.write(
        "xiehouyu.json",
        r#"[{"riddle": "外甥打灯笼", "answer": "照舅"}, {"riddle": "无答案"}]"#,
    );
    dir.write("THUOCL_it.txt", "银行\t500\n信用卡\t300\n卡\t1000\n");
    dir.write("broken.json", "{ not json");
    let config = dir.write("pungen.toml", CONFIG);
    (dir, config)
}

#[test]
fn loads_groups_and_priorities_from_disk() {
    let (_dir, path) = setup("groups");
    let engine = Engine::from_config_file(&path).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.items, 5);
    assert_eq!(stats.categories, 4);

    assert_eq!(engine.all_types_ordered(), vec!["歇后语", "成语", "IT", "坏文件"]);
    assert_eq!(engine.default_selected_types(), vec!["成语", "歇后语"]);
    let groups = engine.category_map();
    assert_eq!(groups[0].name, "经典");
    assert_eq!(groups[1].categories, vec!["IT", "坏文件"]);
}

#[test]
fn polyphones_match_through_any_reading() {
    let (_dir, path) = setup("polyphone");
    let engine = Engine::from_config_file(&path).unwrap();
    let out = engine.generate(&Query::new("银航").with_categories(["IT"]));
    let words = out.get("IT").unwrap();
    assert_eq!(words[0].pun, "银航");
    assert_eq!(words[0].origins.iter().collect::<Vec<_>>(), vec!["银行"]);
}

#[test]
fn paging_follows_configured_sizes() {
    let (_dir, path) = setup("paging");
    let engine = Engine::from_config_file(&path).unwrap();
    let out = engine.generate(&Query::new("已生一世").with_categories(["成语"]));
    let idioms = out.get("成语").unwrap();
    assert_eq!(idioms.len(), 2);

    let first = engine.page(idioms, 0);
    assert_eq!(first.len(), 1);
    assert!(first.has_more());
    let second = engine.page(idioms, 1);
    assert_eq!(second.offset(), 1);
    assert!(!second.has_more());

    let paged = engine.paged(&out, 1);
    assert_eq!(paged.get("成语").unwrap()[0].origins.iter().collect::<Vec<_>>(), vec!["一心一意"]);
}

#[test]
fn reload_publishes_new_dictionaries() {
    let (dir, path) = setup("reload");
    let engine = Engine::from_config_file(&path).unwrap();
    assert_eq!(engine.generate(&Query::new("大姜").with_categories(["成语"])).total(), 0);

    dir.write("idiom.json", r#"[{"word": "大江东去"}]"#);
    let config = PunConfig::load_toml(&path).unwrap();
    let stats = engine.reload(&config, &dir.0);
    assert_eq!(stats.items, 4);
    assert_eq!(engine.generate(&Query::new("大姜").with_categories(["成语"])).total(), 1);
}

#[test]
fn missing_configuration_is_an_error() {
    let dir = TempDir::new("missing");
    assert!(Engine::from_config_file(dir.0.join("nope.toml")).is_err());
}
