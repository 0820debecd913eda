//! Loading an engine through `Config` and its TOML round trip.

use libhanseg::{Config, SegMode, Segmenter};

fn unique_dir(tag: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "libhanseg_{}_{}_{}",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn from_config_loads_all_named_resources() {
    let dir = unique_dir("config");
    let main = dir.join("dict.txt");
    let emit = dir.join("prob_emit.txt");
    let user = dir.join("extra.dict");
    std::fs::write(&main, "北京 30000\n大学 20000\n北京大学 12000\n").unwrap();
    std::fs::write(&emit, "B\n小\t-5.6\nE\n明\t-6.9\nS\n小\t-6.5\n明\t-8.0\nM\n明\t-8.0\n").unwrap();
    std::fs::write(&user, "自然语言 9000\n").unwrap();

    let mut config = Config::default();
    config.main_dict = Some(main);
    config.emit_file = Some(emit);
    config.user_dicts.push(user);

    // the config itself round-trips through TOML
    let toml_path = dir.join("engine.toml");
    config.save_toml(&toml_path).unwrap();
    let config = Config::load_toml(&toml_path).unwrap();

    let seg = Segmenter::from_config(config).unwrap();
    assert!(seg.hmm_active());

    let words: Vec<String> = seg
        .process("北京大学自然语言", SegMode::Search)
        .into_iter()
        .map(|t| t.word)
        .collect();
    assert_eq!(words, ["北京大学", "自然语言"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_main_dict_is_an_error() {
    let config = Config::default();
    assert!(Segmenter::from_config(config).is_err());
}

#[test]
fn missing_emission_file_disables_the_fallback() {
    let dir = unique_dir("noemit");
    let main = dir.join("dict.txt");
    std::fs::write(&main, "北京 30000\n").unwrap();

    let seg =
        Segmenter::from_paths(main.as_path(), Some(dir.join("absent.txt").as_path())).unwrap();
    assert!(!seg.hmm_active());
    // the unknown pair surfaces as constituent characters
    assert_eq!(seg.sentence_process("小明"), vec!["小", "明"]);

    let _ = std::fs::remove_dir_all(&dir);
}
