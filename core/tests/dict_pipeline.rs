//! Main dict -> user dicts -> cache, exercised as one pipeline.

use std::io::Cursor;

use libhanseg_core::{HmmModel, State, WordDict, DEFAULT_USER_FREQ};

fn unique_path(tag: &str, ext: &str) -> std::path::PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!(
        "libhanseg_core_{}_{}_{}.{}",
        tag,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        ext
    ));
    p
}

#[test]
fn load_merge_snapshot_reload() {
    let mut dict = WordDict::from_main_reader(
        Cursor::new("北京 30000\n大学 20000\n北京大学 12000\n"),
        "main",
    )
    .unwrap();
    let total = dict.total();

    dict.load_user_reader(Cursor::new("清华\n词典学 40 n\n"), "user", DEFAULT_USER_FREQ)
        .unwrap();
    assert!((dict.freq("清华") - (3.0 / total).ln()).abs() < 1e-12);
    assert!((dict.freq("词典学") - (40.0 / total).ln()).abs() < 1e-12);

    let cache = unique_path("pipeline", "bin");
    dict.save_cache(&cache).unwrap();
    let reloaded = WordDict::load_cache(&cache).unwrap();
    let _ = std::fs::remove_file(&cache);

    assert_eq!(reloaded.len(), dict.len());
    assert_eq!(reloaded.min_log(), dict.min_log());
    for word in ["北京", "大学", "北京大学", "清华", "词典学"] {
        assert_eq!(reloaded.freq(word), dict.freq(word), "{}", word);
        let chars: Vec<char> = word.chars().collect();
        assert!(
            reloaded
                .trie()
                .match_range(&chars, 0, chars.len())
                .is_match(),
            "trie lost {}",
            word
        );
    }
}

#[test]
fn emission_and_dictionary_models_are_independent() {
    let mut dict = WordDict::from_main_reader(Cursor::new("北京 10\n"), "main").unwrap();
    let hmm =
        HmmModel::from_emit_reader(Cursor::new("B\n中\t-1.0\nE\n文\t-1.0\n"), "emit").unwrap();

    dict.reset();
    // resetting the dictionary does not touch the emission table
    assert!(hmm.has_emissions());
    assert_eq!(hmm.emit(State::B, '中'), -1.0);
    assert!(dict.is_empty());
}
