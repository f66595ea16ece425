use glidetype::keyboard::KeyboardLayout;
use glidetype::lexicon::{CandidateSource, Lexicon};
use glidetype::ranker::WordSource;
use std::fs;
use tempfile::tempdir;

#[test]
fn lexicon_loads_word_frequency_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("words.csv");
    fs::write(
        &path,
        "word,frequency\nthe,23135851162\nhello,15274353\nworld,18285708\nzyzzyva,12\n",
    )
    .unwrap();

    let lex = Lexicon::load_from_csv(&path, WordSource::Main, "en").unwrap();
    assert_eq!(lex.len(), 4);

    // Ranks are dense by descending frequency.
    let the = lex.lookup("the").unwrap();
    let world = lex.lookup("world").unwrap();
    let hello = lex.lookup("hello").unwrap();
    let rare = lex.lookup("zyzzyva").unwrap();
    assert_eq!(the.frequency_rank, 0);
    assert_eq!(world.frequency_rank, 1);
    assert_eq!(hello.frequency_rank, 2);
    assert_eq!(rare.frequency_rank, 3);
    assert_eq!(the.source, WordSource::Main);
    assert_eq!(the.language_code, "en");
}

#[test]
fn malformed_lexicon_csv_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "word,frequency\nhello,not_a_number\n").unwrap();
    assert!(Lexicon::load_from_csv(&path, WordSource::Main, "en").is_err());
}

#[test]
fn keyboard_geometry_round_trips_through_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kb.json");

    let original = KeyboardLayout::qwerty(1080.0, 320.0);
    fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();

    let loaded = KeyboardLayout::load_from_file(&path).unwrap();
    assert_eq!(loaded.keys.len(), original.keys.len());
    assert_eq!(loaded.key_width, original.key_width);
    assert_eq!(loaded.key_center('q'), original.key_center('q'));
}

#[test]
fn missing_keyboard_file_is_an_io_error() {
    assert!(KeyboardLayout::load_from_file("/nonexistent/kb.json").is_err());
}
