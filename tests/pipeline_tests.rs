mod common;

use common::{word_trace, ScriptedModel};
use glidetype::cancel::CancellationToken;
use glidetype::config::EngineParams;
use glidetype::input::{Point, SwipeInput};
use glidetype::keyboard::KeyboardLayout;
use glidetype::lexicon::{CandidateSource, Lexicon};
use glidetype::model::{GeometricModel, ModelHandle};
use glidetype::pipeline::SwipePipeline;
use std::sync::Arc;

const INPUT_LEN: usize = 64;

fn keyboard() -> KeyboardLayout {
    KeyboardLayout::qwerty(1000.0, 300.0)
}

fn geometric_pipeline(lexicon: &Lexicon) -> SwipePipeline {
    let kb = keyboard();
    let backend = Arc::new(GeometricModel::new(kb.clone(), INPUT_LEN));
    let handle = ModelHandle::initialize(backend).unwrap();
    SwipePipeline::new(handle, kb, EngineParams::default()).with_trie(lexicon.trie())
}

#[test]
fn hello_trace_ranks_hello_in_top_three() {
    let lexicon = Lexicon::builtin_demo();
    let pipeline = geometric_pipeline(&lexicon);

    let trace = word_trace(&keyboard(), "hello", 12);
    let result = pipeline.predict(&trace, &lexicon, &CancellationToken::new());

    assert!(!result.is_empty(), "expected a prediction");
    let top3: Vec<&str> = result.words.iter().take(3).map(String::as_str).collect();
    assert!(
        top3.contains(&"hello"),
        "'hello' missing from top 3: {:?}",
        result.words
    );
}

#[test]
fn result_is_sorted_and_bounded() {
    let lexicon = Lexicon::builtin_demo();
    let pipeline = geometric_pipeline(&lexicon);

    let trace = word_trace(&keyboard(), "world", 12);
    let result = pipeline.predict(&trace, &lexicon, &CancellationToken::new());

    assert!(result.words.len() <= pipeline.params().ranker.max_results);
    assert_eq!(result.words.len(), result.scores.len());
    for pair in result.scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    if !result.is_empty() {
        assert_eq!(result.top_prediction(), Some(result.words[0].as_str()));
        assert_eq!(result.top_score(), result.scores[0]);
    }
}

#[test]
fn tap_gesture_gates_the_pipeline() {
    let lexicon = Lexicon::builtin_demo();
    let pipeline = geometric_pipeline(&lexicon);
    let kb = keyboard();

    // A quick wiggle on the 'h' key: never leaves it, under the tap window.
    let h = kb.key_center('h').unwrap();
    let coordinates = vec![
        h,
        Point::new(h.x + 3.0, h.y + 2.0),
        Point::new(h.x - 2.0, h.y - 1.0),
    ];
    let input = SwipeInput::new(coordinates, vec![0, 30, 60]);

    let result = pipeline.predict(&input, &lexicon, &CancellationToken::new());
    assert!(result.is_empty());
}

#[test]
fn too_short_trajectory_degrades_to_empty() {
    let lexicon = Lexicon::builtin_demo();
    let pipeline = geometric_pipeline(&lexicon);

    let one_point = SwipeInput::new(vec![Point::new(50.0, 50.0)], vec![0]);
    assert!(pipeline
        .predict(&one_point, &lexicon, &CancellationToken::new())
        .is_empty());

    let empty = SwipeInput::default();
    assert!(pipeline
        .predict(&empty, &lexicon, &CancellationToken::new())
        .is_empty());
}

#[test]
fn encode_failure_abandons_the_whole_gesture() {
    let lexicon = Lexicon::builtin_demo();
    let kb = keyboard();
    let backend = Arc::new(ScriptedModel::new(INPUT_LEN).failing_encode());
    let handle = ModelHandle::initialize(backend).unwrap();
    let pipeline = SwipePipeline::new(handle, kb.clone(), EngineParams::default());

    let trace = word_trace(&kb, "hello", 12);
    let result = pipeline.predict(&trace, &lexicon, &CancellationToken::new());
    assert!(result.is_empty());
}

#[test]
fn cancelled_gesture_produces_no_prediction() {
    let lexicon = Lexicon::builtin_demo();
    let pipeline = geometric_pipeline(&lexicon);

    let token = CancellationToken::new();
    token.cancel();

    let trace = word_trace(&keyboard(), "hello", 12);
    let result = pipeline.predict(&trace, &lexicon, &token);
    assert!(result.is_empty());
}

#[test]
fn out_of_vocabulary_words_are_dropped_by_default() {
    // No trie: the geometric decoder roams freely, but the ranker only
    // passes words the lexicon knows.
    let lexicon = Lexicon::builtin_demo();
    let kb = keyboard();
    let backend = Arc::new(GeometricModel::new(kb.clone(), INPUT_LEN));
    let handle = ModelHandle::initialize(backend).unwrap();
    let pipeline = SwipePipeline::new(handle, kb.clone(), EngineParams::default());

    let trace = word_trace(&kb, "hello", 12);
    let result = pipeline.predict(&trace, &lexicon, &CancellationToken::new());
    for word in &result.words {
        assert!(lexicon.lookup(word).is_some(), "OOV word leaked: {word}");
    }
}

#[test]
fn personalization_boost_reorders_close_candidates() {
    let kb = keyboard();
    let trace = word_trace(&kb, "hello", 12);

    let plain = Lexicon::builtin_demo();
    let plain_result =
        geometric_pipeline(&plain).predict(&trace, &plain, &CancellationToken::new());

    let mut boosted = Lexicon::builtin_demo();
    boosted.set_personalization_boost("hello", 2.0);
    let boosted_result =
        geometric_pipeline(&boosted).predict(&trace, &boosted, &CancellationToken::new());

    let rank_of = |r: &glidetype::input::PredictionResult| {
        r.words.iter().position(|w| w == "hello")
    };
    let before = rank_of(&plain_result);
    let after = rank_of(&boosted_result);
    assert!(after.is_some());
    assert!(after.unwrap() <= before.unwrap_or(usize::MAX));
}

#[test]
fn typed_prefix_boost_flows_through_the_pipeline() {
    let lexicon = Lexicon::builtin_demo();
    let pipeline = geometric_pipeline(&lexicon);

    let trace = word_trace(&keyboard(), "hello", 12);
    let result = pipeline.predict_with_context(
        &trace,
        Some("hell"),
        &lexicon,
        &CancellationToken::new(),
    );
    assert!(!result.is_empty());
    // Shorter near-complete words ("hell") gain ground on "hello" but the
    // output contract is unchanged: sorted, deduplicated, bounded.
    for pair in result.scores.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}
