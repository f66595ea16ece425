pub mod classify;
pub mod predict;
pub mod simulate;

use crate::reports;
use glidetype::cancel::CancellationToken;
use glidetype::config::EngineParams;
use glidetype::input::SwipeInput;
use glidetype::keyboard::KeyboardLayout;
use glidetype::lexicon::Lexicon;
use glidetype::model::{GeometricModel, ModelHandle};
use glidetype::pipeline::SwipePipeline;
use glidetype::ranker::WordSource;
use std::process;
use std::sync::Arc;

/// Shared predict/simulate plumbing: build the geometric backend, wire the
/// lexicon trie into the pipeline, run one gesture, render.
pub fn run_pipeline(
    keyboard: KeyboardLayout,
    params: EngineParams,
    lexicon_path: Option<&str>,
    input_len: usize,
    input: &SwipeInput,
    json: bool,
) {
    let lexicon = match lexicon_path {
        Some(path) => Lexicon::load_from_csv(path, WordSource::Main, "en").unwrap_or_else(|e| {
            eprintln!("❌ Failed to load lexicon '{}': {}", path, e);
            process::exit(1);
        }),
        None => Lexicon::builtin_demo(),
    };

    let backend = Arc::new(GeometricModel::new(keyboard.clone(), input_len));
    let handle = match ModelHandle::initialize(backend) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("❌ Model initialization failed: {}", e);
            process::exit(1);
        }
    };

    let pipeline = SwipePipeline::new(handle, keyboard, params).with_trie(lexicon.trie());
    let result = pipeline.predict(input, &lexicon, &CancellationToken::new());

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("❌ Failed to serialize result: {}", e),
        }
    } else {
        reports::print_prediction(&result);
    }

    pipeline.shutdown();
}
