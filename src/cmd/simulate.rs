use clap::Args;
use glidetype::config::EngineParams;
use glidetype::input::{Point, SwipeInput};
use glidetype::keyboard::KeyboardLayout;
use glidetype::model::GeometricModel;
use std::process;

/// Sample spacing of the synthetic trace, matching a ~120 Hz touch stream.
const SAMPLE_INTERVAL_MS: i64 = 8;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub params: EngineParams,

    /// Word to synthesize a swipe trace for.
    #[arg(short, long)]
    pub word: String,

    /// Touch jitter amplitude in pixels.
    #[arg(short, long, default_value_t = 8.0)]
    pub jitter: f32,

    /// Trace samples generated per key-to-key segment.
    #[arg(long, default_value_t = 12)]
    pub points_per_key: usize,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    #[arg(short, long)]
    pub lexicon: Option<String>,

    #[arg(long, default_value_t = GeometricModel::DEFAULT_INPUT_LEN)]
    pub input_len: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: SimulateArgs, keyboard: KeyboardLayout) {
    let anchors = keyboard.word_path(&args.word);
    if anchors.len() < 2 {
        eprintln!(
            "❌ '{}' maps to {} key(s); a swipe needs at least 2",
            args.word,
            anchors.len()
        );
        process::exit(1);
    }

    let input = synthesize(&anchors, args.jitter, args.points_per_key, args.seed);

    if !args.json {
        println!(
            "\n🎲 Simulated '{}': {} points, {:.0}px path (seed: {})",
            args.word,
            input.coordinates.len(),
            input.path_length(),
            args.seed.map_or("random".to_string(), |s| s.to_string()),
        );
    }

    super::run_pipeline(
        keyboard,
        args.params,
        args.lexicon.as_deref(),
        args.input_len,
        &input,
        args.json,
    );
}

/// Walk the anchor polyline, emitting jittered samples at a fixed cadence.
fn synthesize(
    anchors: &[Point],
    jitter: f32,
    points_per_key: usize,
    seed: Option<u64>,
) -> SwipeInput {
    let mut rng = match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };
    let steps = points_per_key.max(2);

    let mut coordinates = Vec::new();
    let mut timestamps = Vec::new();
    let mut t = 0i64;

    for pair in anchors.windows(2) {
        for i in 0..steps {
            let frac = i as f32 / steps as f32;
            let x = pair[0].x + frac * (pair[1].x - pair[0].x);
            let y = pair[0].y + frac * (pair[1].y - pair[0].y);
            coordinates.push(Point::new(
                x + (rng.f32() - 0.5) * 2.0 * jitter,
                y + (rng.f32() - 0.5) * 2.0 * jitter,
            ));
            timestamps.push(t);
            t += SAMPLE_INTERVAL_MS;
        }
    }
    // Land exactly on the last key so the end of the word is unambiguous.
    coordinates.push(*anchors.last().unwrap());
    timestamps.push(t);

    SwipeInput::new(coordinates, timestamps)
}
