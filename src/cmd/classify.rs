use clap::Args;
use glidetype::classifier::classify;
use glidetype::config::ClassifierParams;
use glidetype::input::GestureData;
use glidetype::keyboard::KeyboardLayout;

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub params: ClassifierParams,

    /// Total distance traveled, in pixels.
    #[arg(short, long)]
    pub distance: f32,

    /// Gesture duration in milliseconds.
    #[arg(short, long)]
    pub elapsed_ms: i64,

    /// The finger left the starting key.
    #[arg(short = 'L', long, default_value_t = false)]
    pub left_start_key: bool,

    /// Starting-key width in pixels; defaults to the keyboard geometry's.
    #[arg(long)]
    pub key_width: Option<f32>,
}

pub fn run(args: ClassifyArgs, keyboard: KeyboardLayout) {
    let key_width = args.key_width.unwrap_or(keyboard.key_width);
    let gesture = GestureData {
        has_left_starting_key: args.left_start_key,
        total_distance: args.distance,
        time_elapsed_ms: args.elapsed_ms,
        key_width,
    };

    let result = classify(&gesture, args.params.tap_duration_threshold_ms);
    println!(
        "{} (distance {:.1}px vs threshold {:.1}px, {}ms vs {}ms, left key: {})",
        result,
        args.distance,
        key_width / 2.0,
        args.elapsed_ms,
        args.params.tap_duration_threshold_ms,
        args.left_start_key
    );
}
