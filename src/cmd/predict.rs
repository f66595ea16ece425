use clap::Args;
use glidetype::config::EngineParams;
use glidetype::input::SwipeInput;
use glidetype::keyboard::KeyboardLayout;
use glidetype::model::GeometricModel;
use std::fs;
use std::process;

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub params: EngineParams,

    /// Trace JSON file: {"coordinates": [{"x":..,"y":..},..], "timestamps": [..]}.
    #[arg(short, long)]
    pub trace: String,

    /// Optional word,frequency CSV. Falls back to a built-in demo list.
    #[arg(short, long)]
    pub lexicon: Option<String>,

    /// Load engine parameters from a JSON file instead of CLI flags.
    #[arg(long)]
    pub params_file: Option<String>,

    /// Model input length (trajectory points after resampling).
    #[arg(long, default_value_t = GeometricModel::DEFAULT_INPUT_LEN)]
    pub input_len: usize,

    /// Emit the prediction as JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: PredictArgs, keyboard: KeyboardLayout) {
    let params = match &args.params_file {
        Some(path) => EngineParams::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("❌ Failed to load params '{}': {}", path, e);
            process::exit(1);
        }),
        None => args.params.clone(),
    };

    let content = fs::read_to_string(&args.trace).unwrap_or_else(|e| {
        eprintln!("❌ Failed to read trace '{}': {}", args.trace, e);
        process::exit(1);
    });
    let input: SwipeInput = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("❌ Failed to parse trace '{}': {}", args.trace, e);
        process::exit(1);
    });

    if !args.json {
        println!(
            "\n📍 Trace: {} points, {:.0}px path, {}ms",
            input.coordinates.len(),
            input.path_length(),
            input.duration_ms()
        );
    }

    super::run_pipeline(
        keyboard,
        params,
        args.lexicon.as_deref(),
        args.input_len,
        &input,
        args.json,
    );
}
