use clap::{Parser, Subcommand};
use glidetype::keyboard::KeyboardLayout;
use std::process;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Letter-block width in pixels for the built-in QWERTY geometry.
    #[arg(global = true, long, default_value_t = 1080.0)]
    kb_width: f32,

    /// Letter-block height in pixels for the built-in QWERTY geometry.
    #[arg(global = true, long, default_value_t = 320.0)]
    kb_height: f32,

    /// Load a keyboard geometry JSON instead of the built-in QWERTY.
    #[arg(global = true, short, long)]
    keyboard: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Predict(cmd::predict::PredictArgs),
    Simulate(cmd::simulate::SimulateArgs),
    Classify(cmd::classify::ClassifyArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let keyboard = match &cli.keyboard {
        Some(path) => KeyboardLayout::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("❌ Failed to load keyboard '{}': {}", path, e);
            process::exit(1);
        }),
        None => KeyboardLayout::qwerty(cli.kb_width, cli.kb_height),
    };

    match cli.command {
        Commands::Predict(args) => cmd::predict::run(args, keyboard),
        Commands::Simulate(args) => cmd::simulate::run(args, keyboard),
        Commands::Classify(args) => cmd::classify::run(args, keyboard),
    }
}
