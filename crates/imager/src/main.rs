//! imager: apply undoable filters to an image file.
//!
//! Reads an image (PNG, JPEG, BMP, WebP), performs a list of edit
//! actions in order, and writes the result as PNG. Actions are filter
//! tokens plus `undo` and `reset`:
//!
//! ```text
//! imager photo.jpg -o out.png -a sepia -a vignette -a jail
//! imager photo.jpg -o out.png -a pixellate=8 -a rotate-right -a undo
//! imager tiny.png --print -a transpose
//! ```
//!
//! Logging goes to stderr. Set `RUST_LOG` (e.g. `RUST_LOG=imager_core=debug`)
//! or pass `-v`, `-vv`, `-vvv` for more detail.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use imager_core::{EditAction, Editor, EditorConfig, codec};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Apply undoable filters to an image file.
///
/// Available actions: invert, transpose, reflect-horizontal,
/// reflect-vertical, rotate-right, rotate-left, greyscale, sepia, jail,
/// vignette, pixellate=N, undo, reset.
#[derive(Parser)]
#[command(name = "imager", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Write the edited image to this path as PNG.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Action to perform; repeat for more. Applied in order.
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    actions: Vec<EditAction>,

    /// Full action script as a JSON array, e.g.
    /// '[{"apply": {"filter": "pixellate", "step": 4}}, "undo"]'.
    /// When set, `--action` flags are ignored.
    #[arg(long, value_name = "JSON")]
    script_json: Option<String>,

    /// Maximum number of versions kept for undo.
    #[arg(long, default_value_t = EditorConfig::DEFAULT_MAX_HISTORY)]
    max_history: usize,

    /// Print the edited pixels as nested rows to stdout.
    #[arg(long)]
    print: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Resolve the action list: `--script-json` wins over `--action`.
fn actions_from_cli(cli: &Cli) -> Result<Vec<EditAction>, String> {
    if let Some(ref json) = cli.script_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --script-json: {e}"));
    }
    Ok(cli.actions.clone())
}

/// Install a stderr subscriber. `-v` flags take precedence over
/// `RUST_LOG`; with neither, only warnings and errors are shown.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let actions = match actions_from_cli(&cli) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };
    info!(path = %cli.input.display(), bytes = image_bytes.len(), "read input");

    let original = match codec::decode(&image_bytes) {
        Ok(buffer) => buffer,
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };

    let config = EditorConfig {
        max_history: cli.max_history,
    };
    let mut editor = match Editor::with_config(original, &config) {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error: --max-history: {e}");
            return ExitCode::FAILURE;
        }
    };

    for (step, action) in actions.iter().enumerate() {
        debug!(step, %action, "performing");
        match editor.perform(action) {
            Ok(true) => {}
            Ok(false) => eprintln!("Nothing to undo at step {} ({action})", step + 1),
            Err(e) => {
                eprintln!("Error at step {} ({action}): {e}", step + 1);
                return ExitCode::FAILURE;
            }
        }
    }

    let current = editor.current();
    if cli.print {
        println!("{current}");
    }

    if let Some(ref path) = cli.output {
        let png = match codec::encode_png(current) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Error encoding output: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = std::fs::write(path, &png) {
            eprintln!("Error writing {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        info!(path = %path.display(), bytes = png.len(), "wrote output");
    }

    eprintln!(
        "Result: {}x{}, {} of {} versions in history",
        current.width(),
        current.height(),
        editor.history().len(),
        editor.history().limit(),
    );
    ExitCode::SUCCESS
}
