//! CLI entry point for lsr

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use lsr::{CachedIdentity, RootKind, SystemIdentity, TreeWalker, UnixFs, WalkerConfig};
use termcolor::{BufferedStandardStream, ColorChoice};
use tracing::Level;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Resolve the color mode against the environment.
fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return ColorChoice::Never;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return ColorChoice::Always;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return ColorChoice::Never;
            }
            if std::io::stdout().is_terminal() {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lsr")]
#[command(about = "Print stat metadata for a file, or recursively for a directory tree")]
#[command(version)]
struct Args {
    /// File or directory to report on
    path: PathBuf,

    /// Do not list the . and .. entries of each directory
    #[arg(short = 'A', long = "almost-all")]
    almost_all: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log traversal details to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    // clap exits with status 2 on a missing or extra argument
    let args = Args::parse();
    init_logging(args.verbose);

    let config = WalkerConfig {
        show_dot_entries: !args.almost_all,
        ..Default::default()
    };
    let walker = TreeWalker::new(UnixFs, CachedIdentity::new(SystemIdentity)).with_config(config);

    let mut stdout = BufferedStandardStream::stdout(color_choice(args.color));
    let result = walker.list(&args.path, &mut stdout);
    let flushed = stdout.flush();

    match result {
        Ok(RootKind::Other) => {
            eprintln!(
                "lsr: warning: '{}' is not a regular file, directory or symbolic link",
                args.path.display()
            );
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("lsr: {}", e);
            process::exit(e.exit_code());
        }
    }

    if let Err(e) = flushed {
        eprintln!("lsr: error writing output: {}", e);
        process::exit(1);
    }
}
