// ABOUTME: Command-line arguments for panes-inspect.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "panes-inspect")]
#[command(about = "Inspect pane layouts and saved sessions without a window")]
#[command(version)]
pub struct Cli {
    /// Engine config file (defaults to the user config, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a sample layout, drag a divider and print the result
    Demo {
        #[command(flatten)]
        view: ViewArgs,

        /// Also write the resulting session to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print the layout stored in a session file
    Show {
        /// Session file (defaults to the standard session location)
        session: Option<PathBuf>,

        #[command(flatten)]
        view: ViewArgs,

        /// Print the decoded layout document instead of the preview
        #[arg(long)]
        json: bool,
    },
    /// Print the effective engine configuration
    Config,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ViewArgs {
    /// Viewport width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: i32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: i32,

    /// Preview width in characters
    #[arg(long, default_value_t = 80)]
    pub cols: usize,

    /// Preview height in characters
    #[arg(long, default_value_t = 24)]
    pub rows: usize,
}
