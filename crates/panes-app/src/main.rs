// ABOUTME: panes-inspect entry point.
// ABOUTME: Builds or restores a layout headlessly and prints its geometry.

mod cli;
mod preview;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ViewArgs};
use panes_core::{EngineConfig, SessionFile};
use panes_engine::{PaneEngine, Point, Rect, SplitPosition};
use preview::TextProvider;

/// How far the demo drags the outermost divider
const DEMO_DRAG_PIXELS: i32 = 100;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Demo { view, save } => run_demo(config, view, save),
        Command::Show { session, view, json } => run_show(config, session, view, json),
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::load_or_default()),
    }
}

fn engine_for(config: EngineConfig, view: ViewArgs) -> PaneEngine<TextProvider> {
    let mut engine = PaneEngine::new(TextProvider, config);
    engine.set_viewport(Rect::new(0, 0, view.width, view.height));
    engine
}

fn run_demo(config: EngineConfig, view: ViewArgs, save: Option<PathBuf>) -> Result<()> {
    let mut engine = engine_for(config, view);
    let shell = engine.initialize_empty("shell");
    let editor = engine
        .split_focused("editor", SplitPosition::Right)
        .context("Demo split was rejected")?;
    anyhow::ensure!(
        engine.split_pane(editor, "logs", SplitPosition::Bottom, 0.3),
        "Demo split was rejected"
    );
    anyhow::ensure!(
        engine.split_pane(shell, "", SplitPosition::Top, 0.25),
        "Demo split was rejected"
    );

    let root = engine
        .tree()
        .splits()
        .first()
        .map(|split| split.node_id())
        .context("Demo layout has no split")?;
    let divider = engine
        .geometry()
        .dividers
        .get(&root)
        .and_then(|dividers| dividers.first())
        .copied()
        .context("Demo layout has no divider")?;
    let grab = Point::new(divider.x + divider.width / 2, divider.y + divider.height / 2);
    if engine.begin_drag(grab) {
        engine.end_drag(Point::new(grab.x + DEMO_DRAG_PIXELS, grab.y));
    }

    for event in engine.drain_events() {
        tracing::debug!("{:?}", event);
    }

    print_layout(&engine, view);
    println!("History:");
    for entry in engine.history() {
        println!("  {}", entry);
    }

    if let Some(path) = save {
        engine
            .save_session_file(&path)
            .with_context(|| format!("Failed to save session to {}", path.display()))?;
        println!("Saved session to {}", path.display());
    }
    Ok(())
}

fn run_show(config: EngineConfig, session: Option<PathBuf>, view: ViewArgs, json: bool) -> Result<()> {
    let path = session
        .or_else(SessionFile::default_path)
        .context("No session path given and no state directory available")?;

    if json {
        let file = SessionFile::load(&path)
            .with_context(|| format!("Failed to read session {}", path.display()))?;
        println!("{}", file.layout);
        return Ok(());
    }

    let mut engine = engine_for(config, view);
    engine
        .load_session_file(&path)
        .with_context(|| format!("Failed to restore session {}", path.display()))?;
    print_layout(&engine, view);
    Ok(())
}

fn print_layout(engine: &PaneEngine<TextProvider>, view: ViewArgs) {
    let labels = preview::labels(&engine.tree().pane_ids());
    print!("{}", preview::describe(engine));
    println!();
    print!(
        "{}",
        preview::ascii(engine.geometry(), &labels, engine.viewport(), view.cols, view.rows)
    );
    println!();
}
