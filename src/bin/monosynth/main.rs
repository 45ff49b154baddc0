//! monosynth - play the engine from the terminal keyboard
//!
//! Run with: cargo run --release
//! Logs go to `monosynth.log` in the temp directory (RUST_LOG to filter).

mod app;
mod ui;

use std::fs::File;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use env_logger::{Env, Target};

use app::App;
use monosynth::SynthConfig;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    init_logging()?;

    App::new(SynthConfig::default()).run()
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging() -> EyreResult<()> {
    let path = std::env::temp_dir().join("monosynth.log");
    let file = File::create(&path).wrap_err_with(|| format!("cannot create {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();

    log::info!("logging to {}", path.display());
    Ok(())
}
