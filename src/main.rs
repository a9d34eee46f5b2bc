mod app;
mod cli;
mod config;
mod field;
mod frames;
mod gate;
mod glyph;
mod host;
mod input;
mod logging;
mod overlay;
mod render;
mod surface;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    app::run(args)
}
