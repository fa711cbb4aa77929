use anyhow::Result;
use clap::Parser;

mod camera;
mod config;
mod demo;
mod engine;
mod font;
mod geometry;
mod input;
mod model;
mod rendering;
mod scene_graph;
mod window;

fn main() -> Result<()> {
    let cli = config::Cli::parse();

    pretty_env_logger::formatted_builder()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    pollster::block_on(window::run(cli))?;

    Ok(())
}
