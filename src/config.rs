use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shading {
    /// Per-pixel Phong lighting from the glowing cube.
    Phong,
    /// Flat unlit colors.
    Flat,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "glowtext", about = "A glowing cube lighting extruded text")]
pub struct Cli {
    /// Typeface JSON file providing the glyph outlines
    #[arg(long, default_value = "assets/fonts/demo_regular.typeface.json")]
    pub font: PathBuf,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// How the text meshes are shaded
    #[arg(long, value_enum, default_value_t = Shading::Phong)]
    pub shading: Shading,

    /// Directory holding the WGSL shaders, watched for changes
    #[arg(long, default_value = "assets/shaders")]
    pub shader_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["glowtext"]);

        assert_eq!(cli.width, 1280);
        assert_eq!(cli.height, 720);
        assert_eq!(cli.shading, Shading::Phong);
        assert_eq!(cli.log_level(), log::LevelFilter::Info);
        assert!(cli.font.ends_with("demo_regular.typeface.json"));
    }

    #[test]
    fn flat_shading_and_verbose() {
        let cli = Cli::parse_from(["glowtext", "--shading", "flat", "-v", "--font", "x.json"]);

        assert_eq!(cli.shading, Shading::Flat);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
        assert_eq!(cli.font, PathBuf::from("x.json"));
    }

    #[test]
    fn clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
