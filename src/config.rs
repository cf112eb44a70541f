//! Application configuration.
//!
//! [`AppConfig`] carries everything needed to start the viewer. It can be
//! built in code with the setter chain or parsed from the command line via
//! [`Cli`], and is checked by [`AppConfig::validate`] before start-up.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    error::{HearthError, Result},
    scene::flags::{SceneFlags, SceneKind},
};

/// Largest rain field accepted; keeps the per-frame point upload bounded
pub const MAX_RAIN_DROPS: usize = 200_000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub scene: SceneKind,
    pub flags: SceneFlags,
    /// Seed for decorative randomness; the same seed gives the same layout
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub rain_drops: usize,
    /// Directory holding the audio cue files
    pub audio_dir: PathBuf,
    /// Optional OBJ model placed into the family scene
    pub model: Option<PathBuf>,
    pub vsync: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::Family,
            flags: SceneFlags::default(),
            seed: 0x5eed,
            width: 1200,
            height: 800,
            rain_drops: 15_000,
            audio_dir: PathBuf::from("assets/audio"),
            model: None,
            vsync: true,
        }
    }
}

impl AppConfig {
    pub fn with_scene(mut self, scene: SceneKind) -> Self {
        self.scene = scene;
        self
    }

    pub fn with_flags(mut self, flags: SceneFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_rain_drops(mut self, rain_drops: usize) -> Self {
        self.rain_drops = rain_drops;
        self
    }

    pub fn with_audio_dir(mut self, audio_dir: impl Into<PathBuf>) -> Self {
        self.audio_dir = audio_dir.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<PathBuf>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HearthError::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.rain_drops > MAX_RAIN_DROPS {
            return Err(HearthError::Config(format!(
                "rain drop count {} exceeds the maximum of {MAX_RAIN_DROPS}",
                self.rain_drops
            )));
        }
        if let Some(model) = &self.model {
            let is_obj = model
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
            if !is_obj {
                return Err(HearthError::Config(format!(
                    "model {} is not an .obj file",
                    model.display()
                )));
            }
        }
        Ok(())
    }
}

/// Procedural family and robot scenes
#[derive(Debug, Parser)]
#[command(name = "hearth", version, about)]
pub struct Cli {
    /// Scene shown at start-up
    #[arg(long, value_enum, default_value_t = SceneKind::Family)]
    pub scene: SceneKind,

    /// Add the son to the family
    #[arg(long)]
    pub son: bool,

    /// Add the daughter to the family
    #[arg(long)]
    pub daughter: bool,

    /// Add the wife to the family
    #[arg(long)]
    pub wife: bool,

    #[arg(long)]
    pub walking: bool,

    #[arg(long)]
    pub dancing: bool,

    #[arg(long)]
    pub hovering: bool,

    /// Seed for grass, flowers, clouds and other decoration
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    #[arg(long, default_value_t = 800)]
    pub height: u32,

    #[arg(long, default_value_t = 15_000)]
    pub rain_drops: usize,

    /// Directory containing background_music.mp3 and the other cues
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    /// OBJ model to place next to the house
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Wait for vertical sync (pass `--vsync false` to disable)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub vsync: bool,
}

impl Cli {
    pub fn into_config(self) -> AppConfig {
        let defaults = AppConfig::default();
        AppConfig {
            scene: self.scene,
            flags: SceneFlags {
                has_son: self.son,
                has_daughter: self.daughter,
                has_wife: self.wife,
                is_walking: self.walking,
                is_dancing: self.dancing,
                is_hovering: self.hovering,
            },
            seed: self.seed.unwrap_or(defaults.seed),
            width: self.width,
            height: self.height,
            rain_drops: self.rain_drops,
            audio_dir: self.audio_dir.unwrap_or(defaults.audio_dir),
            model: self.model,
            vsync: self.vsync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::default().with_size(0, 600).validate().is_err());
        assert!(AppConfig::default()
            .with_rain_drops(MAX_RAIN_DROPS + 1)
            .validate()
            .is_err());
        assert!(AppConfig::default()
            .with_model("house.gltf")
            .validate()
            .is_err());
        assert!(AppConfig::default()
            .with_model("house.OBJ")
            .validate()
            .is_ok());
    }

    #[test]
    fn cli_flags_map_onto_scene_flags() {
        let cli = Cli::parse_from([
            "hearth", "--scene", "robot", "--son", "--wife", "--hovering", "--seed", "9",
        ]);
        let config = cli.into_config();
        assert_eq!(config.scene, SceneKind::Robot);
        assert!(config.flags.has_son && config.flags.has_wife && config.flags.is_hovering);
        assert!(!config.flags.has_daughter);
        assert_eq!(config.seed, 9);
        assert!(config.vsync);
    }

    #[test]
    fn cli_defaults_match_config_defaults() {
        let config = Cli::parse_from(["hearth"]).into_config();
        assert_eq!(config, AppConfig::default());
    }
}
