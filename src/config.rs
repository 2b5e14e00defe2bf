/// Command-line surface and the plain configuration the core consumes.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::entities::World;

pub const DEFAULT_MAX_LIVES: u32 = 3;
pub const DEFAULT_WORLD_WIDTH: u32 = 1280;
pub const DEFAULT_WORLD_HEIGHT: u32 = 720;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameMode {
    /// `max_lives` lives and an aim guide line.
    Classic,
    /// One life, no aim guide.
    Hardcore,
}

impl GameMode {
    pub fn starting_lives(self, max_lives: u32) -> u32 {
        match self {
            GameMode::Classic => max_lives,
            GameMode::Hardcore => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub world: World,
    pub max_lives: u32,
    pub game_mode: GameMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: World::new(DEFAULT_WORLD_WIDTH as f32, DEFAULT_WORLD_HEIGHT as f32),
            max_lives: DEFAULT_MAX_LIVES,
            game_mode: GameMode::Hardcore,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "space_shooter")]
#[command(about = "Single-screen arcade shooter for the terminal")]
pub struct Cli {
    /// Starting game mode (can be changed from the menu)
    #[arg(long, value_enum, default_value_t = GameMode::Hardcore)]
    pub mode: GameMode,

    /// Lives per run in classic mode
    #[arg(long, default_value_t = DEFAULT_MAX_LIVES, value_parser = clap::value_parser!(u32).range(1..))]
    pub lives: u32,

    /// Logical world width
    #[arg(long, default_value_t = DEFAULT_WORLD_WIDTH, value_parser = clap::value_parser!(u32).range(200..))]
    pub width: u32,

    /// Logical world height
    #[arg(long, default_value_t = DEFAULT_WORLD_HEIGHT, value_parser = clap::value_parser!(u32).range(300..))]
    pub height: u32,

    /// JSON file holding the best score
    #[arg(long, default_value = "scores.json")]
    pub score_file: PathBuf,

    /// Plain-text file shown on the about screen
    #[arg(long, default_value = "info.txt")]
    pub description_file: PathBuf,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (the terminal is busy drawing the game)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            world: World::new(self.width as f32, self.height as f32),
            max_lives: self.lives,
            game_mode: self.mode,
        }
    }
}
