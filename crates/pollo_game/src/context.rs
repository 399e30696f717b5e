//! Per-step simulation context threaded through every entity update.

use rand::rngs::SmallRng;

use crate::audio::SoundBoard;
use crate::sprites::TrackLibrary;

pub struct SimContext<'a> {
    /// Simulation time in milliseconds since the world started.
    pub now_ms: u64,
    pub tracks: &'a TrackLibrary,
    pub sound: &'a mut SoundBoard,
    pub rng: &'a mut SmallRng,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Win,
    Lose,
}

impl GameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Win => "win",
            GameStatus::Lose => "lose",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GameOver(GameStatus),
}
