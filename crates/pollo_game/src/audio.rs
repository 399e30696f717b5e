//! Sound cues and the mute-aware board that forwards them to a player.
//!
//! The board never touches an audio device. It decides *whether* a cue should
//! be heard (mute flag, game over) and hands the survivors to a `CuePlayer`
//! supplied by the host.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Background,
    Walk,
    Jump,
    CharacterHurt,
    HeavyEnemyHurt,
    LightEnemyHurt,
    BossDeath,
    Throw,
    Splash,
    CoinCollect,
    BottleCollect,
}

impl Cue {
    pub fn asset(self) -> &'static str {
        match self {
            Cue::Background => "audio/wind.mp3",
            Cue::Walk => "audio/walkCharacter.mp3",
            Cue::Jump => "audio/jumpCharacter.mp3",
            Cue::CharacterHurt => "audio/characterHurt.mp3",
            Cue::HeavyEnemyHurt => "audio/chickenDamaged.mp3",
            Cue::LightEnemyHurt => "audio/chickDamaged.mp3",
            Cue::BossDeath => "audio/bossChickenDead.mp3",
            Cue::Throw => "audio/trow_sound.mp3",
            Cue::Splash => "audio/glassBroken.mp3",
            Cue::CoinCollect => "audio/collectCoin.mp3",
            Cue::BottleCollect => "audio/collectThrowableObject.mp3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    /// Rewind, then play once.
    FromStart,
    /// Play repeatedly until stopped.
    Loop,
    /// Continue from wherever the cue was left.
    Resume,
}

/// Audio output provided by the host.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue, mode: PlayMode);
    fn stop(&mut self, cue: Cue);
}

/// Player that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct CueRecorder {
    sounding: HashSet<Cue>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sounding(&self, cue: Cue) -> bool {
        self.sounding.contains(&cue)
    }
}

impl CuePlayer for CueRecorder {
    fn play(&mut self, cue: Cue, mode: PlayMode) {
        log::debug!("cue {:?} ({:?}) -> {}", cue, mode, cue.asset());
        if mode == PlayMode::Loop {
            self.sounding.insert(cue);
        }
    }

    fn stop(&mut self, cue: Cue) {
        if self.sounding.remove(&cue) {
            log::debug!("cue {:?} stopped", cue);
        }
    }
}

pub struct SoundBoard {
    player: Box<dyn CuePlayer>,
    muted: bool,
    halted: bool,
    looping: HashSet<Cue>,
    plays: HashMap<Cue, u32>,
}

impl SoundBoard {
    pub fn new(player: Box<dyn CuePlayer>) -> Self {
        Self {
            player,
            muted: false,
            halted: false,
            looping: HashSet::new(),
            plays: HashMap::new(),
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(CueRecorder::new()))
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn play(&mut self, cue: Cue, mode: PlayMode) {
        if self.muted || self.halted {
            return;
        }
        if mode == PlayMode::Loop && !self.looping.insert(cue) {
            return;
        }
        *self.plays.entry(cue).or_default() += 1;
        self.player.play(cue, mode);
    }

    pub fn stop(&mut self, cue: Cue) {
        self.looping.remove(&cue);
        self.player.stop(cue);
    }

    /// True while a looping `cue` is live at the player.
    pub fn is_looping(&self, cue: Cue) -> bool {
        self.looping.contains(&cue)
    }

    /// How many times `cue` actually reached the player.
    pub fn play_count(&self, cue: Cue) -> u32 {
        self.plays.get(&cue).copied().unwrap_or(0)
    }

    pub fn start_background(&mut self) {
        self.play(Cue::Background, PlayMode::Loop);
    }

    /// Muting silences every live loop. Unmuting resumes only the background;
    /// other loops come back when their owner asks for them again.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if muted {
            self.stop_loops();
        } else if !self.halted {
            self.player.play(Cue::Background, PlayMode::Resume);
            self.looping.insert(Cue::Background);
        }
        log::info!("Sound {}", if muted { "muted" } else { "unmuted" });
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    /// Stop everything and ignore all later cues.
    pub fn halt(&mut self) {
        self.stop_loops();
        self.halted = true;
    }

    fn stop_loops(&mut self) {
        let mut live: Vec<Cue> = self.looping.drain().collect();
        live.sort_by_key(|cue| *cue as u8);
        for cue in live {
            self.player.stop(cue);
        }
    }
}
