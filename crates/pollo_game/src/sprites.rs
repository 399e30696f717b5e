//! Built-in frame tracks and the per-entity animator.
//!
//! Every entity draws exactly one track at a time. The `Animator` owns a
//! single cursor, so switching tracks implicitly stops the previous one: there
//! is never more than one live animation per entity.

use std::path::Path;

use pollo_core::animation::{load_track_file, FrameTrack, Playback, TrackCursor, TrackFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackId {
    CharacterIdle,
    CharacterWalk,
    CharacterJump,
    CharacterHurt,
    CharacterDead,
    HeavyWalk,
    HeavyStand,
    HeavyDead,
    LightWalk,
    LightStand,
    LightDead,
    BossAlert,
    BossWalk,
    BossAttack,
    BossDead,
    BottleRotate,
    BottleSplash,
    CoinShine,
}

impl TrackId {
    pub const ALL: [TrackId; 18] = [
        TrackId::CharacterIdle,
        TrackId::CharacterWalk,
        TrackId::CharacterJump,
        TrackId::CharacterHurt,
        TrackId::CharacterDead,
        TrackId::HeavyWalk,
        TrackId::HeavyStand,
        TrackId::HeavyDead,
        TrackId::LightWalk,
        TrackId::LightStand,
        TrackId::LightDead,
        TrackId::BossAlert,
        TrackId::BossWalk,
        TrackId::BossAttack,
        TrackId::BossDead,
        TrackId::BottleRotate,
        TrackId::BottleSplash,
        TrackId::CoinShine,
    ];

    /// Name used by track override files.
    pub fn name(self) -> &'static str {
        match self {
            TrackId::CharacterIdle => "character_idle",
            TrackId::CharacterWalk => "character_walk",
            TrackId::CharacterJump => "character_jump",
            TrackId::CharacterHurt => "character_hurt",
            TrackId::CharacterDead => "character_dead",
            TrackId::HeavyWalk => "heavy_walk",
            TrackId::HeavyStand => "heavy_stand",
            TrackId::HeavyDead => "heavy_dead",
            TrackId::LightWalk => "light_walk",
            TrackId::LightStand => "light_stand",
            TrackId::LightDead => "light_dead",
            TrackId::BossAlert => "boss_alert",
            TrackId::BossWalk => "boss_walk",
            TrackId::BossAttack => "boss_attack",
            TrackId::BossDead => "boss_dead",
            TrackId::BottleRotate => "bottle_rotate",
            TrackId::BottleSplash => "bottle_splash",
            TrackId::CoinShine => "coin_shine",
        }
    }

    pub fn from_name(name: &str) -> Option<TrackId> {
        Self::ALL.iter().copied().find(|id| id.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Tracks whose last frame ends a lifecycle: a splash being removed, or
    /// the game ending. These must stay hold-last.
    pub fn must_finish(self) -> bool {
        matches!(
            self,
            TrackId::BottleSplash | TrackId::CharacterDead | TrackId::BossDead
        )
    }
}

const PEPE: &str = "img/2_character_pepe";
const CHICKEN: &str = "img/3_enemies_chicken";
const BOSS: &str = "img/4_enemie_boss_chicken";
const BOTTLE: &str = "img/6_salsa_bottle/bottle_rotation";

fn numbered(dir: &str, prefix: &str, range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|i| format!("{dir}/{prefix}{i}.png")).collect()
}

fn track(frames: Vec<String>, frame_ms: u64, playback: Playback) -> FrameTrack {
    FrameTrack {
        frames,
        frame_ms,
        playback,
    }
}

fn still(path: String) -> FrameTrack {
    track(vec![path], 1_000, Playback::HoldLast)
}

/// All tracks the game draws, indexed by `TrackId`.
#[derive(Debug, Clone)]
pub struct TrackLibrary {
    tracks: Vec<FrameTrack>,
}

impl TrackLibrary {
    pub fn standard() -> Self {
        use Playback::{HoldLast, Loop};

        let tracks = TrackId::ALL
            .iter()
            .map(|id| match id {
                TrackId::CharacterIdle => track(
                    numbered(&format!("{PEPE}/1_idle/idle"), "I-", 1..=10),
                    230,
                    Loop,
                ),
                TrackId::CharacterWalk => {
                    track(numbered(&format!("{PEPE}/2_walk"), "W-", 21..=26), 100, Loop)
                }
                TrackId::CharacterJump => {
                    track(numbered(&format!("{PEPE}/3_jump"), "J-", 31..=34), 30, HoldLast)
                }
                TrackId::CharacterHurt => {
                    track(numbered(&format!("{PEPE}/4_hurt"), "H-", 41..=43), 115, Loop)
                }
                TrackId::CharacterDead => {
                    track(numbered(&format!("{PEPE}/5_dead"), "D-", 51..=56), 120, HoldLast)
                }
                TrackId::HeavyWalk => track(
                    (1..=3)
                        .map(|i| format!("{CHICKEN}/chicken_normal/1_walk/{i}_w.png"))
                        .collect(),
                    160,
                    Loop,
                ),
                TrackId::HeavyStand => still(format!("{CHICKEN}/chicken_normal/1_walk/2_w.png")),
                TrackId::HeavyDead => still(format!("{CHICKEN}/chicken_normal/2_dead/dead.png")),
                TrackId::LightWalk => track(
                    (1..=3)
                        .map(|i| format!("{CHICKEN}/chicken_small/1_walk/{i}_w.png"))
                        .collect(),
                    160,
                    Loop,
                ),
                TrackId::LightStand => still(format!("{CHICKEN}/chicken_small/1_walk/2_w.png")),
                TrackId::LightDead => still(format!("{CHICKEN}/chicken_small/2_dead/dead.png")),
                TrackId::BossAlert => {
                    track(numbered(&format!("{BOSS}/2_alert"), "G", 5..=12), 250, HoldLast)
                }
                TrackId::BossWalk => track(numbered(&format!("{BOSS}/1_walk"), "G", 1..=4), 190, Loop),
                TrackId::BossAttack => {
                    track(numbered(&format!("{BOSS}/3_attack"), "G", 18..=19), 190, Loop)
                }
                TrackId::BossDead => {
                    track(numbered(&format!("{BOSS}/5_dead"), "G", 24..=26), 130, HoldLast)
                }
                TrackId::BottleRotate => track(
                    (1..=4)
                        .map(|i| format!("{BOTTLE}/{i}_bottle_rotation.png"))
                        .collect(),
                    30,
                    Loop,
                ),
                TrackId::BottleSplash => track(
                    (1..=6)
                        .map(|i| format!("{BOTTLE}/bottle_splash/{i}_bottle_splash.png"))
                        .collect(),
                    50,
                    HoldLast,
                ),
                TrackId::CoinShine => track(
                    (1..=2).map(|i| format!("img/8_coin/coin_{i}.png")).collect(),
                    750,
                    Loop,
                ),
            })
            .collect();

        Self { tracks }
    }

    pub fn get(&self, id: TrackId) -> &FrameTrack {
        &self.tracks[id.index()]
    }

    /// Replace built-in tracks with the named tracks of `file`. Unknown names
    /// are skipped with a warning. Returns how many tracks were replaced.
    /// Nothing is replaced if any override would loop a track that must
    /// finish.
    pub fn apply_overrides(&mut self, file: &TrackFile) -> Result<usize, String> {
        for (name, track) in &file.tracks {
            if let Some(id) = TrackId::from_name(name) {
                if id.must_finish() && track.playback != Playback::HoldLast {
                    return Err(format!(
                        "Track validation failed: track '{}' must be hold_last",
                        name
                    ));
                }
            }
        }

        let mut replaced = 0;
        for (name, track) in &file.tracks {
            match TrackId::from_name(name) {
                Some(id) => {
                    self.tracks[id.index()] = track.clone();
                    replaced += 1;
                }
                None => log::warn!("Track override '{}' does not name a known track", name),
            }
        }
        Ok(replaced)
    }

    pub fn load_overrides(&mut self, path: &Path) -> Result<usize, String> {
        let file = load_track_file(path)?;
        let replaced = self
            .apply_overrides(&file)
            .map_err(|e| format!("{} ({})", e, path.display()))?;
        log::info!(
            "Loaded {} track override(s) from {}",
            replaced,
            path.display()
        );
        Ok(replaced)
    }

    /// Every frame image referenced by any track.
    pub fn image_keys(&self) -> impl Iterator<Item = &str> {
        self.tracks
            .iter()
            .flat_map(|t| t.frames.iter().map(String::as_str))
    }
}

impl Default for TrackLibrary {
    fn default() -> Self {
        Self::standard()
    }
}

/// One entity's animation state: which track is live and where it is.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    active: Option<TrackId>,
    cursor: TrackCursor,
    restart_on_next_activation: bool,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Animator already showing frame 0 of `id`.
    pub fn playing(id: TrackId) -> Self {
        Self {
            active: Some(id),
            ..Self::default()
        }
    }

    pub fn active(&self) -> Option<TrackId> {
        self.active
    }

    pub fn frame_index(&self) -> usize {
        self.cursor.frame_index
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.finished
    }

    /// The next activation of a hold-last track starts at frame 0.
    pub fn arm_restart(&mut self) {
        self.restart_on_next_activation = true;
    }

    /// Make `id` the live track. Reselecting the live track keeps its
    /// position unless a restart is armed. A hold-last track activated without
    /// a restart resumes parked on its final frame.
    pub fn select(&mut self, id: TrackId, library: &TrackLibrary) {
        let track = library.get(id);
        let hold = track.playback == Playback::HoldLast;

        if self.active == Some(id) && !(hold && self.restart_on_next_activation) {
            return;
        }
        self.active = Some(id);

        if !hold {
            self.cursor.reset();
        } else if self.restart_on_next_activation {
            self.restart_on_next_activation = false;
            self.cursor.reset();
        } else {
            self.cursor.hold_last(track);
        }
    }

    /// Switch to `id` at frame 0 regardless of what was live.
    pub fn restart(&mut self, id: TrackId) {
        self.active = Some(id);
        self.restart_on_next_activation = false;
        self.cursor.reset();
    }

    /// Advance the live track by `dt_ms`. Returns true on the tick a
    /// hold-last track finishes.
    pub fn tick(&mut self, dt_ms: u64, library: &TrackLibrary) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        let was_finished = self.cursor.finished;
        self.cursor.tick(dt_ms, library.get(id));
        !was_finished && self.cursor.finished
    }

    /// Advance the live track by one frame, for controller-stepped tracks.
    pub fn step(&mut self, library: &TrackLibrary) -> usize {
        match self.active {
            Some(id) => self.cursor.step(library.get(id)),
            None => 0,
        }
    }

    /// Image key currently shown.
    pub fn image<'a>(&self, library: &'a TrackLibrary) -> Option<&'a str> {
        self.active
            .map(|id| library.get(id).frame(self.cursor.frame_index))
    }
}
