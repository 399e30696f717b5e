//! Frame tracks and deterministic track playback.
//!
//! A track is an ordered list of image keys advanced at a fixed cadence. Two
//! playback modes exist: `Loop` wraps back to frame 0, `HoldLast` stops on the
//! final frame and reports `finished`. Timing is integer milliseconds of
//! simulation time, so playback never drifts between runs.
//!
//! Track files store the same data as JSON; on load every track is validated
//! before any of them is accepted.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    Loop,
    HoldLast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameTrack {
    pub frames: Vec<String>,
    pub frame_ms: u64,
    pub playback: Playback,
}

impl FrameTrack {
    pub fn new(frames: &[&str], frame_ms: u64, playback: Playback) -> Self {
        Self {
            frames: frames.iter().map(|f| f.to_string()).collect(),
            frame_ms,
            playback,
        }
    }

    /// Image key of `index`, clamped to the last frame.
    pub fn frame(&self, index: usize) -> &str {
        self.frames
            .get(index)
            .or_else(|| self.frames.last())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Time from activation until a `HoldLast` track reports finished.
    pub fn total_duration_ms(&self) -> u64 {
        self.frame_ms * self.frames.len() as u64
    }
}

/// Playback position inside one track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackCursor {
    pub frame_index: usize,
    pub elapsed_ms: u64,
    pub finished: bool,
}

impl TrackCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Park on the final frame as if the track had already played out.
    pub fn hold_last(&mut self, track: &FrameTrack) {
        self.frame_index = track.len().saturating_sub(1);
        self.elapsed_ms = 0;
        self.finished = track.playback == Playback::HoldLast;
    }

    /// Advance by `dt_ms` of simulation time. Returns the frame index now shown.
    pub fn tick(&mut self, dt_ms: u64, track: &FrameTrack) -> usize {
        if track.is_empty() || self.finished || track.frame_ms == 0 {
            return self.frame_index;
        }

        self.elapsed_ms += dt_ms;
        while self.elapsed_ms >= track.frame_ms {
            self.elapsed_ms -= track.frame_ms;
            self.frame_index += 1;

            if self.frame_index >= track.len() {
                match track.playback {
                    Playback::Loop => self.frame_index = 0,
                    Playback::HoldLast => {
                        self.frame_index = track.len() - 1;
                        self.elapsed_ms = 0;
                        self.finished = true;
                        break;
                    }
                }
            }
        }
        self.frame_index
    }

    /// Advance exactly one frame, for tracks stepped by an outside controller
    /// rather than by elapsed time.
    pub fn step(&mut self, track: &FrameTrack) -> usize {
        if track.is_empty() {
            return 0;
        }
        match track.playback {
            Playback::Loop => self.frame_index = (self.frame_index + 1) % track.len(),
            Playback::HoldLast => {
                if self.frame_index + 1 < track.len() {
                    self.frame_index += 1;
                } else {
                    self.finished = true;
                }
            }
        }
        self.frame_index
    }
}

/// Parsed track file: named tracks that override built-in ones.
#[derive(Debug, Clone)]
pub struct TrackFile {
    pub version: String,
    pub tracks: HashMap<String, FrameTrack>,
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct TrackFileJson {
    version: String,
    tracks: HashMap<String, FrameTrackJson>,
}

#[derive(Debug, Deserialize)]
struct FrameTrackJson {
    frames: Vec<String>,
    frame_ms: u64,
    #[serde(default = "default_playback")]
    mode: Playback,
}

pub fn load_track_file(path: &Path) -> Result<TrackFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read track file {}: {e}", path.display()))?;
    parse_track_file(&raw).map_err(|e| format!("{} ({})", e, path.display()))
}

pub fn parse_track_file(raw: &str) -> Result<TrackFile, String> {
    let json: TrackFileJson =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse track file: {e}"))?;
    validate_track_json(&json)?;

    let tracks = json
        .tracks
        .into_iter()
        .map(|(name, t)| {
            (
                name,
                FrameTrack {
                    frames: t.frames,
                    frame_ms: t.frame_ms,
                    playback: t.mode,
                },
            )
        })
        .collect();

    Ok(TrackFile {
        version: json.version,
        tracks,
    })
}

fn validate_track_json(json: &TrackFileJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Track validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.tracks.is_empty() {
        return Err("Track validation failed: tracks map is empty".to_string());
    }
    for (name, track) in &json.tracks {
        if track.frames.is_empty() {
            return Err(format!(
                "Track validation failed: track '{}' has no frames",
                name
            ));
        }
        if let Some(i) = track.frames.iter().position(|f| f.is_empty()) {
            return Err(format!(
                "Track validation failed: track '{}' frame {} is empty",
                name, i
            ));
        }
        if track.frame_ms == 0 {
            return Err(format!(
                "Track validation failed: track '{}' has zero frame_ms",
                name
            ));
        }
    }
    Ok(())
}

const fn default_playback() -> Playback {
    Playback::Loop
}
