use pollo_core::input::Key;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    /// Synthetic frame time handed to the fixed-step clock.
    #[serde(default = "default_frame_us")]
    pub frame_us: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    /// Keys held down during this frame.
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// One held-key set per rendered frame.
    pub fn expanded(&self) -> Vec<Vec<Key>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(frame.keys.clone());
            }
        }
        out
    }

    /// Walk right for a few seconds, tossing bottles along the way, then stand.
    pub fn builtin() -> Self {
        let frame = |keys: &[Key], repeat: u32| ReplayFrame {
            keys: keys.to_vec(),
            repeat,
        };
        Self {
            frame_us: default_frame_us(),
            frames: vec![
                frame(&[Key::Right], 240),
                frame(&[Key::Right, Key::Space], 2),
                frame(&[Key::Right], 120),
                frame(&[Key::Right, Key::F], 60),
                frame(&[Key::M], 1),
                frame(&[], 30),
                frame(&[Key::M], 1),
                frame(&[Key::Right, Key::F], 240),
                frame(&[], 60),
            ],
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frame_us == 0 {
        return Err("Replay validation failed: frame_us must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_frame_us() -> u64 {
    16_667
}

const fn default_repeat() -> u32 {
    1
}
