//! Fixed screen-space overlay: health bars, pickup counters, throw cooldown and
//! the level label. Everything here is screen coordinates; the world camera
//! does not apply.

use glam::Vec2;

pub const SCREEN_WIDTH: f32 = 1920.0;
pub const BAR_SIZE: Vec2 = Vec2::new(440.0, 140.0);
pub const CHARACTER_BAR_POS: Vec2 = Vec2::new(40.0, 0.0);
pub const BOSS_BAR_POS: Vec2 = Vec2::new(1420.0, 20.0);
pub const COIN_ICON_POS: Vec2 = Vec2::new(40.0, 120.0);
pub const COIN_ICON_SIZE: Vec2 = Vec2::new(130.0, 130.0);
pub const BOTTLE_ICON_POS: Vec2 = Vec2::new(280.0, 142.0);
pub const BOTTLE_ICON_SIZE: Vec2 = Vec2::new(125.0, 105.0);
pub const COIN_COUNTER_POS: Vec2 = Vec2::new(170.0, 217.0);
pub const BOTTLE_COUNTER_POS: Vec2 = Vec2::new(382.0, 217.0);
pub const COOLDOWN_X: f32 = 380.0;
/// The cooldown text rides along with the character, this far below its top.
pub const COOLDOWN_Y_OFFSET: f32 = 160.0;
pub const LABEL_Y: f32 = 125.0;
const LABEL_MARGIN: f32 = 45.0;

pub const COIN_ICON: &str = "img/7_statusbars/3_icons/icon_coin.png";
pub const BOTTLE_ICON: &str = "img/7_statusbars/3_icons/icon_salsa_bottle.png";

const CHARACTER_BAR: [&str; 6] = [
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/0.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/20.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/40.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/60.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/80.png",
    "img/7_statusbars/1_statusbar/2_statusbar_health/green/100.png",
];

const BOSS_BAR: [&str; 6] = [
    "img/7_statusbars/2_statusbar_endboss/orange/orange0.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange20.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange40.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange60.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange80.png",
    "img/7_statusbars/2_statusbar_endboss/orange/orange100.png",
];

/// Quantize a 0..=100 percentage into one of six bar images.
pub fn health_band(percentage: u32) -> usize {
    match percentage {
        0 => 0,
        1..=39 => 1,
        40..=59 => 2,
        60..=79 => 3,
        80..=99 => 4,
        _ => 5,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bar {
    Character,
    Boss,
}

impl Bar {
    pub fn image(self, percentage: u32) -> &'static str {
        let band = health_band(percentage);
        match self {
            Bar::Character => CHARACTER_BAR[band],
            Bar::Boss => BOSS_BAR[band],
        }
    }

    pub fn position(self) -> Vec2 {
        match self {
            Bar::Character => CHARACTER_BAR_POS,
            Bar::Boss => BOSS_BAR_POS,
        }
    }

    pub fn images(self) -> &'static [&'static str] {
        match self {
            Bar::Character => &CHARACTER_BAR,
            Bar::Boss => &BOSS_BAR,
        }
    }
}

/// Live values the surrounding application reads each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub coins: u32,
    pub bottles: u32,
    pub character_health: u32,
    pub boss_health: u32,
    pub boss_band: usize,
    /// Only set once the fight has begun.
    pub boss_bar_visible: bool,
    pub cooldown_remaining_ms: u64,
    pub camera_x: f32,
    pub level_label: String,
}

/// `None` once the cooldown has elapsed.
pub fn cooldown_text(remaining_ms: u64) -> Option<String> {
    (remaining_ms > 0).then(|| format!("{:.1}", remaining_ms as f32 / 1000.0))
}

/// Left edge that centers a label of `text_width` on screen.
pub fn label_x(text_width: f32) -> f32 {
    (SCREEN_WIDTH - text_width - LABEL_MARGIN) / 2.0
}
