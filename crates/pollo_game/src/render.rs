//! Frame drawing against an abstract 2D surface.
//!
//! The world is drawn in camera space, the HUD in screen space. Images are
//! looked up in an `ImageCache`; an image that has not finished loading is
//! reported as `DrawOutcome::Pending` and skipped rather than drawn.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::entity::Body;
use crate::hud::{
    self, Bar, BAR_SIZE, BOTTLE_COUNTER_POS, BOTTLE_ICON, BOTTLE_ICON_POS, BOTTLE_ICON_SIZE,
    COIN_COUNTER_POS, COIN_ICON, COIN_ICON_POS, COIN_ICON_SIZE, COOLDOWN_X, COOLDOWN_Y_OFFSET,
    LABEL_Y,
};
use crate::world::World;

/// Alternating on/off period of the boss hurt flash.
pub const HURT_BLINK_MS: u64 = 100;
pub const COUNTER_TEXT_SIZE: f32 = 70.0;
pub const COOLDOWN_TEXT_SIZE: f32 = 60.0;
pub const LABEL_TEXT_SIZE: f32 = 90.0;

/// A 2D raster target with canvas-style transforms.
pub trait Surface {
    fn clear(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn draw_image(&mut self, image: &str, x: f32, y: f32, w: f32, h: f32);
    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32);

    /// Width of `text` at `size`. Surfaces with real fonts should override.
    fn measure_text(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    Pending,
}

/// Load state of every image the game may draw.
#[derive(Debug, Default)]
pub struct ImageCache {
    states: HashMap<String, ImageState>,
    warned: HashSet<String>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every image a world can draw, all pending.
    pub fn for_world(world: &World) -> Self {
        let mut cache = Self::new();
        for key in world.tracks().image_keys() {
            cache.register(key);
        }
        for backdrop in &world.level.backdrops {
            cache.register(&backdrop.image);
        }
        for cloud in &world.level.clouds {
            cache.register(cloud.image());
        }
        for bottle in &world.level.bottles {
            cache.register(bottle.image);
        }
        for bar in [Bar::Character, Bar::Boss] {
            for image in bar.images() {
                cache.register(image);
            }
        }
        cache.register(COIN_ICON);
        cache.register(BOTTLE_ICON);
        cache
    }

    pub fn register(&mut self, key: &str) {
        self.states
            .entry(key.to_string())
            .or_insert(ImageState::Pending);
    }

    pub fn mark_ready(&mut self, key: &str) {
        self.states.insert(key.to_string(), ImageState::Ready);
    }

    pub fn mark_all_ready(&mut self) {
        for state in self.states.values_mut() {
            *state = ImageState::Ready;
        }
    }

    /// Unknown keys are pending.
    pub fn state(&self, key: &str) -> ImageState {
        self.states
            .get(key)
            .copied()
            .unwrap_or(ImageState::Pending)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn check(&mut self, key: &str) -> DrawOutcome {
        match self.state(key) {
            ImageState::Ready => DrawOutcome::Drawn,
            ImageState::Pending => {
                if self.warned.insert(key.to_string()) {
                    log::warn!("Image '{}' drawn before it finished loading", key);
                }
                DrawOutcome::Pending
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Translate(f32, f32),
    Scale(f32, f32),
    Save,
    Restore,
    Image {
        key: String,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
    },
}

/// Surface that records what it was asked to do. `clear` starts a new frame.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { key, .. } => Some(key.as_str()),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Translation still in effect after the recorded commands, honoring
    /// save/restore.
    pub fn net_translation(&self) -> Vec2 {
        let mut current = Vec2::ZERO;
        let mut saved = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::Translate(dx, dy) => current += Vec2::new(*dx, *dy),
                DrawCommand::Save => saved.push(current),
                DrawCommand::Restore => {
                    if let Some(previous) = saved.pop() {
                        current = previous;
                    }
                }
                _ => {}
            }
        }
        current
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale(sx, sy));
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn draw_image(&mut self, image: &str, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(DrawCommand::Image {
            key: image.to_string(),
            x,
            y,
            w,
            h,
        });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            size,
        });
    }
}

/// Per-frame draw counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: u32,
    pub pending: u32,
}

impl FrameStats {
    fn record(&mut self, outcome: DrawOutcome) {
        match outcome {
            DrawOutcome::Drawn => self.drawn += 1,
            DrawOutcome::Pending => self.pending += 1,
        }
    }
}

/// Draw `image` over `body`, mirrored when the body faces away from its art.
pub fn draw_body(
    surface: &mut dyn Surface,
    images: &mut ImageCache,
    image: &str,
    body: &Body,
) -> DrawOutcome {
    let outcome = images.check(image);
    if outcome == DrawOutcome::Pending {
        return outcome;
    }
    let (x, y, w, h) = (body.pos.x, body.pos.y, body.size.x, body.size.y);
    if body.is_mirrored() {
        surface.save();
        surface.translate(w, 0.0);
        surface.scale(-1.0, 1.0);
        surface.draw_image(image, -x, y, w, h);
        surface.restore();
    } else {
        surface.draw_image(image, x, y, w, h);
    }
    outcome
}

fn draw_screen_image(
    surface: &mut dyn Surface,
    images: &mut ImageCache,
    image: &str,
    pos: Vec2,
    size: Vec2,
) -> DrawOutcome {
    let outcome = images.check(image);
    if outcome == DrawOutcome::Drawn {
        surface.draw_image(image, pos.x, pos.y, size.x, size.y);
    }
    outcome
}

/// Draw one frame of `world`.
pub fn render_frame(world: &World, surface: &mut dyn Surface, images: &mut ImageCache) -> FrameStats {
    let mut stats = FrameStats::default();
    let tracks = world.tracks();
    let camera_x = world.camera.x();
    let now = world.now_ms();

    surface.clear();
    surface.translate(camera_x, 0.0);

    for backdrop in &world.level.backdrops {
        stats.record(draw_body(surface, images, &backdrop.image, &backdrop.body));
    }
    for cloud in &world.level.clouds {
        stats.record(draw_body(surface, images, cloud.image(), &cloud.body));
    }
    for coin in &world.level.coins {
        if let Some(image) = coin.animator.image(tracks) {
            stats.record(draw_body(surface, images, image, &coin.body));
        }
    }
    for bottle in &world.level.bottles {
        stats.record(draw_body(surface, images, bottle.image, &bottle.body));
    }
    for enemy in &world.level.enemies {
        if let Some(image) = enemy.animator.image(tracks) {
            stats.record(draw_body(surface, images, image, &enemy.body));
        }
    }

    let boss = &world.level.boss;
    let blink_off = boss.is_hurt(now) && (now / HURT_BLINK_MS) % 2 == 1;
    if !blink_off {
        if let Some(image) = boss.animator.image(tracks) {
            stats.record(draw_body(surface, images, image, &boss.body));
        }
    }

    if let Some(image) = world.character.animator.image(tracks) {
        stats.record(draw_body(surface, images, image, &world.character.body));
    }
    for projectile in &world.projectiles {
        if let Some(image) = projectile.animator.image(tracks) {
            stats.record(draw_body(surface, images, image, &projectile.body));
        }
    }

    surface.translate(-camera_x, 0.0);
    draw_overlay(world, surface, images, &mut stats);
    surface.translate(camera_x, 0.0);

    surface.translate(-camera_x, 0.0);
    stats
}

fn draw_overlay(
    world: &World,
    surface: &mut dyn Surface,
    images: &mut ImageCache,
    stats: &mut FrameStats,
) {
    let snapshot = world.hud();

    stats.record(draw_screen_image(
        surface,
        images,
        Bar::Character.image(snapshot.character_health),
        Bar::Character.position(),
        BAR_SIZE,
    ));
    if snapshot.boss_bar_visible {
        stats.record(draw_screen_image(
            surface,
            images,
            Bar::Boss.image(snapshot.boss_health),
            Bar::Boss.position(),
            BAR_SIZE,
        ));
    }

    stats.record(draw_screen_image(
        surface,
        images,
        COIN_ICON,
        COIN_ICON_POS,
        COIN_ICON_SIZE,
    ));
    stats.record(draw_screen_image(
        surface,
        images,
        BOTTLE_ICON,
        BOTTLE_ICON_POS,
        BOTTLE_ICON_SIZE,
    ));
    surface.draw_text(
        &snapshot.coins.to_string(),
        COIN_COUNTER_POS.x,
        COIN_COUNTER_POS.y,
        COUNTER_TEXT_SIZE,
    );
    surface.draw_text(
        &snapshot.bottles.to_string(),
        BOTTLE_COUNTER_POS.x,
        BOTTLE_COUNTER_POS.y,
        COUNTER_TEXT_SIZE,
    );

    if let Some(text) = hud::cooldown_text(snapshot.cooldown_remaining_ms) {
        surface.draw_text(
            &text,
            COOLDOWN_X,
            world.character.body.pos.y + COOLDOWN_Y_OFFSET,
            COOLDOWN_TEXT_SIZE,
        );
    }

    let width = surface.measure_text(&snapshot.level_label, LABEL_TEXT_SIZE);
    surface.draw_text(
        &snapshot.level_label,
        hud::label_x(width),
        LABEL_Y,
        LABEL_TEXT_SIZE,
    );
}
