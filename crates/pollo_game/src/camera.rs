use glam::Vec2;

/// Horizontal-follow camera. The offset is the translation applied to world
/// coordinates before drawing, so it is negative once the target walks right.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the target pinned at its spawn column on screen.
    pub fn follow(&mut self, target_x: f32, spawn_x: f32) {
        self.offset.x = -target_x + spawn_x;
    }

    pub fn x(&self) -> f32 {
        self.offset.x
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world + self.offset
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.offset
    }
}
