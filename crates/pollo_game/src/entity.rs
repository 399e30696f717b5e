//! Placement shared by every game object: where it is, how big it is, and
//! which way it faces. Behaviour lives in the components that sit next to a
//! `Body` inside each entity kind.

use glam::Vec2;

use crate::collision::Rect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// Position is the top-left corner in world pixels, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    /// Direction the artwork is drawn in; facing the other way mirrors it.
    pub native_facing: Facing,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
            facing: Facing::Right,
            native_facing: Facing::Right,
        }
    }

    pub fn drawn_facing(mut self, native: Facing) -> Self {
        self.native_facing = native;
        self.facing = native;
        self
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn is_mirrored(&self) -> bool {
        self.facing != self.native_facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_only_when_facing_differs_from_artwork() {
        let mut body = Body::new(0.0, 0.0, 10.0, 10.0).drawn_facing(Facing::Left);
        assert!(!body.is_mirrored());
        body.facing = Facing::Right;
        assert!(body.is_mirrored());
    }

    #[test]
    fn rect_matches_body_extent() {
        let body = Body::new(220.0, 500.0, 235.0, 460.0);
        let rect = body.rect();
        assert_eq!(rect.right(), 455.0);
        assert_eq!(rect.bottom(), 960.0);
        assert_eq!(body.bottom(), 960.0);
    }
}
