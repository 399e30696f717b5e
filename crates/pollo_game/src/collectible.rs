//! Pickups: coins floating in the air and throwables lying on the ground.

use rand::Rng;

use crate::context::SimContext;
use crate::entity::Body;
use crate::sprites::{Animator, TrackId};

pub const COIN_SIZE: f32 = 240.0;
pub const BOTTLE_SIZE: f32 = 140.0;
pub const BOTTLE_Y: f32 = 830.0;

const BOTTLE_ART: [&str; 2] = [
    "img/6_salsa_bottle/1_salsa_bottle_on_ground.png",
    "img/6_salsa_bottle/2_salsa_bottle_on_ground.png",
];

/// What the character has picked up so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    pub coins: u32,
    pub bottles: u32,
}

pub struct Coin {
    pub body: Body,
    pub animator: Animator,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, COIN_SIZE, COIN_SIZE),
            animator: Animator::playing(TrackId::CoinShine),
        }
    }

    pub fn update(&mut self, ctx: &mut SimContext) {
        self.animator.tick(1, ctx.tracks);
    }
}

pub struct GroundBottle {
    pub body: Body,
    pub image: &'static str,
}

impl GroundBottle {
    pub fn new(x: f32, image: &'static str) -> Self {
        Self {
            body: Body::new(x, BOTTLE_Y, BOTTLE_SIZE, BOTTLE_SIZE),
            image,
        }
    }

    pub fn art() -> &'static [&'static str] {
        &BOTTLE_ART
    }
}

/// Picks bottle art so that two bottles placed one after another never share
/// the same image. The first pick is random.
#[derive(Debug, Default)]
pub struct BottleArtPicker {
    last: Option<usize>,
}

impl BottleArtPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &'static str {
        let candidates: Vec<usize> = (0..BOTTLE_ART.len())
            .filter(|&i| Some(i) != self.last)
            .collect();
        let pick = candidates[rng.gen_range(0..candidates.len())];
        self.last = Some(pick);
        BOTTLE_ART[pick]
    }
}
