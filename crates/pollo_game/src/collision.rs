//! Overlap tests and the three collision passes.
//!
//! Every test is a strict axis-aligned overlap between two rectangles after
//! each has been shrunk by its own per-side insets. Insets differ per pair of
//! entity kinds, so they live in the pair constants below rather than on the
//! entities.
//!
//! The passes run on their own cadences inside the world step:
//!  - **contacts** (16 ms): character against enemies, stomp or damage
//!  - **impacts** (100 ms): projectiles against the boss and the ground
//!  - **pickups** (100 ms): character against coins and ground bottles

use pollo_core::cadence::Cadence;

use crate::audio::{Cue, PlayMode};
use crate::boss::Boss;
use crate::character::{Character, STOMP_ALTITUDE_Y};
use crate::collectible::{Coin, GroundBottle, Inventory};
use crate::context::SimContext;
use crate::enemy::Enemy;
use crate::entity::Body;
use crate::projectile::{Impact, Projectile};

pub const CONTACT_TICK_MS: u64 = 16;
pub const IMPACT_TICK_MS: u64 = 100;
pub const PICKUP_TICK_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Shrink each side by its inset. Negative insets grow the side.
    pub fn inset(&self, insets: Insets) -> Rect {
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            w: self.w - insets.left - insets.right,
            h: self.h - insets.top - insets.bottom,
        }
    }

    /// Strict overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    pub const NONE: Insets = Insets::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Insets for one pair of entity kinds: `first` applies to the first body,
/// `second` to the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairInsets {
    pub first: Insets,
    pub second: Insets,
}

impl PairInsets {
    pub fn overlap(&self, a: &Body, b: &Body) -> bool {
        a.rect().inset(self.first).overlaps(&b.rect().inset(self.second))
    }
}

pub const CHARACTER_COIN: PairInsets = PairInsets {
    first: Insets::new(145.0, 145.0, 0.0, 0.0),
    second: Insets::new(0.0, 0.0, 70.0, 290.0),
};

pub const CHARACTER_BOTTLE: PairInsets = PairInsets {
    first: Insets::new(140.0, 140.0, 48.0, 48.0),
    second: Insets::NONE,
};

pub const CHARACTER_ENEMY: PairInsets = PairInsets {
    first: Insets::new(80.0, 80.0, 0.0, 90.0),
    second: Insets::new(0.0, 0.0, 0.0, 90.0),
};

/// Both right edges pulled in by 185; full height.
pub const PROJECTILE_BOSS: PairInsets = PairInsets {
    first: Insets::new(0.0, 185.0, 0.0, 0.0),
    second: Insets::new(0.0, 185.0, 0.0, 0.0),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    Stomp,
    Damage,
    Nothing,
}

/// Decide what an overlap between the character and a living enemy means.
///
/// Stomp needs all three: the character is airborne, its feet are above the
/// enemy's feet, and the stomp altitude was latched. Failing that, the
/// character takes damage when grounded, or when above the enemy while the
/// boss still lives.
pub fn enemy_contact_outcome(
    character: &Body,
    character_airborne: bool,
    enemy: &Body,
    stomp_latched: bool,
    boss_dead: bool,
) -> ContactOutcome {
    if character_airborne && character.bottom() < enemy.bottom() && stomp_latched {
        ContactOutcome::Stomp
    } else if !character_airborne || (character.pos.y < enemy.pos.y && !boss_dead) {
        ContactOutcome::Damage
    } else {
        ContactOutcome::Nothing
    }
}

/// The three pass cadences.
#[derive(Debug, Clone)]
pub struct CollisionSchedule {
    contacts: Cadence,
    impacts: Cadence,
    pickups: Cadence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuePasses {
    pub contacts: bool,
    pub impacts: bool,
    pub pickups: bool,
}

impl CollisionSchedule {
    pub fn new(now_ms: u64) -> Self {
        Self {
            contacts: Cadence::every(CONTACT_TICK_MS, now_ms),
            impacts: Cadence::every(IMPACT_TICK_MS, now_ms),
            pickups: Cadence::every(PICKUP_TICK_MS, now_ms),
        }
    }

    pub fn due(&mut self, now_ms: u64) -> DuePasses {
        DuePasses {
            contacts: self.contacts.fire(now_ms),
            impacts: self.impacts.fire(now_ms),
            pickups: self.pickups.fire(now_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactReport {
    pub stomps: u32,
    pub hits: u32,
}

/// Contacts pass. `stomp_latch` is the altitude latch shared across ticks.
pub fn resolve_enemy_contacts(
    character: &mut Character,
    enemies: &mut [Enemy],
    stomp_latch: &mut bool,
    boss_dead: bool,
    enemy_damage: u32,
    ctx: &mut SimContext,
) -> ContactReport {
    let mut report = ContactReport::default();
    for enemy in enemies.iter_mut() {
        let touching = !enemy.is_dead()
            && !character.is_dead()
            && CHARACTER_ENEMY.overlap(&character.body, &enemy.body);

        if !touching {
            if character.body.pos.y < STOMP_ALTITUDE_Y {
                *stomp_latch = true;
            }
            continue;
        }

        match enemy_contact_outcome(
            &character.body,
            character.is_airborne(),
            &enemy.body,
            *stomp_latch,
            boss_dead,
        ) {
            ContactOutcome::Stomp => {
                character.stomp_bounce(ctx);
                ctx.sound.play(enemy.kind.hurt_cue(), PlayMode::FromStart);
                enemy.kill(ctx);
                report.stomps += 1;
            }
            ContactOutcome::Damage => {
                character.take_hit(enemy_damage, ctx);
                *stomp_latch = false;
                report.hits += 1;
            }
            ContactOutcome::Nothing => {}
        }
    }
    report
}

/// Impacts pass. The first overlap with the boss splashes a flying
/// projectile; a later overlap of that splash deals the damage, once.
pub fn resolve_projectile_impacts(
    projectiles: &mut [Projectile],
    boss: &mut Boss,
    character_alive: bool,
    throw_damage: u32,
    ctx: &mut SimContext,
) {
    for projectile in projectiles.iter_mut().filter(|p| !p.is_removed()) {
        if PROJECTILE_BOSS.overlap(&projectile.body, &boss.body) {
            if projectile.in_flight() {
                projectile.splash(Impact::Boss, ctx);
            } else if character_alive && projectile.claim_boss_damage() {
                boss.strike(throw_damage, ctx.now_ms);
            }
        } else if projectile.hit_ground() {
            projectile.splash(Impact::Ground, ctx);
        }
    }
}

/// Pickups pass. Anything touched disappears at once.
pub fn collect_pickups(
    character: &Character,
    coins: &mut Vec<Coin>,
    bottles: &mut Vec<GroundBottle>,
    inventory: &mut Inventory,
    ctx: &mut SimContext,
) {
    coins.retain(|coin| {
        if CHARACTER_COIN.overlap(&character.body, &coin.body) {
            inventory.coins += 1;
            ctx.sound.play(Cue::CoinCollect, PlayMode::FromStart);
            false
        } else {
            true
        }
    });
    bottles.retain(|bottle| {
        if CHARACTER_BOTTLE.overlap(&character.body, &bottle.body) {
            inventory.bottles += 1;
            ctx.sound.play(Cue::BottleCollect, PlayMode::FromStart);
            false
        } else {
            true
        }
    });
}
