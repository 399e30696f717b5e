//! Thrown bottles.
//!
//! Lifecycle is strictly forward: `Flight` (falling, drifting, spinning) to
//! `Splashing` (frozen in place while the splash track plays) to `Removed`.
//! A splash can be entered once; boss damage from a splash is applied once.

use glam::Vec2;
use pollo_core::cadence::Cadence;

use crate::audio::{Cue, PlayMode};
use crate::context::SimContext;
use crate::entity::{Body, Facing};
use crate::physics::{GroundRule, Kinematics, JUMP_SPEED};
use crate::sprites::{Animator, TrackId};

pub const PROJECTILE_WIDTH: f32 = 156.0;
pub const PROJECTILE_HEIGHT: f32 = 140.0;
pub const DRIFT_TICK_MS: u64 = 25;
pub const DRIFT_STEP: f32 = 30.0;
/// Falling past this line splashes a projectile that hit nothing.
pub const GROUND_SPLASH_Y: f32 = 750.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Ground,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectilePhase {
    Flight,
    Splashing { impact: Impact, damage_applied: bool },
    Removed,
}

pub struct Projectile {
    pub body: Body,
    pub kin: Kinematics,
    pub animator: Animator,
    direction: Facing,
    drift: Cadence,
    phase: ProjectilePhase,
}

impl Projectile {
    pub fn launch(origin: Vec2, direction: Facing, now_ms: u64) -> Self {
        let mut kin = Kinematics::new(0.0, GroundRule::AlwaysAirborne, now_ms);
        kin.speed_y = JUMP_SPEED;
        Self {
            body: Body::new(origin.x, origin.y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            kin,
            animator: Animator::playing(TrackId::BottleRotate),
            direction,
            drift: Cadence::every(DRIFT_TICK_MS, now_ms),
            phase: ProjectilePhase::Flight,
        }
    }

    pub fn phase(&self) -> ProjectilePhase {
        self.phase
    }

    pub fn direction(&self) -> Facing {
        self.direction
    }

    pub fn in_flight(&self) -> bool {
        self.phase == ProjectilePhase::Flight
    }

    pub fn is_removed(&self) -> bool {
        self.phase == ProjectilePhase::Removed
    }

    pub fn update(&mut self, ctx: &mut SimContext) {
        debug_assert!(!self.is_removed(), "update on a removed projectile");
        match self.phase {
            ProjectilePhase::Flight => {
                self.kin.update(&mut self.body, ctx.now_ms);
                if self.drift.fire(ctx.now_ms) {
                    self.body.pos.x += DRIFT_STEP * self.direction.sign();
                }
                self.animator.tick(1, ctx.tracks);
            }
            ProjectilePhase::Splashing { .. } => {
                if self.animator.tick(1, ctx.tracks) {
                    self.phase = ProjectilePhase::Removed;
                }
            }
            ProjectilePhase::Removed => {}
        }
    }

    /// Below the ground line and still flying.
    pub fn hit_ground(&self) -> bool {
        self.in_flight() && self.body.pos.y > GROUND_SPLASH_Y
    }

    /// Start the splash. Only a flying projectile can splash; returns whether
    /// this call started it.
    pub fn splash(&mut self, impact: Impact, ctx: &mut SimContext) -> bool {
        debug_assert!(!self.is_removed(), "splash on a removed projectile");
        if !self.in_flight() {
            return false;
        }
        self.phase = ProjectilePhase::Splashing {
            impact,
            damage_applied: false,
        };
        self.kin.freeze();
        self.drift.cancel();
        self.animator.restart(TrackId::BottleSplash);
        ctx.sound.play(Cue::Splash, PlayMode::FromStart);
        log::debug!("Projectile splashed ({:?}) at x={:.0}", impact, self.body.pos.x);
        true
    }

    /// Claim the boss damage of a boss splash. True exactly once per
    /// projectile, and only after the splash has started.
    pub fn claim_boss_damage(&mut self) -> bool {
        debug_assert!(!self.is_removed(), "damage claim on a removed projectile");
        if self.phase
            == (ProjectilePhase::Splashing {
                impact: Impact::Boss,
                damage_applied: false,
            })
        {
            self.phase = ProjectilePhase::Splashing {
                impact: Impact::Boss,
                damage_applied: true,
            };
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundBoard;
    use crate::sprites::TrackLibrary;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Rig {
        tracks: TrackLibrary,
        sound: SoundBoard,
        rng: SmallRng,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                tracks: TrackLibrary::standard(),
                sound: SoundBoard::silent(),
                rng: SmallRng::seed_from_u64(0),
            }
        }

        fn ctx(&mut self, now_ms: u64) -> SimContext<'_> {
            SimContext {
                now_ms,
                tracks: &self.tracks,
                sound: &mut self.sound,
                rng: &mut self.rng,
            }
        }
    }

    #[test]
    fn drifts_in_throw_direction() {
        let mut rig = Rig::new();
        let mut right = Projectile::launch(Vec2::new(270.0, 660.0), Facing::Right, 0);
        let mut left = Projectile::launch(Vec2::new(270.0, 660.0), Facing::Left, 0);
        for now in 1..=100 {
            right.update(&mut rig.ctx(now));
            left.update(&mut rig.ctx(now));
        }
        assert_eq!(right.body.pos.x, 270.0 + 4.0 * DRIFT_STEP);
        assert_eq!(left.body.pos.x, 270.0 - 4.0 * DRIFT_STEP);
        assert!(right.body.pos.y < 660.0, "starts rising");
    }

    #[test]
    fn splash_is_entered_once_and_freezes_motion() {
        let mut rig = Rig::new();
        let mut p = Projectile::launch(Vec2::new(0.0, 0.0), Facing::Right, 0);
        assert!(p.splash(Impact::Ground, &mut rig.ctx(10)));
        assert!(!p.splash(Impact::Boss, &mut rig.ctx(11)));
        let pos = p.body.pos;
        for now in 11..200 {
            p.update(&mut rig.ctx(now));
        }
        assert_eq!(p.body.pos, pos);
        assert_eq!(rig.sound.play_count(Cue::Splash), 1);
        assert!(!p.claim_boss_damage(), "ground splash never damages the boss");
    }

    #[test]
    fn removed_only_after_six_splash_frames() {
        let mut rig = Rig::new();
        let mut p = Projectile::launch(Vec2::new(0.0, 0.0), Facing::Right, 0);
        p.splash(Impact::Boss, &mut rig.ctx(0));
        let mut seen = Vec::new();
        let mut now = 0;
        while !p.is_removed() {
            now += 1;
            p.update(&mut rig.ctx(now));
            if seen.last() != Some(&p.animator.frame_index()) {
                seen.push(p.animator.frame_index());
            }
            assert!(now <= 1_000);
        }
        assert_eq!(now, 6 * 50);
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn boss_damage_claimed_once() {
        let mut rig = Rig::new();
        let mut p = Projectile::launch(Vec2::new(0.0, 0.0), Facing::Right, 0);
        assert!(!p.claim_boss_damage(), "flying projectile has nothing to claim");
        p.splash(Impact::Boss, &mut rig.ctx(0));
        assert!(p.claim_boss_damage());
        assert!(!p.claim_boss_damage());
    }

    #[test]
    fn falls_below_ground_line_eventually() {
        let mut rig = Rig::new();
        let mut p = Projectile::launch(Vec2::new(270.0, 660.0), Facing::Right, 0);
        let mut now = 0;
        while !p.hit_ground() {
            now += 1;
            p.update(&mut rig.ctx(now));
            assert!(now < 5_000, "never reached the ground line");
        }
        assert!(p.in_flight());
    }
}
