//! Wandering enemies.
//!
//! Each enemy re-draws an activity (walk left, walk right, stand) on its own
//! randomized cadence. Light enemies additionally hop on a second random
//! cadence. Killing an enemy cancels both and arms the despawn deadline; the
//! world drops the enemy once that deadline has fired.

use pollo_core::cadence::{Cadence, Deadline, Jitter, RandomCadence};
use rand::Rng;

use crate::audio::Cue;
use crate::context::SimContext;
use crate::entity::{Body, Facing};
use crate::physics::{GroundRule, Kinematics};
use crate::sprites::{Animator, TrackId};

pub const ENEMY_Y: f32 = 830.0;
pub const MOVE_TICK_MS: u64 = 16;
/// How long a dead enemy keeps showing its dead frame.
pub const DESPAWN_DELAY_MS: u64 = 15_000;
const SPAWN_BASE_X: f32 = 800.0;
const MIN_SPEED: f32 = 0.4;

const ACTIVITY_JITTER: &[Jitter] = &[
    Jitter::new(500.0, 1000.0),
    Jitter::new(200.0, 1000.0),
    Jitter::new(200.0, 1000.0),
];
const HOP_JITTER: &[Jitter] = &[Jitter::new(500.0, 2000.0), Jitter::new(200.0, 1000.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Heavy,
    Light,
}

impl EnemyKind {
    pub fn size(self) -> (f32, f32) {
        match self {
            EnemyKind::Heavy => (90.0, 120.0),
            EnemyKind::Light => (120.0, 120.0),
        }
    }

    pub fn hops(self) -> bool {
        self == EnemyKind::Light
    }

    pub fn hurt_cue(self) -> Cue {
        match self {
            EnemyKind::Heavy => Cue::HeavyEnemyHurt,
            EnemyKind::Light => Cue::LightEnemyHurt,
        }
    }

    fn walk_track(self) -> TrackId {
        match self {
            EnemyKind::Heavy => TrackId::HeavyWalk,
            EnemyKind::Light => TrackId::LightWalk,
        }
    }

    fn stand_track(self) -> TrackId {
        match self {
            EnemyKind::Heavy => TrackId::HeavyStand,
            EnemyKind::Light => TrackId::LightStand,
        }
    }

    fn dead_track(self) -> TrackId {
        match self {
            EnemyKind::Heavy => TrackId::HeavyDead,
            EnemyKind::Light => TrackId::LightDead,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Left,
    Right,
    Idle,
    Dead,
}

pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Body,
    pub kin: Kinematics,
    pub animator: Animator,
    activity: Activity,
    wander: RandomCadence,
    hop: Option<RandomCadence>,
    movement: Cadence,
    despawn: Deadline,
    despawned: bool,
}

impl Enemy {
    /// Random placement somewhere past the start of a level ending at
    /// `level_end_x`, walking at up to `0.4 + max_speed`.
    pub fn spawn<R: Rng + ?Sized>(
        kind: EnemyKind,
        level_end_x: f32,
        max_speed: f32,
        now_ms: u64,
        rng: &mut R,
    ) -> Self {
        let x = SPAWN_BASE_X + rng.gen::<f32>() * level_end_x;
        let speed = MIN_SPEED + rng.gen::<f32>() * max_speed;
        Self::at(kind, x, speed, now_ms, rng)
    }

    pub fn at<R: Rng + ?Sized>(kind: EnemyKind, x: f32, speed: f32, now_ms: u64, rng: &mut R) -> Self {
        let (w, h) = kind.size();
        let body = Body::new(x, ENEMY_Y, w, h).drawn_facing(Facing::Left);
        let kin = if kind.hops() {
            Kinematics::new(speed, GroundRule::Line(ENEMY_Y), now_ms)
        } else {
            Kinematics::grounded(speed, ENEMY_Y)
        };
        let wander = RandomCadence::new(ACTIVITY_JITTER, now_ms, rng);
        let hop = if kind.hops() {
            Some(RandomCadence::new(HOP_JITTER, now_ms, rng))
        } else {
            None
        };
        let mut enemy = Self {
            kind,
            body,
            kin,
            animator: Animator::playing(kind.stand_track()),
            activity: Activity::Idle,
            wander,
            hop,
            movement: Cadence::every(MOVE_TICK_MS, now_ms),
            despawn: Deadline::new(),
            despawned: false,
        };
        enemy.choose_activity(rng);
        enemy
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_dead(&self) -> bool {
        self.activity == Activity::Dead
    }

    /// True once the dead frame has been shown long enough.
    pub fn is_removable(&self) -> bool {
        self.despawned
    }

    /// Force an activity, keeping facing consistent with it.
    pub fn set_activity(&mut self, activity: Activity) {
        debug_assert!(activity != Activity::Dead, "use kill() to kill an enemy");
        self.activity = activity;
        match activity {
            Activity::Left => self.body.facing = Facing::Left,
            Activity::Right => self.body.facing = Facing::Right,
            Activity::Idle | Activity::Dead => {}
        }
    }

    fn choose_activity<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let activity = match rng.gen_range(0..3) {
            0 => Activity::Left,
            1 => Activity::Right,
            _ => Activity::Idle,
        };
        self.set_activity(activity);
        if activity == Activity::Idle {
            self.body.facing = if rng.gen_bool(0.5) {
                Facing::Right
            } else {
                Facing::Left
            };
        }
    }

    pub fn update(&mut self, ctx: &mut SimContext) {
        debug_assert!(!self.despawned, "update on a despawned enemy");
        if self.despawned {
            return;
        }

        self.kin.update(&mut self.body, ctx.now_ms);

        if self.is_dead() {
            if self.despawn.fire(ctx.now_ms) {
                self.despawned = true;
            }
            return;
        }

        if self.wander.fire(ctx.now_ms, ctx.rng) {
            self.choose_activity(ctx.rng);
        }
        if let Some(hop) = self.hop.as_mut() {
            if hop.fire(ctx.now_ms, ctx.rng) {
                self.kin.jump();
            }
        }

        if self.movement.fire(ctx.now_ms) {
            match self.activity {
                Activity::Left => {
                    self.animator.select(self.kind.walk_track(), ctx.tracks);
                    self.kin.step_left(&mut self.body);
                }
                Activity::Right => {
                    self.animator.select(self.kind.walk_track(), ctx.tracks);
                    self.kin.step_right(&mut self.body);
                }
                Activity::Idle => self.animator.select(self.kind.stand_track(), ctx.tracks),
                Activity::Dead => {}
            }
        }
        self.animator.tick(1, ctx.tracks);
    }

    /// Flag the enemy dead. Its timers stop and the despawn countdown starts.
    pub fn kill(&mut self, ctx: &mut SimContext) {
        debug_assert!(!self.despawned, "kill on a despawned enemy");
        if self.is_dead() {
            return;
        }
        self.activity = Activity::Dead;
        self.wander.cancel();
        if let Some(hop) = self.hop.as_mut() {
            hop.cancel();
        }
        self.movement.cancel();
        self.animator.restart(self.kind.dead_track());
        self.despawn.arm(ctx.now_ms, DESPAWN_DELAY_MS);
        log::debug!("{:?} enemy at x={:.0} killed", self.kind, self.body.pos.x);
    }
}
