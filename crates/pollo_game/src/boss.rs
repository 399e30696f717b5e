//! The end-of-level boss.
//!
//! Three phases, strictly forward:
//!
//! - **Alert**: waits for the character to come within `INTRO_TRIGGER_DISTANCE`,
//!   then plays a fixed number of intro steps. Once started the intro runs to
//!   completion even if the character backs off.
//! - **Engaged**: a 190 ms controller either walks toward the character or
//!   stops and attacks; an attack lands after a short windup.
//! - **Dead**: latched the first step energy reads zero, from any phase. The
//!   dead track plays once and then the boss reports a win.

use pollo_core::cadence::{Cadence, Deadline};

use crate::audio::{Cue, PlayMode};
use crate::character::Character;
use crate::context::{GameStatus, SimContext};
use crate::entity::{Body, Facing};
use crate::physics::{Health, Kinematics};
use crate::sprites::{Animator, TrackId};

pub const BOSS_WIDTH: f32 = 800.0;
pub const BOSS_HEIGHT: f32 = 1100.0;
pub const BOSS_Y: f32 = -70.0;
/// The fight begins once the character is closer than this to the boss.
pub const INTRO_TRIGGER_DISTANCE: f32 = 1000.0;
pub const INTRO_STEPS: u32 = 6;
pub const INTRO_TICK_MS: u64 = 250;
pub const CONTROLLER_TICK_MS: u64 = 190;
pub const WALK_TICK_MS: u64 = 16;
pub const ATTACK_WINDUP_MS: u64 = 180;
/// Hurt flash lasts this long after a hit.
pub const HURT_FLASH_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossPhase {
    Alert,
    Engaged,
    Dead,
}

pub struct Boss {
    pub body: Body,
    pub kin: Kinematics,
    pub health: Health,
    pub animator: Animator,
    pub damage: u32,
    phase: BossPhase,
    intro: Cadence,
    intro_steps: u32,
    intro_running: bool,
    controller: Cadence,
    walk: Cadence,
    windup: Deadline,
    win_reported: bool,
}

impl Boss {
    pub fn new(x: f32, damage: u32, speed: f32, now_ms: u64) -> Self {
        Self {
            body: Body::new(x, BOSS_Y, BOSS_WIDTH, BOSS_HEIGHT).drawn_facing(Facing::Left),
            kin: Kinematics::grounded(speed, BOSS_Y),
            health: Health::full(),
            animator: Animator::playing(TrackId::BossAlert),
            damage,
            phase: BossPhase::Alert,
            intro: Cadence::every(INTRO_TICK_MS, now_ms),
            intro_steps: 0,
            intro_running: false,
            controller: Cadence::stopped(CONTROLLER_TICK_MS),
            walk: Cadence::stopped(WALK_TICK_MS),
            windup: Deadline::new(),
            win_reported: false,
        }
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    pub fn intro_steps(&self) -> u32 {
        self.intro_steps
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn energy(&self) -> u32 {
        self.health.energy()
    }

    /// Visual only: recently hit.
    pub fn is_hurt(&self, now_ms: u64) -> bool {
        self.health
            .millis_since_hit(now_ms)
            .is_some_and(|elapsed| elapsed < HURT_FLASH_MS)
    }

    pub fn is_walking(&self) -> bool {
        self.walk.is_active()
    }

    /// Whether `x` is close enough to start the fight.
    pub fn in_trigger_range(&self, x: f32) -> bool {
        x > self.body.pos.x - INTRO_TRIGGER_DISTANCE
    }

    /// Projectile damage; ungated.
    pub fn strike(&mut self, damage: u32, now_ms: u64) {
        self.health.strike(damage, now_ms);
        log::info!("Boss hit for {} (energy {})", damage, self.health.energy());
    }

    /// One simulation step. Returns `Win` once, when the dead track ends.
    pub fn update(&mut self, character: &mut Character, ctx: &mut SimContext) -> Option<GameStatus> {
        if self.health.is_dead() && self.phase != BossPhase::Dead {
            self.enter_dead(ctx);
        }

        match self.phase {
            BossPhase::Alert => {
                if self.intro.fire(ctx.now_ms) {
                    self.advance_intro(character, ctx);
                }
                None
            }
            BossPhase::Engaged => {
                self.engage(character, ctx);
                None
            }
            BossPhase::Dead => {
                let finished = self.animator.tick(1, ctx.tracks);
                if finished && !self.win_reported {
                    self.win_reported = true;
                    log::info!("Boss death sequence finished");
                    return Some(GameStatus::Win);
                }
                None
            }
        }
    }

    fn advance_intro(&mut self, character: &Character, ctx: &mut SimContext) {
        let triggered = self.in_trigger_range(character.body.pos.x);
        if !(triggered || self.intro_running) {
            return;
        }
        if self.intro_steps < INTRO_STEPS {
            if !self.intro_running {
                log::info!("Boss intro started");
                self.intro_running = true;
            }
            self.animator.step(ctx.tracks);
            self.intro_steps += 1;
        } else {
            self.intro.cancel();
            self.intro_running = false;
            self.phase = BossPhase::Engaged;
            self.controller.start(ctx.now_ms);
            log::info!("Boss engaged");
        }
    }

    fn engage(&mut self, character: &mut Character, ctx: &mut SimContext) {
        if self.walk.fire(ctx.now_ms) {
            self.kin.step_left(&mut self.body);
        }
        if self.windup.fire(ctx.now_ms) {
            character.take_hit(self.damage, ctx);
        }
        if !self.controller.fire(ctx.now_ms) {
            return;
        }

        if character.body.pos.x < self.body.pos.x && !self.is_dead() {
            self.walk.ensure_started(ctx.now_ms);
            self.animator.select(TrackId::BossWalk, ctx.tracks);
            self.animator.step(ctx.tracks);
        } else {
            self.walk.cancel();
            if !self.is_dead() {
                self.animator.select(TrackId::BossAttack, ctx.tracks);
                self.animator.step(ctx.tracks);
                self.windup.arm(ctx.now_ms, ATTACK_WINDUP_MS);
            }
        }

        if character.is_dead() || self.is_dead() {
            self.controller.cancel();
            self.walk.cancel();
        }
    }

    fn enter_dead(&mut self, ctx: &mut SimContext) {
        self.phase = BossPhase::Dead;
        self.intro.cancel();
        self.controller.cancel();
        self.walk.cancel();
        self.windup.cancel();
        ctx.sound.play(Cue::BossDeath, PlayMode::FromStart);
        self.animator.restart(TrackId::BossDead);
        log::info!("Boss defeated");
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
        now: u64,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                tracks: TrackLibrary::standard(),
                sound: SoundBoard::silent(),
                rng: SmallRng::seed_from_u64(1),
                now: 0,
            }
        }

        fn run(&mut self, boss: &mut Boss, character: &mut Character, ms: u64) -> Vec<GameStatus> {
            let mut out = Vec::new();
            for _ in 0..ms {
                self.now += 1;
                let mut ctx = SimContext {
                    now_ms: self.now,
                    tracks: &self.tracks,
                    sound: &mut self.sound,
                    rng: &mut self.rng,
                };
                out.extend(boss.update(character, &mut ctx));
            }
            out
        }
    }

    #[test]
    fn stays_alert_while_character_is_far() {
        let mut rig = Rig::new();
        let mut boss = Boss::new(6_457.0, 20, 5.0, 0);
        let mut character = Character::new(0);
        rig.run(&mut boss, &mut character, 5_000);
        assert_eq!(boss.phase(), BossPhase::Alert);
        assert_eq!(boss.intro_steps(), 0);
    }

    #[test]
    fn intro_runs_exactly_six_steps_then_engages() {
        let mut rig = Rig::new();
        let mut boss = Boss::new(2_000.0, 20, 5.0, 0);
        let mut character = Character::new(0);
        character.body.pos.x = 1_500.0;

        rig.run(&mut boss, &mut character, INTRO_TICK_MS * INTRO_STEPS as u64);
        assert_eq!(boss.intro_steps(), INTRO_STEPS);
        assert_eq!(boss.phase(), BossPhase::Alert);

        // Backing off mid-way does not stop a running intro, and lingering
        // in range does not add steps.
        character.body.pos.x = 0.0;
        rig.run(&mut boss, &mut character, INTRO_TICK_MS);
        assert_eq!(boss.phase(), BossPhase::Engaged);
        rig.run(&mut boss, &mut character, 10 * INTRO_TICK_MS);
        assert_eq!(boss.intro_steps(), INTRO_STEPS);
    }

    #[test]
    fn engaged_boss_walks_toward_character() {
        let mut rig = Rig::new();
        let mut boss = Boss::new(2_000.0, 20, 5.0, 0);
        let mut character = Character::new(0);
        character.body.pos.x = 1_500.0;
        rig.run(&mut boss, &mut character, INTRO_TICK_MS * 7);
        assert_eq!(boss.phase(), BossPhase::Engaged);

        let start_x = boss.body.pos.x;
        rig.run(&mut boss, &mut character, 400);
        assert!(boss.is_walking());
        assert!(boss.body.pos.x < start_x);
        assert_eq!(boss.animator.active(), Some(TrackId::BossWalk));
    }

    #[test]
    fn attack_lands_after_windup() {
        let mut rig = Rig::new();
        let mut boss = Boss::new(2_000.0, 20, 5.0, 0);
        let mut character = Character::new(0);
        character.body.pos.x = 2_100.0;
        rig.run(&mut boss, &mut character, INTRO_TICK_MS * 7);
        assert_eq!(boss.phase(), BossPhase::Engaged);

        // First controller tick arms the windup; damage follows 180 ms later.
        rig.run(&mut boss, &mut character, CONTROLLER_TICK_MS);
        assert_eq!(boss.animator.active(), Some(TrackId::BossAttack));
        assert_eq!(character.energy(), 100);
        rig.run(&mut boss, &mut character, ATTACK_WINDUP_MS);
        assert_eq!(character.energy(), 80);
        assert!(!boss.is_walking());
    }

    #[test]
    fn death_latches_from_any_phase_and_reports_win_once() {
        let mut rig = Rig::new();
        let mut boss = Boss::new(6_457.0, 20, 5.0, 0);
        let mut character = Character::new(0);
        for _ in 0..5 {
            boss.strike(20, rig.now);
        }
        let events = rig.run(&mut boss, &mut character, 2_000);
        assert_eq!(events, vec![GameStatus::Win]);
        assert_eq!(boss.phase(), BossPhase::Dead);
        assert_eq!(rig.sound.play_count(Cue::BossDeath), 1);
    }

    #[test]
    fn hurt_flash_lasts_one_second() {
        let mut boss = Boss::new(0.0, 20, 5.0, 0);
        assert!(!boss.is_hurt(0));
        boss.strike(20, 500);
        assert!(boss.is_hurt(1_499));
        assert!(!boss.is_hurt(1_500));
    }
}
