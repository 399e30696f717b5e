//! The player-controlled character.

use glam::Vec2;
use pollo_core::cadence::Cadence;
use pollo_core::input::ActionState;

use crate::audio::{Cue, PlayMode};
use crate::context::{GameStatus, SimContext};
use crate::entity::{Body, Facing};
use crate::physics::{GroundRule, Health, Kinematics};
use crate::sprites::{Animator, TrackId};

pub const CHARACTER_WIDTH: f32 = 235.0;
pub const CHARACTER_HEIGHT: f32 = 460.0;
pub const SPAWN_X: f32 = 220.0;
pub const GROUND_Y: f32 = 500.0;
pub const WALK_SPEED: f32 = 7.0;
/// Altitude (y below this) that latches the stomp flag.
pub const STOMP_ALTITUDE_Y: f32 = 280.0;
pub const CONTROL_TICK_MS: u64 = 16;
/// The left wall sits at `LEFT_WALL_BASE - level_end_x + spawn_x`.
const LEFT_WALL_BASE: f32 = 3980.0;
const THROW_OFFSET: Vec2 = Vec2::new(50.0, 160.0);

pub struct Character {
    pub body: Body,
    pub kin: Kinematics,
    pub health: Health,
    pub animator: Animator,
    pub spawn_x: f32,
    control: Cadence,
    selection: Cadence,
    death_reported: bool,
}

impl Character {
    pub fn new(now_ms: u64) -> Self {
        let mut animator = Animator::playing(TrackId::CharacterIdle);
        animator.arm_restart();
        Self {
            body: Body::new(SPAWN_X, GROUND_Y, CHARACTER_WIDTH, CHARACTER_HEIGHT),
            kin: Kinematics::new(WALK_SPEED, GroundRule::Line(GROUND_Y), now_ms),
            health: Health::full(),
            animator,
            spawn_x: SPAWN_X,
            control: Cadence::every(CONTROL_TICK_MS, now_ms),
            selection: Cadence::every(CONTROL_TICK_MS, now_ms),
            death_reported: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn is_airborne(&self) -> bool {
        self.kin.is_airborne(&self.body)
    }

    pub fn is_hurt(&self, now_ms: u64) -> bool {
        self.health.is_hurt(now_ms)
    }

    pub fn energy(&self) -> u32 {
        self.health.energy()
    }

    /// One simulation step. Returns `Lose` once, when the death track ends.
    pub fn update(
        &mut self,
        actions: &ActionState,
        level_end_x: f32,
        ctx: &mut SimContext,
    ) -> Option<GameStatus> {
        self.kin.update(&mut self.body, ctx.now_ms);

        if self.control.fire(ctx.now_ms) {
            self.apply_controls(actions, level_end_x, ctx);
        }
        if self.selection.fire(ctx.now_ms) {
            self.select_track(actions, ctx);
        }

        let finished = self.animator.tick(1, ctx.tracks);
        if finished && self.animator.active() == Some(TrackId::CharacterDead) && !self.death_reported
        {
            self.death_reported = true;
            log::info!("Character death sequence finished");
            return Some(GameStatus::Lose);
        }
        None
    }

    fn can_move_right(&self, actions: &ActionState, level_end_x: f32) -> bool {
        actions.right && self.body.pos.x < level_end_x && !self.is_dead()
    }

    fn can_move_left(&self, actions: &ActionState, level_end_x: f32) -> bool {
        actions.left
            && self.body.pos.x > LEFT_WALL_BASE - level_end_x + self.spawn_x
            && !self.is_dead()
    }

    fn apply_controls(&mut self, actions: &ActionState, level_end_x: f32, ctx: &mut SimContext) {
        let right = self.can_move_right(actions, level_end_x);
        let left = self.can_move_left(actions, level_end_x);

        if right && !left {
            self.body.facing = Facing::Right;
            self.kin.step_right(&mut self.body);
            self.walking_sound(ctx);
        }
        if left && !right {
            self.body.facing = Facing::Left;
            self.kin.step_left(&mut self.body);
            self.walking_sound(ctx);
        }

        if actions.wants_jump() && !self.is_airborne() && !self.is_dead() {
            self.kin.jump();
            ctx.sound.play(Cue::Jump, PlayMode::FromStart);
            self.animator.arm_restart();
            self.stop_walking_sound(ctx);
        }

        if left == right {
            self.stop_walking_sound(ctx);
        }
    }

    /// Asked again on every control tick, so a loop dropped by mute comes
    /// back once sound is enabled.
    fn walking_sound(&mut self, ctx: &mut SimContext) {
        if self.is_airborne() {
            self.stop_walking_sound(ctx);
        } else {
            ctx.sound.play(Cue::Walk, PlayMode::Loop);
        }
    }

    pub fn stop_walking_sound(&mut self, ctx: &mut SimContext) {
        if ctx.sound.is_looping(Cue::Walk) {
            ctx.sound.stop(Cue::Walk);
        }
    }

    fn select_track(&mut self, actions: &ActionState, ctx: &mut SimContext) {
        let both = actions.left && actions.right;
        let track = if self.is_dead() {
            TrackId::CharacterDead
        } else if self.is_hurt(ctx.now_ms) {
            TrackId::CharacterHurt
        } else if self.is_airborne() {
            TrackId::CharacterJump
        } else if (actions.left || actions.right) && !both {
            TrackId::CharacterWalk
        } else {
            TrackId::CharacterIdle
        };

        if track == TrackId::CharacterDead && self.animator.active() != Some(track) {
            self.animator.restart(track);
            self.stop_walking_sound(ctx);
            log::info!("Character died");
        } else {
            self.animator.select(track, ctx.tracks);
        }
    }

    /// Cooldown-gated damage plus the hurt cue.
    pub fn take_hit(&mut self, damage: u32, ctx: &mut SimContext) -> bool {
        let landed = self.health.hit(damage, ctx.now_ms);
        ctx.sound.play(Cue::CharacterHurt, PlayMode::FromStart);
        if landed {
            log::debug!(
                "Character hit for {} (energy {})",
                damage,
                self.health.energy()
            );
        }
        landed
    }

    /// Small bounce after landing on an enemy.
    pub fn stomp_bounce(&mut self, ctx: &mut SimContext) {
        self.kin.mini_jump();
        ctx.sound.play(Cue::Jump, PlayMode::FromStart);
        self.animator.select(TrackId::CharacterJump, ctx.tracks);
    }

    /// Where a thrown projectile appears, and which way it flies.
    pub fn throw_origin(&self) -> (Vec2, Facing) {
        (self.body.pos + THROW_OFFSET, self.body.facing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundBoard;
    use crate::sprites::TrackLibrary;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const END_X: f32 = 1919.0 * 3.0;

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
                rng: SmallRng::seed_from_u64(3),
                now: 0,
            }
        }

        fn run(&mut self, character: &mut Character, actions: ActionState, ms: u64) -> Vec<GameStatus> {
            let mut out = Vec::new();
            for _ in 0..ms {
                self.now += 1;
                let mut ctx = SimContext {
                    now_ms: self.now,
                    tracks: &self.tracks,
                    sound: &mut self.sound,
                    rng: &mut self.rng,
                };
                out.extend(character.update(&actions, END_X, &mut ctx));
            }
            out
        }
    }

    #[test]
    fn walks_seven_pixels_per_control_tick() {
        let mut rig = Rig::new();
        let mut character = Character::new(0);
        let right = ActionState {
            right: true,
            ..Default::default()
        };
        rig.run(&mut character, right, 160);
        assert_eq!(character.body.pos.x, SPAWN_X + 70.0);
        assert_eq!(character.body.facing, Facing::Right);
        assert_eq!(character.animator.active(), Some(TrackId::CharacterWalk));
        assert_eq!(rig.sound.play_count(Cue::Walk), 1);
    }

    #[test]
    fn both_directions_cancel_movement() {
        let mut rig = Rig::new();
        let mut character = Character::new(0);
        let both = ActionState {
            left: true,
            right: true,
            ..Default::default()
        };
        rig.run(&mut character, both, 200);
        assert_eq!(character.body.pos.x, SPAWN_X);
        assert_eq!(character.animator.active(), Some(TrackId::CharacterIdle));
    }

    #[test]
    fn right_wall_stops_at_level_end() {
        let mut rig = Rig::new();
        let mut character = Character::new(0);
        character.body.pos.x = END_X - 1.0;
        let right = ActionState {
            right: true,
            ..Default::default()
        };
        rig.run(&mut character, right, 100);
        assert_eq!(character.body.pos.x, END_X - 1.0 + WALK_SPEED);
    }

    #[test]
    fn jump_only_from_ground_and_restarts_track() {
        let mut rig = Rig::new();
        let mut character = Character::new(0);
        let jump = ActionState {
            jump: true,
            ..Default::default()
        };
        rig.run(&mut character, jump, 40);
        assert!(character.is_airborne());
        assert_eq!(character.animator.active(), Some(TrackId::CharacterJump));
        assert!(character.animator.frame_index() < 2);
        assert_eq!(rig.sound.play_count(Cue::Jump), 1);

        // Holding jump in the air does not jump again.
        rig.run(&mut character, jump, 200);
        assert_eq!(rig.sound.play_count(Cue::Jump), 1);
    }

    #[test]
    fn dead_character_reports_lose_once() {
        let mut rig = Rig::new();
        let mut character = Character::new(0);
        character.health.hit(100, 0);
        let events = rig.run(&mut character, ActionState::default(), 2_000);
        assert_eq!(events, vec![GameStatus::Lose]);
        assert_eq!(character.animator.frame_index(), 5);
    }

    #[test]
    fn dead_character_ignores_input() {
        let mut rig = Rig::new();
        let mut character = Character::new(0);
        character.health.hit(100, 0);
        let input = ActionState {
            right: true,
            jump: true,
            ..Default::default()
        };
        rig.run(&mut character, input, 200);
        assert_eq!(character.body.pos.x, SPAWN_X);
        assert!(!character.is_airborne());
    }
}
