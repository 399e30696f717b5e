//! The world orchestrator.
//!
//! `World::step` is the single authoritative update: it advances the clock by
//! one millisecond and then runs every entity and every collision pass in a
//! fixed order. Nothing else mutates the world between steps, so a pass can
//! never observe an entity another pass has already dropped.

use pollo_core::cadence::Cadence;
use pollo_core::input::ActionState;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::audio::{Cue, CuePlayer, PlayMode, SoundBoard};
use crate::camera::Camera;
use crate::character::Character;
use crate::collectible::Inventory;
use crate::collision::{
    collect_pickups, resolve_enemy_contacts, resolve_projectile_impacts, CollisionSchedule,
};
use crate::context::{GameEvent, GameStatus, SimContext};
use crate::hud::{health_band, HudSnapshot};
use crate::level::{Level, LevelConfig};
use crate::projectile::Projectile;
use crate::sprites::TrackLibrary;

pub const THROW_TICK_MS: u64 = 10;

pub struct World {
    clock_ms: u64,
    pub character: Character,
    pub level: Level,
    pub projectiles: Vec<Projectile>,
    pub camera: Camera,
    pub inventory: Inventory,
    last_throw_ms: Option<u64>,
    cooldown_remaining_ms: u64,
    throw_control: Cadence,
    collisions: CollisionSchedule,
    stomp_latch: bool,
    paused: bool,
    status: Option<GameStatus>,
    boss_bar_latched: bool,
    sound: SoundBoard,
    tracks: TrackLibrary,
    rng: SmallRng,
    events: Vec<GameEvent>,
}

impl World {
    pub fn new(
        config: LevelConfig,
        tracks: TrackLibrary,
        player: Box<dyn CuePlayer>,
        seed: u64,
    ) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let level = Level::build(config, 0, &mut rng);
        let mut sound = SoundBoard::new(player);
        sound.start_background();
        log::info!("World started on '{}' (seed {})", level.config.label, seed);

        Self {
            clock_ms: 0,
            character: Character::new(0),
            level,
            projectiles: Vec::new(),
            camera: Camera::new(),
            inventory: Inventory::default(),
            last_throw_ms: None,
            cooldown_remaining_ms: 0,
            throw_control: Cadence::every(THROW_TICK_MS, 0),
            collisions: CollisionSchedule::new(0),
            stomp_latch: false,
            paused: false,
            status: None,
            boss_bar_latched: false,
            sound,
            tracks,
            rng,
            events: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn status(&self) -> Option<GameStatus> {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn tracks(&self) -> &TrackLibrary {
        &self.tracks
    }

    pub fn sound(&self) -> &SoundBoard {
        &self.sound
    }

    /// The boss bar shows from the first time the character came close to
    /// the boss, and stays.
    pub fn boss_bar_visible(&self) -> bool {
        self.boss_bar_latched
    }

    pub fn cooldown_remaining_ms(&self) -> u64 {
        self.cooldown_remaining_ms
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
    }

    pub fn toggle_mute(&mut self) {
        self.sound.toggle_mute();
    }

    /// Game-over events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn hud(&self) -> HudSnapshot {
        let boss_health = self.level.boss.energy();
        HudSnapshot {
            coins: self.inventory.coins,
            bottles: self.inventory.bottles,
            character_health: self.character.energy(),
            boss_health,
            boss_band: health_band(boss_health),
            boss_bar_visible: self.boss_bar_latched,
            cooldown_remaining_ms: self.cooldown_remaining_ms,
            camera_x: self.camera.x(),
            level_label: self.level.config.label.clone(),
        }
    }

    /// Advance the simulation by one millisecond.
    pub fn step(&mut self, actions: &ActionState) {
        if self.paused || self.status.is_some() {
            return;
        }
        self.clock_ms += 1;
        let now = self.clock_ms;
        let mut ctx = SimContext {
            now_ms: now,
            tracks: &self.tracks,
            sound: &mut self.sound,
            rng: &mut self.rng,
        };
        let mut outcome = None;

        if let Some(status) = self
            .character
            .update(actions, self.level.end_x, &mut ctx)
        {
            outcome.get_or_insert(status);
        }

        self.camera
            .follow(self.character.body.pos.x, self.character.spawn_x);

        for enemy in &mut self.level.enemies {
            enemy.update(&mut ctx);
        }

        if let Some(status) = self.level.boss.update(&mut self.character, &mut ctx) {
            outcome.get_or_insert(status);
        }
        if !self.boss_bar_latched && self.level.boss.in_trigger_range(self.character.body.pos.x) {
            self.boss_bar_latched = true;
            log::info!("Boss fight in range at x={:.0}", self.character.body.pos.x);
        }

        for projectile in &mut self.projectiles {
            projectile.update(&mut ctx);
        }
        for coin in &mut self.level.coins {
            coin.update(&mut ctx);
        }
        for cloud in &mut self.level.clouds {
            cloud.update(&mut ctx);
        }

        let cooldown_ms = self.level.config.throw_cooldown_ms;
        self.cooldown_remaining_ms = self
            .last_throw_ms
            .map_or(0, |at| (at + cooldown_ms).saturating_sub(now));
        if self.throw_control.fire(now)
            && actions.throw
            && self.cooldown_remaining_ms == 0
            && self.inventory.bottles > 0
            && !self.character.is_dead()
        {
            let (origin, direction) = self.character.throw_origin();
            self.projectiles
                .push(Projectile::launch(origin, direction, now));
            self.inventory.bottles -= 1;
            self.last_throw_ms = Some(now);
            self.cooldown_remaining_ms = cooldown_ms;
            ctx.sound.play(Cue::Throw, PlayMode::FromStart);
            log::info!(
                "Throw {:?} from x={:.0} ({} left)",
                direction,
                origin.x,
                self.inventory.bottles
            );
        }

        let due = self.collisions.due(now);
        if due.contacts {
            resolve_enemy_contacts(
                &mut self.character,
                &mut self.level.enemies,
                &mut self.stomp_latch,
                self.level.boss.is_dead(),
                self.level.config.enemy_damage,
                &mut ctx,
            );
        }
        if due.impacts {
            resolve_projectile_impacts(
                &mut self.projectiles,
                &mut self.level.boss,
                !self.character.is_dead(),
                self.level.config.throw_damage,
                &mut ctx,
            );
        }
        if due.pickups {
            collect_pickups(
                &self.character,
                &mut self.level.coins,
                &mut self.level.bottles,
                &mut self.inventory,
                &mut ctx,
            );
        }

        self.projectiles.retain(|p| !p.is_removed());
        self.level.enemies.retain(|e| !e.is_removable());

        if let Some(status) = outcome {
            self.finish(status);
        }
    }

    fn finish(&mut self, status: GameStatus) {
        if self.status.is_some() {
            return;
        }
        self.status = Some(status);
        self.sound.halt();
        self.events.push(GameEvent::GameOver(status));
        log::info!(
            "Game over: {} at {} ms (coins {}, bottles {})",
            status.as_str(),
            self.clock_ms,
            self.inventory.coins,
            self.inventory.bottles
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CueRecorder;
    use crate::boss::{BossPhase, INTRO_STEPS, INTRO_TICK_MS};
    use crate::enemy::{Enemy, EnemyKind};
    use crate::projectile::{Impact, ProjectilePhase};
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    /// Player shared with the test so live loops can be inspected.
    #[derive(Default, Clone)]
    struct LiveLoops(Rc<RefCell<HashSet<Cue>>>);

    impl LiveLoops {
        fn sounding(&self, cue: Cue) -> bool {
            self.0.borrow().contains(&cue)
        }
    }

    impl CuePlayer for LiveLoops {
        fn play(&mut self, cue: Cue, mode: PlayMode) {
            if mode != PlayMode::FromStart {
                self.0.borrow_mut().insert(cue);
            }
        }
        fn stop(&mut self, cue: Cue) {
            self.0.borrow_mut().remove(&cue);
        }
    }

    fn level_one(seed: u64) -> World {
        let config = LevelConfig::builtin(1).expect("level 1");
        World::new(
            config,
            TrackLibrary::standard(),
            Box::new(CueRecorder::new()),
            seed,
        )
    }

    fn run(world: &mut World, actions: ActionState, ms: u64) {
        for _ in 0..ms {
            world.step(&actions);
        }
    }

    fn throwing() -> ActionState {
        ActionState {
            throw: true,
            ..Default::default()
        }
    }

    /// Enemies out of the way and the boss rooted in place.
    fn quiet_arena(world: &mut World) {
        world.level.enemies.clear();
        world.level.coins.clear();
        world.level.bottles.clear();
        world.level.boss.kin.speed_x = 0.0;
    }

    #[test]
    fn level_one_coin_sweep_collects_every_coin() {
        let mut world = level_one(42);
        assert_eq!(world.level.enemies.len(), 6);
        assert_eq!(world.level.coins.len(), 18);
        assert_eq!(world.level.bottles.len(), 9);

        let mut guard = 0;
        while let Some(coin) = world.level.coins.first() {
            let target = coin.body.pos;
            world.character.body.pos.x = target.x;
            world.character.body.pos.y = target.y - 200.0;
            world.character.kin.speed_y = 0.0;
            run(&mut world, ActionState::default(), 100);
            guard += 1;
            assert!(guard <= 18, "a coin was not collected");
        }
        assert_eq!(world.inventory.coins, 18);
        assert!(world.level.coins.is_empty());
        assert_eq!(world.hud().coins, 18);
        assert_eq!(world.sound().play_count(Cue::CoinCollect), 18);
    }

    #[test]
    fn five_boss_hits_win_exactly_once() {
        let mut world = level_one(7);
        quiet_arena(&mut world);
        let boss_x = world.level.boss.body.pos.x;
        world.character.body.pos.x = boss_x - 100.0;
        world.inventory.bottles = 5;

        let mut events = Vec::new();
        for _ in 0..10_000 {
            world.step(&throwing());
            events.extend(world.drain_events());
        }

        assert_eq!(world.level.boss.energy(), 0);
        assert_eq!(world.level.boss.phase(), BossPhase::Dead);
        assert_eq!(events, vec![GameEvent::GameOver(GameStatus::Win)]);
        assert_eq!(world.status(), Some(GameStatus::Win));
        assert!(world.sound().is_halted());
        assert_eq!(world.inventory.bottles, 0);
    }

    #[test]
    fn stomp_from_above_kills_enemy_without_damage() {
        let mut world = level_one(1);
        quiet_arena(&mut world);
        let mut rng = SmallRng::seed_from_u64(1);
        let x = world.character.body.pos.x;
        world
            .level
            .enemies
            .push(Enemy::at(EnemyKind::Heavy, x + 60.0, 0.0, 0, &mut rng));
        world.character.body.pos.y = 200.0;

        run(&mut world, ActionState::default(), 1_000);
        assert!(world.level.enemies[0].is_dead());
        assert_eq!(world.character.energy(), 100);
        assert_eq!(world.sound().play_count(Cue::HeavyEnemyHurt), 1);
    }

    #[test]
    fn contact_from_above_without_latch_damages_character() {
        let mut world = level_one(1);
        quiet_arena(&mut world);
        let mut rng = SmallRng::seed_from_u64(1);
        let x = world.character.body.pos.x;
        world
            .level
            .enemies
            .push(Enemy::at(EnemyKind::Heavy, x + 60.0, 0.0, 0, &mut rng));
        // Airborne with feet above the enemy's, but already overlapping it, so
        // the stomp altitude is never reached.
        world.character.body.pos.y = 830.0 + 120.0 - 460.0 - 10.0;

        run(&mut world, ActionState::default(), 20);
        assert!(world.character.is_airborne());
        assert!(!world.level.enemies[0].is_dead());
        assert_eq!(world.character.energy(), 90);
        assert_eq!(world.sound().play_count(Cue::HeavyEnemyHurt), 0);
    }

    #[test]
    fn mute_silences_walk_loop_and_unmute_brings_it_back() {
        let walking = ActionState {
            right: true,
            ..Default::default()
        };

        let player = LiveLoops::default();
        let mut world = World::new(
            LevelConfig::builtin(1).expect("level 1"),
            TrackLibrary::standard(),
            Box::new(player.clone()),
            5,
        );
        quiet_arena(&mut world);
        run(&mut world, walking, 100);
        assert!(player.sounding(Cue::Walk));
        world.toggle_mute();
        assert!(!player.sounding(Cue::Walk));
        assert!(!player.sounding(Cue::Background));
        run(&mut world, walking, 200);
        assert!(!player.sounding(Cue::Walk), "muted while still walking");
        world.toggle_mute();
        run(&mut world, walking, 50);
        assert!(player.sounding(Cue::Walk));
        assert!(player.sounding(Cue::Background));

        // Starting to walk while muted still gets the loop after unmuting.
        let player = LiveLoops::default();
        let mut world = World::new(
            LevelConfig::builtin(1).expect("level 1"),
            TrackLibrary::standard(),
            Box::new(player.clone()),
            5,
        );
        quiet_arena(&mut world);
        world.toggle_mute();
        run(&mut world, walking, 200);
        assert!(!player.sounding(Cue::Walk));
        world.toggle_mute();
        run(&mut world, walking, 50);
        assert!(player.sounding(Cue::Walk));

        run(&mut world, ActionState::default(), 50);
        assert!(!player.sounding(Cue::Walk), "standing still stops the loop");
    }

    #[test]
    fn grounded_contact_damages_character() {
        let mut world = level_one(1);
        quiet_arena(&mut world);
        let mut rng = SmallRng::seed_from_u64(1);
        let x = world.character.body.pos.x;
        world
            .level
            .enemies
            .push(Enemy::at(EnemyKind::Heavy, x + 60.0, 0.0, 0, &mut rng));

        run(&mut world, ActionState::default(), 100);
        assert!(!world.level.enemies[0].is_dead());
        assert_eq!(world.character.energy(), 90);

        // Standing in contact hurts again only after the cooldown.
        run(&mut world, ActionState::default(), 400);
        assert_eq!(world.character.energy(), 90);
        run(&mut world, ActionState::default(), 300);
        assert_eq!(world.character.energy(), 80);
    }

    #[test]
    fn thrown_projectile_splashes_once_then_leaves() {
        let mut world = level_one(3);
        quiet_arena(&mut world);
        world.inventory.bottles = 1;

        run(&mut world, throwing(), 20);
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.inventory.bottles, 0);
        assert_eq!(world.sound().play_count(Cue::Throw), 1);

        let mut splashed_at = None;
        for _ in 0..5_000 {
            world.step(&ActionState::default());
            match world.projectiles.first().map(|p| p.phase()) {
                Some(ProjectilePhase::Splashing { impact, .. }) => {
                    assert_eq!(impact, Impact::Ground);
                    splashed_at.get_or_insert(world.now_ms());
                }
                Some(ProjectilePhase::Flight) => assert!(splashed_at.is_none()),
                Some(ProjectilePhase::Removed) => panic!("removed projectiles are dropped"),
                None => break,
            }
        }
        let splashed_at = splashed_at.expect("projectile should have splashed");
        assert!(world.projectiles.is_empty());
        assert!(world.now_ms() - splashed_at >= 6 * 50 - 1);
        assert_eq!(world.sound().play_count(Cue::Splash), 1);
    }

    #[test]
    fn throw_respects_cooldown_and_stock() {
        let mut world = level_one(5);
        quiet_arena(&mut world);
        world.inventory.bottles = 3;

        run(&mut world, throwing(), 700);
        assert_eq!(world.inventory.bottles, 2);
        assert!(world.cooldown_remaining_ms() > 0);
        assert!(world.hud().cooldown_remaining_ms > 0);

        run(&mut world, throwing(), 20);
        assert_eq!(world.inventory.bottles, 1);

        // Nothing happens without the throw input.
        run(&mut world, ActionState::default(), 2_000);
        assert_eq!(world.inventory.bottles, 1);
        assert_eq!(world.cooldown_remaining_ms(), 0);
    }

    #[test]
    fn boss_intro_plays_six_steps_before_engaging() {
        let mut world = level_one(9);
        quiet_arena(&mut world);
        world.character.body.pos.x = world.level.boss.body.pos.x - 900.0;

        run(&mut world, ActionState::default(), INTRO_TICK_MS * INTRO_STEPS as u64);
        assert!(world.boss_bar_visible());
        assert_eq!(world.level.boss.intro_steps(), INTRO_STEPS);
        assert_eq!(world.level.boss.phase(), BossPhase::Alert);

        run(&mut world, ActionState::default(), 5_000);
        assert_eq!(world.level.boss.phase(), BossPhase::Engaged);
        assert_eq!(world.level.boss.intro_steps(), INTRO_STEPS);
    }

    #[test]
    fn pause_freezes_the_clock() {
        let mut world = level_one(2);
        run(&mut world, ActionState::default(), 50);
        world.toggle_pause();
        run(&mut world, ActionState::default(), 50);
        assert_eq!(world.now_ms(), 50);
        world.toggle_pause();
        run(&mut world, ActionState::default(), 50);
        assert_eq!(world.now_ms(), 100);
    }

    #[test]
    fn camera_keeps_character_at_spawn_column() {
        let mut world = level_one(4);
        quiet_arena(&mut world);
        let right = ActionState {
            right: true,
            ..Default::default()
        };
        run(&mut world, right, 320);
        let screen_x = world.character.body.pos.x + world.camera.x();
        assert_eq!(screen_x, world.character.spawn_x);
        assert!(world.hud().camera_x < 0.0);
    }

    #[test]
    fn character_death_ends_in_a_single_loss() {
        let mut world = level_one(6);
        quiet_arena(&mut world);
        world.character.health.hit(100, 0);
        run(&mut world, ActionState::default(), 3_000);
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::GameOver(GameStatus::Lose)]
        );
        let frozen = world.now_ms();
        run(&mut world, ActionState::default(), 100);
        assert_eq!(world.now_ms(), frozen);
    }
}
