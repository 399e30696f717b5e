//! Vertical integration, ground tests and energy bookkeeping.
//!
//! Gravity is a stepped integration on its own cadence: each tick moves the
//! body by `speed_y` and then bleeds `acceleration` off the speed. A body keeps
//! integrating while it is airborne or still rising.

use pollo_core::cadence::Cadence;

use crate::entity::Body;

pub const GRAVITY_TICK_MS: u64 = 4;
pub const GRAVITY: f32 = 0.05;
pub const JUMP_SPEED: f32 = 5.0;
pub const MINI_JUMP_SPEED: f32 = 3.0;
/// Landing line for stomp bounces.
pub const MINI_JUMP_FLOOR_Y: f32 = 500.0;
/// Window after a hit during which further hits are ignored.
pub const HURT_COOLDOWN_MS: u64 = 600;
pub const MAX_ENERGY: u32 = 100;

/// How a body decides it is off the ground. Fixed per entity kind at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundRule {
    /// Projectiles: never grounded, they fall until something stops them.
    AlwaysAirborne,
    /// Airborne while `y` is above (less than) this line.
    Line(f32),
}

#[derive(Debug, Clone)]
pub struct Kinematics {
    pub speed_y: f32,
    pub speed_x: f32,
    pub acceleration: f32,
    pub ground: GroundRule,
    pub mini_jump: bool,
    gravity: Cadence,
}

impl Kinematics {
    pub fn new(speed_x: f32, ground: GroundRule, now_ms: u64) -> Self {
        Self {
            speed_y: 0.0,
            speed_x,
            acceleration: GRAVITY,
            ground,
            mini_jump: false,
            gravity: Cadence::every(GRAVITY_TICK_MS, now_ms),
        }
    }

    /// A body that never falls (walk-only enemies, the boss).
    pub fn grounded(speed_x: f32, ground_y: f32) -> Self {
        Self {
            speed_y: 0.0,
            speed_x,
            acceleration: GRAVITY,
            ground: GroundRule::Line(ground_y),
            mini_jump: false,
            gravity: Cadence::stopped(GRAVITY_TICK_MS),
        }
    }

    pub fn is_airborne(&self, body: &Body) -> bool {
        match self.ground {
            GroundRule::AlwaysAirborne => true,
            GroundRule::Line(line) => body.pos.y < line,
        }
    }

    /// Poll the gravity cadence and integrate once if it fired.
    pub fn update(&mut self, body: &mut Body, now_ms: u64) {
        if self.gravity.fire(now_ms) {
            self.integrate(body);
        }
    }

    /// One gravity tick.
    pub fn integrate(&mut self, body: &mut Body) {
        if !(self.is_airborne(body) || self.speed_y > 0.0) {
            return;
        }
        body.pos.y -= self.speed_y;
        self.speed_y -= self.acceleration;

        if self.mini_jump && body.pos.y > MINI_JUMP_FLOOR_Y {
            body.pos.y = MINI_JUMP_FLOOR_Y;
            self.mini_jump = false;
        }
    }

    pub fn jump(&mut self) {
        self.speed_y = JUMP_SPEED;
    }

    pub fn mini_jump(&mut self) {
        self.mini_jump = true;
        self.speed_y = MINI_JUMP_SPEED;
    }

    /// Stop falling for good (splashed projectiles).
    pub fn freeze(&mut self) {
        self.gravity.cancel();
        self.speed_y = 0.0;
    }

    pub fn step_left(&self, body: &mut Body) {
        body.pos.x -= self.speed_x;
    }

    pub fn step_right(&self, body: &mut Body) {
        body.pos.x += self.speed_x;
    }
}

/// Energy in `0..=100` plus the time of the last accepted hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    energy: u32,
    last_hit_ms: Option<u64>,
}

impl Health {
    pub fn full() -> Self {
        Self {
            energy: MAX_ENERGY,
            last_hit_ms: None,
        }
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn is_dead(&self) -> bool {
        self.energy == 0
    }

    pub fn last_hit_ms(&self) -> Option<u64> {
        self.last_hit_ms
    }

    pub fn millis_since_hit(&self, now_ms: u64) -> Option<u64> {
        self.last_hit_ms.map(|t| now_ms.saturating_sub(t))
    }

    pub fn is_hurt(&self, now_ms: u64) -> bool {
        self.millis_since_hit(now_ms)
            .is_some_and(|elapsed| elapsed < HURT_COOLDOWN_MS)
    }

    /// Cooldown-gated damage. Returns whether the hit landed.
    pub fn hit(&mut self, damage: u32, now_ms: u64) -> bool {
        if self.is_hurt(now_ms) {
            return false;
        }
        self.energy = self.energy.saturating_sub(damage);
        self.last_hit_ms = Some(now_ms);
        true
    }

    /// Ungated damage. The hit time only moves while the blow does not
    /// overshoot zero, so a finishing overkill leaves no fresh hurt window.
    pub fn strike(&mut self, damage: u32, now_ms: u64) {
        if damage > self.energy {
            self.energy = 0;
        } else {
            self.energy -= damage;
            self.last_hit_ms = Some(now_ms);
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_rises_then_stops_below_ground_line() {
        let mut body = Body::new(0.0, 500.0, 10.0, 10.0);
        let mut kin = Kinematics::new(7.0, GroundRule::Line(500.0), 0);
        kin.jump();
        let mut peak = body.pos.y;
        let mut t = 0;
        loop {
            t += 1;
            kin.update(&mut body, t);
            peak = peak.min(body.pos.y);
            if !kin.is_airborne(&body) && kin.speed_y <= 0.0 {
                break;
            }
            assert!(t < 10_000, "jump never landed");
        }
        assert!(peak < 280.0, "jump peak {} should clear the stomp altitude", peak);
        assert!(body.pos.y >= 500.0);
        // Landed bodies stop integrating.
        let y = body.pos.y;
        kin.update(&mut body, t + GRAVITY_TICK_MS);
        assert_eq!(body.pos.y, y);
    }

    #[test]
    fn mini_jump_clamps_landing() {
        let mut body = Body::new(0.0, 300.0, 10.0, 10.0);
        let mut kin = Kinematics::new(7.0, GroundRule::Line(500.0), 0);
        kin.mini_jump();
        for _ in 0..2_000 {
            kin.integrate(&mut body);
        }
        assert_eq!(body.pos.y, MINI_JUMP_FLOOR_Y);
        assert!(!kin.mini_jump);
    }

    #[test]
    fn always_airborne_keeps_falling() {
        let mut body = Body::new(0.0, 0.0, 10.0, 10.0);
        let mut kin = Kinematics::new(0.0, GroundRule::AlwaysAirborne, 0);
        for _ in 0..500 {
            kin.integrate(&mut body);
        }
        assert!(body.pos.y > 1_000.0);
    }

    #[test]
    fn frozen_body_does_not_move() {
        let mut body = Body::new(0.0, 100.0, 10.0, 10.0);
        let mut kin = Kinematics::new(0.0, GroundRule::AlwaysAirborne, 0);
        kin.freeze();
        for t in 0..100 {
            kin.update(&mut body, t);
        }
        assert_eq!(body.pos.y, 100.0);
    }

    #[test]
    fn energy_never_leaves_range() {
        let mut health = Health::full();
        let mut now = 0;
        for damage in [0, 5, 40, 80, 300, u32::MAX] {
            health.hit(damage, now);
            assert!(health.energy() <= MAX_ENERGY);
            now += HURT_COOLDOWN_MS;
        }
        assert_eq!(health.energy(), 0);
        assert!(health.is_dead());

        let mut boss = Health::full();
        for _ in 0..10 {
            boss.strike(30, 0);
            assert!(boss.energy() <= MAX_ENERGY);
        }
        assert_eq!(boss.energy(), 0);
    }

    #[test]
    fn hits_inside_cooldown_reduce_energy_once() {
        let mut health = Health::full();
        assert!(health.hit(10, 1_000));
        assert!(!health.hit(10, 1_599));
        assert_eq!(health.energy(), 90);
        assert!(health.hit(10, 1_600));
        assert_eq!(health.energy(), 80);
    }

    #[test]
    fn overkill_strike_keeps_previous_hit_time() {
        let mut boss = Health::full();
        boss.strike(90, 100);
        boss.strike(20, 900);
        assert_eq!(boss.energy(), 0);
        assert_eq!(boss.last_hit_ms(), Some(100));
    }
}
