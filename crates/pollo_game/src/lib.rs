//! Simulation core of a side-scrolling platformer: a character walks a
//! parallax level, stomps or dodges enemies, collects coins and bottles, and
//! throws bottles at an end-of-level boss.
//!
//! Everything advances through [`world::World::step`], one millisecond per
//! call. Rendering and audio go through the [`render::Surface`] and
//! [`audio::CuePlayer`] seams so a host can plug in real output.

pub mod audio;
pub mod boss;
pub mod camera;
pub mod character;
pub mod collectible;
pub mod collision;
pub mod context;
pub mod enemy;
pub mod entity;
pub mod hud;
pub mod level;
pub mod physics;
pub mod projectile;
pub mod render;
pub mod replay;
pub mod sprites;
pub mod world;
