//! Headless runner: plays a replay (or a built-in script) through the fixed
//! step clock, renders every frame into a recording surface and logs the
//! outcome.

use std::path::PathBuf;

use pollo_core::input::{InputState, Key};
use pollo_core::time::TimeState;
use pollo_game::audio::CueRecorder;
use pollo_game::context::{GameEvent, GameStatus};
use pollo_game::level::{load_level_table, LevelTable};
use pollo_game::render::{render_frame, ImageCache, RecordingSurface};
use pollo_game::replay::{load_replay_from_path, ReplaySequence};
use pollo_game::sprites::TrackLibrary;
use pollo_game::world::World;

struct Options {
    level: u32,
    levels: Option<PathBuf>,
    tracks: Option<PathBuf>,
    replay: Option<PathBuf>,
    seed: u64,
}

fn usage() -> String {
    "Usage: pollo_game [--level N] [--levels FILE] [--tracks FILE] [--replay FILE] [--seed S]"
        .to_string()
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        level: 1,
        levels: None,
        tracks: None,
        replay: None,
        seed: 0,
    };
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {flag}\n{}", usage()))
        };
        match flag.as_str() {
            "--level" => {
                let raw = value()?;
                options.level = raw
                    .parse()
                    .map_err(|e| format!("Invalid level '{raw}': {e}"))?;
            }
            "--levels" => options.levels = Some(PathBuf::from(value()?)),
            "--tracks" => options.tracks = Some(PathBuf::from(value()?)),
            "--replay" => options.replay = Some(PathBuf::from(value()?)),
            "--seed" => {
                let raw = value()?;
                options.seed = raw
                    .parse()
                    .map_err(|e| format!("Invalid seed '{raw}': {e}"))?;
            }
            "--help" | "-h" => return Err(usage()),
            other => return Err(format!("Unknown argument '{other}'\n{}", usage())),
        }
    }
    Ok(options)
}

fn new_world(table: &LevelTable, level: u32, tracks: &TrackLibrary, seed: u64) -> Result<World, String> {
    let config = table
        .get(level)
        .cloned()
        .ok_or_else(|| format!("Level {level} not found ({} available)", table.levels.len()))?;
    Ok(World::new(
        config,
        tracks.clone(),
        Box::new(CueRecorder::new()),
        seed,
    ))
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let table = match &options.levels {
        Some(path) => load_level_table(path)?,
        None => LevelTable::builtin(),
    };
    let mut tracks = TrackLibrary::standard();
    if let Some(path) = &options.tracks {
        if let Err(err) = tracks.load_overrides(path) {
            log::warn!("{err}. Using built-in tracks.");
        }
    }
    let replay = match &options.replay {
        Some(path) => load_replay_from_path(path)?,
        None => ReplaySequence::builtin(),
    };

    let mut level = options.level;
    let mut world = new_world(&table, level, &tracks, options.seed)?;
    let mut images = ImageCache::for_world(&world);
    let mut surface = RecordingSurface::new();
    let mut time = TimeState::new();
    let mut input = InputState::new();
    let mut outcome = None;

    log::info!(
        "Running {} frame(s) at {} us per frame",
        replay.expanded().len(),
        replay.frame_us
    );

    for keys in replay.expanded() {
        input.set_held(&keys);
        if input.is_just_pressed(Key::M) {
            world.toggle_mute();
        }
        if input.is_just_pressed(Key::P) {
            world.toggle_pause();
        }

        time.begin_frame_with(replay.frame_us);
        let actions = input.actions();
        while time.should_step() {
            world.step(&actions);
        }
        input.end_frame();
        time.end_frame();

        let stats = render_frame(&world, &mut surface, &mut images);
        if time.frame_count == 1 {
            log::debug!("First frame: {} drawn, {} pending", stats.drawn, stats.pending);
            images.mark_all_ready();
        }

        for event in world.drain_events() {
            let GameEvent::GameOver(status) = event;
            outcome = Some(status);
            if status == GameStatus::Win && table.get(level + 1).is_some() {
                level += 1;
                log::info!("Advancing to level {level}");
                world = new_world(&table, level, &tracks, options.seed)?;
                images = ImageCache::for_world(&world);
                images.mark_all_ready();
                outcome = None;
            }
        }
    }

    let hud = world.hud();
    log::info!(
        "Finished after {} frames ({} steps, {:.1} fps avg): level '{}', coins {}, bottles {}, health {}, boss {}",
        time.frame_count,
        time.fixed_step_count,
        time.smoothed_fps,
        hud.level_label,
        hud.coins,
        hud.bottles,
        hud.character_health,
        hud.boss_health
    );
    match outcome {
        Some(status) => log::info!("Outcome: {}", status.as_str()),
        None => log::info!("Outcome: still playing"),
    }
    Ok(())
}
