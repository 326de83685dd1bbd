//! Headless application loop.
//!
//! Plays one level with a scripted autopilot through the public simulation
//! API, then records the final score in the high-score store.

use anyhow::{Context, Result};
use gridshot_common::{MapId, Vec2};
use gridshot_gameplay::{CollisionQuery, HighScoreStore, Level, LevelPhase, MoveIntent, Npc, TickInput};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::score_store::open_store;
use crate::timing::FrameTiming;

/// Distance below which the autopilot stops steering on an axis.
const STEER_DEAD_ZONE: f32 = 2.0;

/// Outcome of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Canonical map played, `None` for a custom layout
    pub map: Option<MapId>,
    /// Final phase; `Playing` if the tick budget ran out
    pub phase: LevelPhase,
    /// Ticks simulated
    pub ticks: u64,
    /// Seconds of play
    pub elapsed: f32,
    /// NPCs killed
    pub kills: u32,
    /// Remaining player health
    pub health: i32,
    /// Final score
    pub score: i64,
    /// Shots fired
    pub shots_fired: u32,
    /// Damage the player received
    pub damage_taken: u32,
    /// Rank the score took in the high-score table, if it placed
    pub high_score_rank: Option<usize>,
}

/// Scripted player: walks toward the nearest NPC and shoots whatever it
/// can see.
#[derive(Debug, Clone)]
pub struct Autopilot {
    fire_interval: u32,
    cooldown: u32,
}

impl Autopilot {
    /// Creates an autopilot that fires at most once every `fire_interval`
    /// ticks.
    #[must_use]
    pub fn new(fire_interval: u32) -> Self {
        Self {
            fire_interval: fire_interval.max(1),
            cooldown: 0,
        }
    }

    /// Decides this tick's input and whether to pull the trigger.
    pub fn plan(&mut self, level: &mut Level) -> (TickInput, bool) {
        self.cooldown = self.cooldown.saturating_sub(1);

        let player_pos = level.player().position();
        let Some(target) = nearest_alive(level.npcs(), player_pos) else {
            return (TickInput::idle(), false);
        };
        let target_pos = target.position();

        // The camera follows the player, so the pointer sits at the same
        // offset from the screen centre as the target is from the player.
        let aim = level.config().screen_center() + (target_pos - player_pos);

        if level.is_visible(player_pos, target_pos) {
            let fire = self.cooldown == 0;
            if fire {
                self.cooldown = self.fire_interval;
            }
            return (TickInput::idle().with_aim(aim), fire);
        }

        let from = level.cell_of(player_pos);
        let goal = level.cell_of(target_pos);
        let next = level.next_step(from, goal);
        let tile = level.map().tile_size();
        let movement = MoveIntent::toward(next.world_center(tile) - player_pos, STEER_DEAD_ZONE);
        (TickInput::moving(movement).with_aim(aim), false)
    }
}

fn nearest_alive(npcs: &[Npc], from: Vec2) -> Option<&Npc> {
    npcs.iter()
        .filter(|npc| npc.is_alive())
        .min_by(|a, b| a.distance_to(from).total_cmp(&b.distance_to(from)))
}

/// Drives a level until it ends or `max_ticks` run out.
pub fn play(level: &mut Level, autopilot: &mut Autopilot, dt: f32, max_ticks: u32) {
    for _ in 0..max_ticks {
        if !step(level, autopilot, dt) {
            break;
        }
    }
}

/// Plays one tick. Returns `false` once the level has ended.
fn step(level: &mut Level, autopilot: &mut Autopilot, dt: f32) -> bool {
    let (input, fire) = autopilot.plan(level);
    if fire {
        level.fire_weapon();
    }
    level.simulate_tick(dt, &input);

    for event in level.drain_events() {
        match event.sound_cue() {
            Some(cue) => debug!("{event:?} [{cue}]"),
            None => debug!("{event:?}"),
        }
    }
    level.phase() == LevelPhase::Playing
}

/// Same as [`play`] but paced against the wall clock.
fn play_realtime(level: &mut Level, autopilot: &mut Autopilot, timing: &mut FrameTiming, max_ticks: u32) {
    let dt = timing.fixed_dt();
    let mut remaining = max_ticks;
    timing.reset();

    while remaining > 0 {
        let frame_dt = timing.delta_time();
        let due = timing.accumulate(frame_dt).min(remaining);
        for _ in 0..due {
            remaining -= 1;
            if !step(level, autopilot, dt) {
                return;
            }
        }
        timing.sleep_remainder();
    }
    debug!("Average frame time {:.2}ms", timing.average_frame_time_ms());
}

/// Summarizes a level and records its score if the level ended.
pub fn finish(level: &Level, store: &dyn HighScoreStore) -> RunSummary {
    let score = level.score();
    let mut high_score_rank = None;

    if level.phase().is_over() {
        let mut table = store.load_or_default();
        high_score_rank = table.record(score);
        if high_score_rank.is_some() {
            match store.save(&table) {
                Ok(()) => info!("New high score {score}!"),
                Err(e) => warn!("Failed to save high scores: {e}"),
            }
        }
    }

    RunSummary {
        map: level.map_id(),
        phase: level.phase(),
        ticks: level.ticks(),
        elapsed: level.elapsed(),
        kills: level.kills(),
        health: level.health(),
        score,
        shots_fired: level.shots_fired(),
        damage_taken: level.damage_taken(),
        high_score_rank,
    }
}

/// Runs the configured level to completion.
pub fn run(config: &EngineConfig) -> Result<RunSummary> {
    let map = config.map();
    let mut level = Level::new(map, &config.effective_sim())
        .with_context(|| format!("failed to start {map}"))?;
    let mut autopilot = Autopilot::new(config.fire_interval);

    if config.realtime {
        let mut timing = FrameTiming::new(config.tick_rate);
        play_realtime(&mut level, &mut autopilot, &mut timing, config.max_ticks);
    } else {
        play(&mut level, &mut autopilot, config.tick_dt(), config.max_ticks);
    }

    let store = open_store(config.score_format, &config.score_file);
    let summary = finish(&level, store.as_ref());

    info!(
        "{map} finished: {:?} after {:.1}s, {} kills, {} health, {} shots, score {}",
        summary.phase,
        summary.elapsed,
        summary.kills,
        summary.health,
        summary.shots_fired,
        summary.score
    );
    Ok(summary)
}
