//! A running level: the simulation context that owns every entity.
//!
//! One [`Level`] holds the map, the player, the NPC list, transient effects,
//! the pathfinder and the level RNG. A presentation layer drives it with
//! [`Level::simulate_tick`] and [`Level::fire_weapon`], reads the HUD
//! queries, and drains [`GameEvent`]s for sound and UI.
//!
//! Within a tick the order is fixed: elapsed time, player, NPCs in list
//! order, effect decay, victory check. Each NPC's move is committed before
//! the next NPC queries collision.

use gridshot_common::{tiles_to_world, CellCoord, LevelError, MapId, NpcId, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::collision::{hits_wall, CollisionQuery, Obstacle};
use crate::config::SimConfig;
use crate::effects::{update_effects, ShotEffect};
use crate::events::GameEvent;
use crate::grid_map::GridMap;
use crate::input::TickInput;
use crate::maps::{self, NpcSpawn};
use crate::npc::{DamageOutcome, Npc};
use crate::pathfinding::Pathfinder;
use crate::player::Player;
use crate::score::compute_score;
use crate::visibility::check_visibility;

/// Where a level stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Ticks and shots are processed
    #[default]
    Playing,
    /// Every NPC died
    Won,
    /// The player died
    Lost,
}

impl LevelPhase {
    /// Whether the level has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Simulation context for one play-through of one map.
#[derive(Debug)]
pub struct Level {
    map_id: Option<MapId>,
    map: GridMap,
    player: Player,
    npcs: Vec<Npc>,
    effects: Vec<ShotEffect>,
    pathfinder: Pathfinder,
    rng: fastrand::Rng,
    config: SimConfig,
    elapsed: f32,
    ticks: u64,
    phase: LevelPhase,
    events: Vec<GameEvent>,
}

impl Level {
    /// Starts a canonical map.
    pub fn new(map_id: MapId, config: &SimConfig) -> Result<Self, LevelError> {
        let def = maps::definition(map_id).ok_or(LevelError::UnknownMap(map_id))?;
        let map = GridMap::parse(def.layout)?;
        let level = Self::build(Some(map_id), map, maps::player_start(map_id), def.spawns, config)?;
        info!(
            "Level started: {map_id} with {} NPCs, seed {:#x}",
            level.npcs.len(),
            config.seed
        );
        Ok(level)
    }

    /// Starts a custom layout with an explicit player start and spawn list,
    /// both in tile units.
    pub fn from_layout<S: AsRef<str>>(
        rows: &[S],
        player_start: (f32, f32),
        spawns: &[NpcSpawn],
        config: &SimConfig,
    ) -> Result<Self, LevelError> {
        let map = GridMap::parse(rows)?;
        let level = Self::build(None, map, player_start, spawns, config)?;
        debug!("Custom level started with {} NPCs", level.npcs.len());
        Ok(level)
    }

    fn build(
        map_id: Option<MapId>,
        map: GridMap,
        player_start: (f32, f32),
        spawns: &[NpcSpawn],
        config: &SimConfig,
    ) -> Result<Self, LevelError> {
        let mut config = config.clone();
        config.validate();

        let tile = map.tile_size();
        let check_spawn = |pos: Vec2, radius: f32| {
            if hits_wall(&map, pos, radius) {
                let cell = CellCoord::from_world(pos, tile);
                Err(LevelError::SpawnBlocked {
                    x: cell.x,
                    y: cell.y,
                })
            } else {
                Ok(pos)
            }
        };

        let player_pos = check_spawn(
            tiles_to_world(player_start.0, player_start.1, tile),
            config.player_radius,
        )?;
        let npcs = spawns
            .iter()
            .enumerate()
            .map(|(i, spawn)| {
                let tuning = spawn.kind.tuning_for_tile(tile);
                let pos = check_spawn(tiles_to_world(spawn.x, spawn.y, tile), tuning.radius)?;
                Ok(Npc::with_tuning(NpcId::from_index(i), spawn.kind, pos, tuning))
            })
            .collect::<Result<Vec<_>, LevelError>>()?;

        let pathfinder = Pathfinder::for_map(&map, config.bounds_policy);

        Ok(Self {
            map_id,
            player: Player::new(player_pos, &config),
            npcs,
            effects: Vec::new(),
            pathfinder,
            rng: fastrand::Rng::with_seed(config.seed),
            config,
            elapsed: 0.0,
            ticks: 0,
            phase: LevelPhase::Playing,
            events: Vec::new(),
            map,
        })
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Does nothing once the level is won or lost. A negative or non-finite
    /// `dt` is treated as zero.
    pub fn simulate_tick(&mut self, dt: f32, input: &TickInput) {
        if self.phase != LevelPhase::Playing {
            return;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += dt;
        self.ticks += 1;

        self.update_player(dt, input);
        self.update_npcs(dt);
        update_effects(&mut self.effects, dt);
        self.check_victory();

        trace!(
            "tick {} t={:.3}s hp={} kills={}",
            self.ticks,
            self.elapsed,
            self.player.health(),
            self.kills()
        );
    }

    fn update_player(&mut self, dt: f32, input: &TickInput) {
        let obstacles: Vec<Obstacle> = self
            .npcs
            .iter()
            .filter(|npc| npc.is_alive())
            .map(Npc::as_obstacle)
            .collect();
        self.player.move_by(&self.map, input.movement, &obstacles);
        if let Some(target) = input.aim {
            self.player.aim(target, self.config.screen_center());
        }
        self.player.recover_health(dt);
    }

    fn update_npcs(&mut self, dt: f32) {
        let attack_chance = self.config.attack_chance_per_tick;
        let mut obstacles = Vec::with_capacity(self.npcs.len());

        for i in 0..self.npcs.len() {
            if !self.npcs[i].is_alive() {
                continue;
            }

            obstacles.clear();
            obstacles.extend(
                self.npcs
                    .iter()
                    .enumerate()
                    .filter(|&(j, other)| j != i && other.is_alive())
                    .map(|(_, other)| other.as_obstacle()),
            );
            obstacles.push(self.player.as_obstacle());

            let player_pos = self.player.position();
            let npc = &mut self.npcs[i];
            npc.tick_hurt(dt);
            npc.pursue(&self.map, player_pos, &obstacles);

            if !self.player.is_alive() {
                continue;
            }
            let npc = &self.npcs[i];
            if let Some(damage) = npc.attempt_attack(&self.map, player_pos, attack_chance, &mut self.rng) {
                let id = npc.id();
                self.events.push(GameEvent::NpcAttackLanded { npc: id, damage });
                self.damage_player(damage);
            }
        }
    }

    fn damage_player(&mut self, damage: i32) {
        if self.player.apply_damage(damage) {
            self.events.push(GameEvent::PlayerDied);
            if self.phase == LevelPhase::Playing {
                self.phase = LevelPhase::Lost;
                info!(
                    "Level lost after {:.1}s with {} kills, score {}",
                    self.elapsed,
                    self.kills(),
                    self.score()
                );
            }
        } else if self.player.is_alive() {
            self.events.push(GameEvent::PlayerHurt {
                damage,
                health: self.player.health(),
            });
        }
    }

    fn check_victory(&mut self) {
        if self.phase == LevelPhase::Playing && self.alive_npcs() == 0 {
            self.phase = LevelPhase::Won;
            self.events.push(GameEvent::LevelWon);
            info!(
                "Level won in {:.1}s with {} health, score {}",
                self.elapsed,
                self.player.health(),
                self.score()
            );
        }
    }

    /// Fires the player's weapon.
    ///
    /// Every alive NPC visible from the player takes the weapon damage.
    /// Returns the number of NPCs hit; zero and no side effects when the
    /// level is not being played.
    pub fn fire_weapon(&mut self) -> u32 {
        if self.phase != LevelPhase::Playing {
            return 0;
        }

        self.player.request_shot();
        let origin = self.player.position();
        self.effects.push(ShotEffect::muzzle_flash(origin, &self.config));

        let shot_index = self.events.len();
        self.events.push(GameEvent::ShotFired { hits: 0 });

        let damage = self.config.weapon_damage;
        let mut hits = 0;
        for npc in &mut self.npcs {
            if !npc.is_alive() || !check_visibility(&self.map, origin, npc.position()) {
                continue;
            }
            hits += 1;
            match npc.take_damage(damage, self.config.hurt_flash_secs) {
                DamageOutcome::Hurt => self.events.push(GameEvent::NpcHurt {
                    npc: npc.id(),
                    damage,
                }),
                DamageOutcome::Killed => self.events.push(GameEvent::NpcKilled {
                    npc: npc.id(),
                    kind: npc.kind(),
                }),
                DamageOutcome::Ignored => {},
            }
        }

        if let Some(GameEvent::ShotFired { hits: recorded }) = self.events.get_mut(shot_index) {
            *recorded = hits;
        }
        self.player.clear_shot();
        debug!("Shot {} hit {hits} NPCs", self.player.shots_fired());
        hits
    }

    /// Takes every event raised since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Next cell on a shortest walkable route, memoized for this level.
    pub fn next_step(&mut self, from: CellCoord, to: CellCoord) -> CellCoord {
        self.pathfinder.find_path(from, to)
    }

    /// Whether `to` is visible from `from` on this level's map.
    #[must_use]
    pub fn is_visible(&self, from: Vec2, to: Vec2) -> bool {
        check_visibility(&self.map, from, to)
    }

    /// Cell containing a world position.
    #[must_use]
    pub fn cell_of(&self, pos: Vec2) -> CellCoord {
        CellCoord::from_world(pos, self.map.tile_size())
    }

    // === HUD queries ===

    /// Player health.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.player.health()
    }

    /// Number of dead NPCs.
    #[must_use]
    pub fn kills(&self) -> u32 {
        self.npcs.iter().filter(|npc| !npc.is_alive()).count() as u32
    }

    /// Number of NPCs still alive.
    #[must_use]
    pub fn alive_npcs(&self) -> usize {
        self.npcs.iter().filter(|npc| npc.is_alive()).count()
    }

    /// Seconds of play so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Ticks processed while playing.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Current score.
    #[must_use]
    pub fn score(&self) -> i64 {
        compute_score(self.kills(), self.elapsed, self.player.health())
    }

    /// Level phase.
    #[must_use]
    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// Shots fired so far.
    #[must_use]
    pub fn shots_fired(&self) -> u32 {
        self.player.shots_fired()
    }

    /// Damage the player has received so far.
    #[must_use]
    pub fn damage_taken(&self) -> u32 {
        self.player.damage_taken()
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Every NPC, dead ones included, in spawn order.
    #[must_use]
    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    /// One NPC by id.
    #[must_use]
    pub fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(id.index())
    }

    /// Live effects.
    #[must_use]
    pub fn effects(&self) -> &[ShotEffect] {
        &self.effects
    }

    /// The static map.
    #[must_use]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// Canonical map id, or `None` for a custom layout.
    #[must_use]
    pub fn map_id(&self) -> Option<MapId> {
        self.map_id
    }

    /// The level's pathfinder.
    #[must_use]
    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Configuration the level was built with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}
