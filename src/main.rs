//! Disc Quest entry point
//!
//! Runs a headless demo session: a scripted input source wanders the infinite
//! world, throwing discs at whatever spawns, with an ASCII renderer dumping
//! the viewport to the log every few seconds. Game over rebuilds the session
//! in-process with a fresh seed.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::Serialize;

use disc_quest::consts::{MAX_HEALTH, SIM_DT, TILE_SIZE};
use disc_quest::platform::{FrameClock, InputSource, Renderer, render_frame};
use disc_quest::sim::{GameEvent, GamePhase, GameState, Tile, TickInput, Viewport, tick};

/// Demo length in ticks (30 seconds at 60 Hz)
const DEMO_TICKS: u64 = 30 * 60;
/// Ticks between ASCII frame dumps
const FRAME_DUMP_INTERVAL: u64 = 5 * 60;

/// Frame pacer over the system monotonic clock
struct StdClock {
    start: Instant,
    next_tick: Instant,
}

impl StdClock {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            next_tick: now,
        }
    }
}

impl FrameClock for StdClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn wait_for_next_tick(&mut self) {
        self.next_tick += Duration::from_secs_f64(SIM_DT);
        let now = Instant::now();
        if self.next_tick > now {
            std::thread::sleep(self.next_tick - now);
        } else {
            // Fell behind; resync instead of bursting to catch up
            self.next_tick = now;
        }
    }
}

/// Renders the viewport into a character grid
struct AsciiRenderer {
    viewport: Viewport,
    grid: Vec<Vec<char>>,
    health_line: String,
}

impl AsciiRenderer {
    fn new() -> Self {
        Self {
            viewport: Viewport::around(Vec2::ZERO),
            grid: Vec::new(),
            health_line: String::new(),
        }
    }

    fn plot_tile(&mut self, wx: i64, wy: i64, c: char) {
        let x = (wx - self.viewport.min_x) as usize;
        let y = (wy - self.viewport.min_y) as usize;
        if y < self.grid.len() && x < self.grid[y].len() {
            self.grid[y][x] = c;
        }
    }

    fn plot_pixel(&mut self, pos: Vec2, c: char) {
        let wx = (pos.x / TILE_SIZE).floor() as i64;
        let wy = (pos.y / TILE_SIZE).floor() as i64;
        self.plot_tile(wx, wy, c);
    }

    fn frame(&self) -> String {
        let mut out = String::with_capacity(
            (self.viewport.width as usize + 1) * self.viewport.height as usize + 32,
        );
        for row in &self.grid {
            out.push('\n');
            out.extend(row.iter());
        }
        out.push('\n');
        out.push_str(&self.health_line);
        out
    }
}

impl Renderer for AsciiRenderer {
    fn begin_frame(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.grid = vec![vec![' '; viewport.width as usize]; viewport.height as usize];
    }

    fn draw_tile(&mut self, tile: Tile, wx: i64, wy: i64, _variant: usize) {
        let c = match tile {
            Tile::Grass => '.',
            Tile::Water => '~',
        };
        self.plot_tile(wx, wy, c);
    }

    fn draw_enemy(&mut self, wx: i64, wy: i64) {
        self.plot_tile(wx, wy, 'M');
    }

    fn draw_blood(&mut self, wx: i64, wy: i64) {
        self.plot_tile(wx, wy, 'x');
    }

    fn draw_player(&mut self, pos: Vec2) {
        self.plot_pixel(pos, '@');
    }

    fn draw_attack(&mut self, pos: Vec2) {
        self.plot_pixel(pos, '/');
    }

    fn draw_disc(&mut self, pos: Vec2) {
        self.plot_pixel(pos, 'o');
    }

    fn draw_orb(&mut self, pos: Vec2) {
        self.plot_pixel(pos, '*');
    }

    fn draw_health(&mut self, current: i32, max: i32) {
        self.health_line = format!("HP {current}/{max}");
    }

    fn end_frame(&mut self) {}
}

/// Deterministic wandering input: walks each cardinal direction for two
/// seconds in turn and throws a disc every 90 ticks.
struct ScriptedInput {
    ticks: u64,
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> TickInput {
        let mut input = TickInput::default();
        match (self.ticks / 120) % 4 {
            0 => input.right = true,
            1 => input.down = true,
            2 => input.left = true,
            _ => input.up = true,
        }
        input.attack = self.ticks % 90 == 0;
        self.ticks += 1;
        input
    }
}

#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    sessions: u32,
    enemies_slain: u32,
    orbs_intercepted: u32,
    final_health: i32,
    chunks_generated: usize,
}

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Disc Quest starting with seed {seed}");

    let mut state = GameState::new(seed);
    let mut input_source = ScriptedInput { ticks: 0 };
    let mut renderer = AsciiRenderer::new();
    let mut clock = StdClock::new();

    let mut sessions = 1u32;
    let mut enemies_slain = 0u32;
    let mut orbs_intercepted = 0u32;

    for frame in 0..DEMO_TICKS {
        let input = input_source.poll();
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::EnemySpawned { wx, wy } => {
                    log::debug!("enemy spawned at ({wx}, {wy})");
                }
                GameEvent::EnemySlain { wx, wy } => {
                    enemies_slain += 1;
                    log::info!("enemy slain at ({wx}, {wy})");
                }
                GameEvent::OrbIntercepted => {
                    orbs_intercepted += 1;
                    log::info!("disc intercepted an orb");
                }
                GameEvent::PlayerHit { health } => {
                    log::warn!("player hit, health {health}/{MAX_HEALTH}");
                }
                GameEvent::GameOver => {
                    log::warn!("game over at tick {} - restarting", state.time_ticks);
                }
                GameEvent::DiscThrown => {}
            }
        }

        if state.phase == GamePhase::GameOver {
            // In-process restart: tear down the whole session object graph
            state = GameState::new(seed.wrapping_add(sessions as u64));
            sessions += 1;
        }

        render_frame(&mut renderer, &mut state);
        if frame % FRAME_DUMP_INTERVAL == 0 {
            log::info!("t={:.1}s{}", clock.now(), renderer.frame());
        }

        clock.wait_for_next_tick();
    }

    let summary = RunSummary {
        seed,
        ticks: DEMO_TICKS,
        sessions,
        enemies_slain,
        orbs_intercepted,
        final_health: state.player.health,
        chunks_generated: state.world.cached_chunks(),
    };
    match serde_json::to_string(&summary) {
        Ok(json) => log::info!("run summary: {json}"),
        Err(e) => log::error!("failed to serialize run summary: {e}"),
    }
}
