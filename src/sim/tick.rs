//! Fixed timestep simulation tick
//!
//! One call advances the whole session by one 60 Hz frame, in a fixed order:
//! collisions, attack intent, movement, enemy spawn, projectile advance,
//! orb scheduling. Collisions run before movement is applied; the order is a
//! deliberate choice and must stay consistent, since debounced damage and
//! interception both depend on it.

use glam::Vec2;

use crate::consts::DIAGONAL_FACTOR;

use super::collision;
use super::projectile::{self, DiscProjectile};
use super::state::{Direction, GameEvent, GamePhase, GameState};
use super::world::Viewport;

/// Held input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Attack trigger, edge event (one disc per press)
    pub attack: bool,
}

impl TickInput {
    /// Movement vector from the held keys, diagonals normalized. Also
    /// returns the cardinal direction when exactly one axis is held.
    fn held_vector(&self) -> (Vec2, Option<Direction>) {
        let mut dx = 0.0f32;
        let mut dy = 0.0f32;
        if self.right && !self.left {
            dx = 1.0;
        }
        if self.left && !self.right {
            dx = -1.0;
        }
        if self.down && !self.up {
            dy = 1.0;
        }
        if self.up && !self.down {
            dy = -1.0;
        }
        if dx != 0.0 && dy != 0.0 {
            dx *= DIAGONAL_FACTOR;
            dy *= DIAGONAL_FACTOR;
        }
        let cardinal = if dy == 0.0 && dx == 1.0 {
            Some(Direction::Right)
        } else if dy == 0.0 && dx == -1.0 {
            Some(Direction::Left)
        } else if dx == 0.0 && dy == -1.0 {
            Some(Direction::Up)
        } else if dx == 0.0 && dy == 1.0 {
            Some(Direction::Down)
        } else {
            None
        };
        (Vec2::new(dx, dy), cardinal)
    }
}

/// Advance the game state by one fixed timestep.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    // 1. Resolve last frame's overlaps before anything moves
    collision::resolve(state);
    if state.phase == GamePhase::GameOver {
        return;
    }

    // 2. Attack intent: fire along the held direction, falling back to the
    //    last held cardinal; a pure cardinal also becomes the new fallback
    if input.attack {
        let (held, cardinal) = input.held_vector();
        let dir = if held == Vec2::ZERO {
            state.player.last_dir.vec()
        } else {
            held
        };
        if let Some(cardinal) = cardinal {
            state.player.last_dir = cardinal;
        }
        let fire_dir = cardinal.unwrap_or(state.player.last_dir);
        state.player.show_attack(fire_dir);
        let disc = DiscProjectile::launch(state.player.center(), dir);
        state.add_disc(disc);
        state.events.push(GameEvent::DiscThrown);
    }

    // 3. Movement: no terrain collision, water is walkable
    let (held, cardinal) = input.held_vector();
    state.player.pos += held * state.player.speed;
    if let Some(cardinal) = cardinal {
        state.player.last_dir = cardinal;
        state.player.facing = cardinal;
    }
    state.player.attack_ticks = state.player.attack_ticks.saturating_sub(1);

    // 4. Enemy spawn roll
    let viewport = Viewport::around(state.player.center());
    if let Some((wx, wy)) =
        state
            .enemies
            .spawn_if_eligible(&mut state.rng, viewport, state.player.tile())
    {
        state.events.push(GameEvent::EnemySpawned { wx, wy });
    }

    // 5. Advance projectiles and prune dead ones
    let player_center = state.player.center();
    projectile::advance_discs(&mut state.discs, player_center);
    projectile::advance_orbs(&mut state.orbs, player_center);

    // 6. Orb shot schedule
    let now = state.now();
    let fired = state.enemies.tick_orb_spawns(&mut state.rng, now);
    for orb in fired {
        state.add_orb(orb);
    }
}
