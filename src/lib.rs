//! Disc Quest - an infinite-tile-world arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world generation, entities, projectiles, collisions)
//! - `platform`: Renderer/input/clock abstraction for embedders
//!
//! The simulation is headless: rendering, input polling, and frame pacing are
//! supplied by the embedder through the traits in [`platform`].

pub mod platform;
pub mod sim;

pub use sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Side length of a terrain tile in pixels
    pub const TILE_SIZE: f32 = 32.0;
    /// Side length of a chunk in tiles
    pub const CHUNK_SIZE: i64 = 8;
    /// Probability that a leftover water cell becomes grass
    pub const EXTRA_GRASS_CHANCE: f64 = 0.4;

    /// Viewport dimensions (640x480 screen at 32px tiles)
    pub const VIEW_TILES_X: i64 = 20;
    pub const VIEW_TILES_Y: i64 = 15;

    /// Player movement speed, pixels per tick
    pub const PLAYER_SPEED: f32 = 2.0;
    /// Starting and maximum player health
    pub const MAX_HEALTH: i32 = 100;
    /// Health lost per orb hit
    pub const ORB_DAMAGE: i32 = 10;
    /// Ticks the attack sprite stays visible after firing
    pub const ATTACK_DISPLAY_TICKS: u32 = 8;

    /// Disc flight speed, pixels per tick
    pub const DISC_SPEED: f32 = 8.0;
    /// Disc outbound range in tiles
    pub const DISC_RANGE_TILES: f32 = 4.0;

    /// Orb flight speed, pixels per tick
    pub const ORB_SPEED: f32 = 1.0;
    /// Orb shot interval bounds, seconds
    pub const ORB_INTERVAL_MIN: f64 = 5.0;
    pub const ORB_INTERVAL_MAX: f64 = 10.0;
    /// Aim offset applied to the player-center target so orbs drift slightly
    /// off-center rather than tracking the exact sprite center
    pub const ORB_AIM_OFFSET: (f32, f32) = (6.0, 6.0);

    /// Chance per tick of spawning an enemy somewhere in the viewport
    pub const ENEMY_SPAWN_CHANCE: f64 = 0.01;

    /// Player hit box side length (centered inside the 32px sprite)
    pub const PLAYER_HITBOX: f32 = 16.0;
    /// Orb hit box side length (centered on the orb)
    pub const ORB_HITBOX: f32 = 12.0;

    /// 1/sqrt(2), diagonal movement factor
    pub const DIAGONAL_FACTOR: f32 = 0.707_1;
}

/// Split a world tile coordinate into (chunk index, in-chunk offset).
///
/// Uses floor semantics so negative coordinates map correctly: the offset is
/// always in `0..chunk_size`.
#[inline]
pub fn floor_divmod(v: i64, chunk_size: i64) -> (i64, i64) {
    (v.div_euclid(chunk_size), v.rem_euclid(chunk_size))
}

/// Convert a continuous pixel coordinate to a world tile coordinate.
#[inline]
pub fn pixel_to_tile(px: f32) -> i64 {
    (px / consts::TILE_SIZE).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn floor_divmod_offset_in_range(v in i64::MIN / 2..i64::MAX / 2) {
            let (c, t) = floor_divmod(v, consts::CHUNK_SIZE);
            prop_assert!((0..consts::CHUNK_SIZE).contains(&t));
            prop_assert_eq!(c * consts::CHUNK_SIZE + t, v);
        }
    }

    #[test]
    fn floor_divmod_negative_coordinates() {
        assert_eq!(floor_divmod(-1, 8), (-1, 7));
        assert_eq!(floor_divmod(-8, 8), (-1, 0));
        assert_eq!(floor_divmod(-9, 8), (-2, 7));
        assert_eq!(floor_divmod(0, 8), (0, 0));
        assert_eq!(floor_divmod(7, 8), (0, 7));
    }

    #[test]
    fn pixel_to_tile_floors() {
        assert_eq!(pixel_to_tile(0.0), 0);
        assert_eq!(pixel_to_tile(31.9), 0);
        assert_eq!(pixel_to_tile(32.0), 1);
        assert_eq!(pixel_to_tile(-0.1), -1);
        assert_eq!(pixel_to_tile(-32.0), -1);
        assert_eq!(pixel_to_tile(-32.1), -2);
    }
}
