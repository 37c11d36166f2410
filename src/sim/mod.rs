//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, threaded through explicitly
//! - Stable iteration order where rng draws depend on it
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod world;

pub use enemy::{Enemy, EnemyRegistry};
pub use projectile::{Aabb, DiscPhase, DiscProjectile, OrbProjectile};
pub use state::{BloodOverlay, Direction, GameEvent, GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
pub use world::{Chunk, Tile, Viewport, World, generate_chunk, tile_variant};
