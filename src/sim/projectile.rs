//! Disc and orb projectiles
//!
//! The disc is the player's boomerang weapon: it flies out along a fixed
//! direction until its range budget runs out, then homes back onto the
//! player's current center and despawns on arrival. Orbs are enemy shots
//! with a single perpetual homing state; only the collision pass removes
//! them. Neither projectile stores a reference to the player - the player's
//! center is passed in fresh each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DISC_RANGE_TILES, DISC_SPEED, ORB_AIM_OFFSET, ORB_HITBOX, ORB_SPEED, TILE_SIZE};

/// Distance below which homing movement is skipped to avoid a degenerate
/// normalization
const HOMING_EPSILON: f32 = 1e-2;

/// Axis-aligned bounding box in world pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_topleft(pos: Vec2, size: f32) -> Self {
        Self {
            min: pos,
            max: pos + Vec2::splat(size),
        }
    }

    pub fn from_center(center: Vec2, size: f32) -> Self {
        Self::from_topleft(center - Vec2::splat(size / 2.0), size)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// Flight phase of a disc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscPhase {
    /// Flying along the launch direction, burning range
    Outbound,
    /// Homing back onto the player's current center
    Returning,
}

/// The player's thrown disc, a tile-sized projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscProjectile {
    /// Top-left corner, world pixels
    pub pos: Vec2,
    /// Normalized launch direction, fixed for the outbound leg
    dir: Vec2,
    /// Remaining outbound travel, pixels
    range_left: f32,
    pub phase: DiscPhase,
    pub active: bool,
}

impl DiscProjectile {
    /// Launch a disc centered on `center`, flying along `dir` (normalized by
    /// the caller) with the default range budget.
    pub fn launch(center: Vec2, dir: Vec2) -> Self {
        Self {
            pos: center - Vec2::splat(TILE_SIZE / 2.0),
            dir,
            range_left: DISC_RANGE_TILES * TILE_SIZE,
            phase: DiscPhase::Outbound,
            active: true,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(TILE_SIZE / 2.0)
    }

    /// Tile-sized bounding box at the current position
    pub fn aabb(&self) -> Aabb {
        Aabb::from_topleft(self.pos, TILE_SIZE)
    }

    /// Advance one tick. `player_center` is the live homing target for the
    /// return leg.
    pub fn advance(&mut self, player_center: Vec2) {
        match self.phase {
            DiscPhase::Outbound => {
                self.pos += self.dir * DISC_SPEED;
                self.range_left -= DISC_SPEED;
                if self.range_left <= 0.0 {
                    self.phase = DiscPhase::Returning;
                }
            }
            DiscPhase::Returning => {
                let to_player = player_center - self.center();
                let dist = to_player.length();
                if dist < DISC_SPEED {
                    self.active = false;
                    return;
                }
                self.pos += to_player / dist * DISC_SPEED;
            }
        }
    }
}

/// An enemy's homing orb, a tile-sized projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbProjectile {
    /// Top-left corner, world pixels
    pub pos: Vec2,
    pub active: bool,
}

impl OrbProjectile {
    /// Spawn an orb anchored at an enemy's tile
    pub fn at_tile(wx: i64, wy: i64) -> Self {
        Self {
            pos: Vec2::new(wx as f32 * TILE_SIZE, wy as f32 * TILE_SIZE),
            active: true,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(TILE_SIZE / 2.0)
    }

    /// Tile-sized bounding box at the current position
    pub fn aabb(&self) -> Aabb {
        Aabb::from_topleft(self.pos, TILE_SIZE)
    }

    /// Small hit region used for player damage, centered on the orb
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_center(self.center(), ORB_HITBOX)
    }

    /// Advance one tick toward the player's center plus the fixed aim offset.
    pub fn advance(&mut self, player_center: Vec2) {
        let target = player_center + Vec2::from(ORB_AIM_OFFSET);
        let to_target = target - self.center();
        let dist = to_target.length();
        if dist > HOMING_EPSILON {
            self.pos += to_target / dist * ORB_SPEED;
        }
    }
}

/// Advance every active disc and prune dead ones
pub fn advance_discs(discs: &mut Vec<DiscProjectile>, player_center: Vec2) {
    for disc in discs.iter_mut() {
        if disc.active {
            disc.advance(player_center);
        }
    }
    discs.retain(|d| d.active);
}

/// Advance every active orb and prune ones staged for removal
pub fn advance_orbs(orbs: &mut Vec<OrbProjectile>, player_center: Vec2) {
    for orb in orbs.iter_mut() {
        if orb.active {
            orb.advance(player_center);
        }
    }
    orbs.retain(|o| o.active);
}
