//! Per-tick collision resolution
//!
//! Runs in a fixed order so a single orb or disc is never double-counted
//! within one tick:
//!
//! 1. player vs orbs (damage, debounced)
//! 2. discs vs orbs (interception)
//! 3. discs vs enemies (kills + blood overlays)
//!
//! Side effects are applied immediately; passes iterate over snapshots or
//! use `retain` so removal during the pass is safe.

use crate::consts::{ORB_DAMAGE, TILE_SIZE};

use super::state::{BloodOverlay, GameEvent, GamePhase, GameState};

/// Resolve all projectile and contact interactions for this tick.
pub fn resolve(state: &mut GameState) {
    player_vs_orbs(state);
    discs_vs_orbs(state);
    discs_vs_enemies(state);
}

/// Orbs overlapping the player's hit box are removed and deal damage.
///
/// Damage lands only on the rising edge of the overlap flag: continuous
/// contact drains health once, and it takes a contact-free tick before the
/// next hit counts. Health is clamped at zero, which ends the session.
fn player_vs_orbs(state: &mut GameState) {
    let player_box = state.player.hitbox();

    let mut hit_this_tick = false;
    state.orbs.retain(|orb| {
        if player_box.intersects(&orb.hitbox()) {
            hit_this_tick = true;
            false
        } else {
            true
        }
    });

    if hit_this_tick && !state.player.hit_last_tick {
        let health = state.player.apply_damage(ORB_DAMAGE);
        state.events.push(GameEvent::PlayerHit { health });
        if health == 0 && state.phase == GamePhase::Playing {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver);
        }
    }
    state.player.hit_last_tick = hit_this_tick;
}

/// Any active disc within one tile (per-axis) of an orb destroys the orb.
/// The disc passes through unaffected.
fn discs_vs_orbs(state: &mut GameState) {
    let disc_centers: Vec<glam::Vec2> = state
        .discs
        .iter()
        .filter(|d| d.active)
        .map(|d| d.center())
        .collect();

    let events = &mut state.events;
    state.orbs.retain(|orb| {
        let oc = orb.center();
        let intercepted = disc_centers
            .iter()
            .any(|dc| (dc.x - oc.x).abs() <= TILE_SIZE && (dc.y - oc.y).abs() <= TILE_SIZE);
        if intercepted {
            events.push(GameEvent::OrbIntercepted);
        }
        !intercepted
    });
}

/// Discs overlapping an enemy's tile rectangle kill the enemy and leave a
/// permanent blood overlay. The enemy's shot timer is dropped by the next
/// schedule pass.
fn discs_vs_enemies(state: &mut GameState) {
    // Snapshot the enemy set; kills mutate the registry mid-pass
    let enemies: Vec<super::enemy::Enemy> = state.enemies.iter().copied().collect();

    for enemy in enemies {
        let target = enemy.aabb();
        let hit = state
            .discs
            .iter()
            .any(|d| d.active && d.aabb().intersects(&target));
        if hit {
            state.enemies.remove((enemy.wx, enemy.wy));
            state.blood.push(BloodOverlay {
                wx: enemy.wx,
                wy: enemy.wy,
            });
            state.events.push(GameEvent::EnemySlain {
                wx: enemy.wx,
                wy: enemy.wy,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_HEALTH;
    use crate::sim::projectile::{DiscProjectile, OrbProjectile};
    use glam::Vec2;

    /// An orb whose hit box overlaps the player's
    fn orb_on_player(state: &GameState) -> OrbProjectile {
        let mut orb = OrbProjectile::at_tile(0, 0);
        orb.pos = state.player.pos;
        orb
    }

    #[test]
    fn orb_hit_damages_and_removes_the_orb() {
        let mut state = GameState::new(1);
        let orb = orb_on_player(&state);
        state.add_orb(orb);

        resolve(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - ORB_DAMAGE);
        assert!(state.orbs.is_empty());
        assert!(state.events.contains(&GameEvent::PlayerHit {
            health: MAX_HEALTH - ORB_DAMAGE
        }));
    }

    #[test]
    fn continuous_overlap_damages_once() {
        let mut state = GameState::new(1);

        // Three separated hits: 100 -> 70
        for _ in 0..3 {
            let orb = orb_on_player(&state);
            state.add_orb(orb);
            resolve(&mut state);
            resolve(&mut state); // contact-free tick clears the debounce
        }
        assert_eq!(state.player.health, MAX_HEALTH - 3 * ORB_DAMAGE);

        // Two orbs landing on the same tick still cost one hit
        let a = orb_on_player(&state);
        let b = orb_on_player(&state);
        state.add_orb(a);
        state.add_orb(b);
        resolve(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - 4 * ORB_DAMAGE);

        // Immediate re-overlap on the very next tick is debounced
        let c = orb_on_player(&state);
        state.add_orb(c);
        resolve(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - 4 * ORB_DAMAGE);

        // After a contact-free tick the next hit counts again
        resolve(&mut state);
        let d = orb_on_player(&state);
        state.add_orb(d);
        resolve(&mut state);
        assert_eq!(state.player.health, MAX_HEALTH - 5 * ORB_DAMAGE);
    }

    #[test]
    fn health_zero_ends_the_session() {
        let mut state = GameState::new(1);
        state.player.health = ORB_DAMAGE;
        let orb = orb_on_player(&state);
        state.add_orb(orb);

        resolve(&mut state);
        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn disc_intercepts_orb_and_survives() {
        let mut state = GameState::new(1);
        let disc = DiscProjectile::launch(Vec2::new(400.0, 400.0), Vec2::X);
        // Orb one tile to the right of the disc: within Chebyshev range
        let mut orb = OrbProjectile::at_tile(0, 0);
        orb.pos = Vec2::new(400.0 + TILE_SIZE - 16.0, 400.0 - 16.0);
        state.add_disc(disc);
        state.add_orb(orb);

        resolve(&mut state);
        assert!(state.orbs.is_empty());
        assert_eq!(state.discs.len(), 1);
        assert!(state.discs[0].active);
        assert!(state.events.contains(&GameEvent::OrbIntercepted));
    }

    #[test]
    fn far_orb_is_not_intercepted() {
        let mut state = GameState::new(1);
        let disc = DiscProjectile::launch(Vec2::new(400.0, 400.0), Vec2::X);
        let orb = OrbProjectile::at_tile(20, 20);
        state.add_disc(disc);
        state.add_orb(orb);

        resolve(&mut state);
        assert_eq!(state.orbs.len(), 1);
    }

    #[test]
    fn disc_kill_leaves_one_blood_overlay() {
        let mut state = GameState::new(1);
        state.enemies.insert((10, 10));
        // Disc centered on the enemy tile
        let center = Vec2::new(10.5 * TILE_SIZE, 10.5 * TILE_SIZE);
        state.add_disc(DiscProjectile::launch(center, Vec2::X));

        resolve(&mut state);
        assert!(!state.enemies.contains((10, 10)));
        assert_eq!(state.blood, vec![BloodOverlay { wx: 10, wy: 10 }]);
        assert!(state.events.contains(&GameEvent::EnemySlain { wx: 10, wy: 10 }));
    }
}
