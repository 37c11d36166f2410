//! Platform abstraction layer
//!
//! The simulation is headless; an embedder supplies these three
//! collaborators:
//! - [`Renderer`]: draws tiles, entities, projectiles, and the health bar
//! - [`InputSource`]: held movement keys plus the attack edge event
//! - [`FrameClock`]: monotonic time and frame pacing at the fixed tick rate
//!
//! Tile drawing gets the tile kind, world coordinates, and a stable variant
//! index (see [`crate::sim::tile_variant`]) so a renderer with several images
//! per kind renders the same terrain every frame.

use glam::Vec2;

use crate::sim::{GameState, Tile, TickInput, Viewport};

/// Drawing surface for one frame. Screen positions are world pixels relative
/// to the viewport's top-left tile corner.
pub trait Renderer {
    /// How many images this renderer has per tile kind; variant indices
    /// passed to [`Renderer::draw_tile`] stay below this
    fn tile_variant_count(&self) -> usize {
        1
    }
    /// Called once per frame before any drawing
    fn begin_frame(&mut self, viewport: Viewport);
    /// Draw one terrain tile
    fn draw_tile(&mut self, tile: Tile, wx: i64, wy: i64, variant: usize);
    /// Draw an enemy at its tile
    fn draw_enemy(&mut self, wx: i64, wy: i64);
    /// Draw a blood overlay at its tile
    fn draw_blood(&mut self, wx: i64, wy: i64);
    /// Draw the player at a world pixel position
    fn draw_player(&mut self, pos: Vec2);
    /// Draw the transient attack sprite at a world pixel position
    fn draw_attack(&mut self, pos: Vec2);
    /// Draw a disc at a world pixel position
    fn draw_disc(&mut self, pos: Vec2);
    /// Draw an orb at a world pixel position
    fn draw_orb(&mut self, pos: Vec2);
    /// Draw the health bar
    fn draw_health(&mut self, current: i32, max: i32);
    /// Called once per frame after all drawing
    fn end_frame(&mut self);
}

/// Pressed-state provider, polled once per tick
pub trait InputSource {
    /// Input for the upcoming tick. Edge events (attack) must be reported
    /// for exactly one tick per press.
    fn poll(&mut self) -> TickInput;
}

/// Monotonic time source and frame pacer
pub trait FrameClock {
    /// Seconds since an arbitrary fixed origin
    fn now(&self) -> f64;
    /// Block until the next tick boundary at the fixed rate
    fn wait_for_next_tick(&mut self);
}

/// Draw a full frame of the given session: terrain, overlays, entities,
/// projectiles, player, health bar. The viewport is centered on the player.
pub fn render_frame<R: Renderer>(renderer: &mut R, state: &mut GameState) {
    let viewport = Viewport::around(state.player.center());
    renderer.begin_frame(viewport);

    let variants = renderer.tile_variant_count();
    for (wx, wy) in viewport.tiles() {
        let tile = state.world.get_tile(wx, wy);
        renderer.draw_tile(tile, wx, wy, crate::sim::tile_variant(wx, wy, tile, variants));
    }
    for blood in &state.blood {
        if viewport.contains(blood.wx, blood.wy) {
            renderer.draw_blood(blood.wx, blood.wy);
        }
    }
    for enemy in state.enemies.iter() {
        if viewport.contains(enemy.wx, enemy.wy) {
            renderer.draw_enemy(enemy.wx, enemy.wy);
        }
    }
    for disc in &state.discs {
        renderer.draw_disc(disc.pos);
    }
    for orb in &state.orbs {
        renderer.draw_orb(orb.pos);
    }
    renderer.draw_player(state.player.pos);
    if state.player.attack_ticks > 0 {
        let offset = state.player.facing.vec() * crate::consts::TILE_SIZE;
        renderer.draw_attack(state.player.pos + offset);
    }
    renderer.draw_health(state.player.health, crate::consts::MAX_HEALTH);

    renderer.end_frame();
}
