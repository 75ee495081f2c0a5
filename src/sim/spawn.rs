//! Duck spawning
//!
//! Produces a fresh batch of collectibles scattered over the arena.

use glam::Vec3;
use rand::Rng;

use super::state::Collectible;

/// Spawn `count` ducks with ids `0..count`.
///
/// x and z are drawn uniformly from `[-bounds, bounds)`; y is `rest_height`.
/// A zero (or invalid) `bounds` puts every duck at the origin. Any finite
/// `bounds` works, up to `f32::MAX`.
pub fn spawn<R: Rng>(count: u32, bounds: f32, rest_height: f32, rng: &mut R) -> Vec<Collectible> {
    let half = if bounds.is_finite() { bounds.abs() } else { 0.0 };

    (0..count)
        .map(|id| {
            // Scale a unit draw; a range of width 2 * half can overflow
            let x = (2.0 * rng.random::<f32>() - 1.0) * half;
            let z = (2.0 * rng.random::<f32>() - 1.0) * half;
            Collectible {
                id,
                pos: Vec3::new(x, rest_height, z),
            }
        })
        .collect()
}
