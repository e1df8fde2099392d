//! Collision tests
//!
//! Combat collision is deliberately simple: projectiles vs. actors is an
//! interval test on the lateral axis plus a depth-order check, projectiles
//! vs. the player is a sphere test, and splash damage is a radius query.

use glam::Vec3;

/// Check a projectile against an actor standing at `actor_pos`
///
/// The projectile is a candidate hit when it lies inside the actor's lateral
/// interval `[x - half_width, x + half_width]` and has reached (or passed) the
/// actor's depth.
#[inline]
pub fn projectile_actor_hit(projectile_pos: Vec3, actor_pos: Vec3, half_width: f32) -> bool {
    (projectile_pos.x - actor_pos.x).abs() <= half_width && projectile_pos.z >= actor_pos.z
}

/// Check whether a point lies inside a sphere (surface inclusive)
#[inline]
pub fn point_in_sphere(point: Vec3, center: Vec3, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Strictly-inside radius test used for splash damage
#[inline]
pub fn strictly_within(point: Vec3, center: Vec3, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Has a projectile flying toward the player overshot the defense line?
#[inline]
pub fn overshot(projectile_pos: Vec3, player_depth: f32) -> bool {
    projectile_pos.z < player_depth
}
