//! Camera, projection and picking
//!
//! Pure functions of the current state so the renderer holds no game logic:
//! the camera follows the player, ducks spin as a function of time, and a
//! canvas click becomes a world-space ray tested against every duck.

use glam::{Mat4, Vec2, Vec3};

use crate::consts::*;
use crate::sim::Collectible;

/// Chase camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Camera {
    /// Camera behind and above the player, looking at it
    pub fn follow(player_pos: Vec3) -> Self {
        Self {
            eye: player_pos + CAMERA_OFFSET,
            target: player_pos,
        }
    }

    /// Combined view-projection matrix for a viewport aspect ratio
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(CAMERA_FOV_Y, aspect, CAMERA_NEAR, CAMERA_FAR);
        let view = Mat4::look_at_rh(self.eye, self.target, Vec3::Y);
        proj * view
    }
}

/// Half-line in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub dir: Vec3,
}

impl Ray {
    /// Distance along the ray to the first hit on a sphere, if any
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        // Near hit, or far hit when the origin is inside the sphere
        [-b - sqrt_disc, -b + sqrt_disc]
            .into_iter()
            .find(|t| *t >= 0.0)
    }
}

/// World point to canvas pixels (origin top-left). None if behind the camera.
pub fn project(view_proj: Mat4, world: Vec3, viewport: Vec2) -> Option<Vec2> {
    let clip = view_proj * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    ))
}

/// Canvas pixel to a world-space ray leaving the camera
pub fn screen_ray(view_proj: Mat4, screen: Vec2, viewport: Vec2) -> Ray {
    let ndc_x = screen.x / viewport.x * 2.0 - 1.0;
    let ndc_y = 1.0 - screen.y / viewport.y * 2.0;
    let inv = view_proj.inverse();
    // perspective_rh maps depth to [0, 1]
    let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
    let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
    Ray {
        origin: near,
        dir: (far - near).normalize(),
    }
}

/// Id of the closest duck hit by the ray
pub fn pick(ray: &Ray, collectibles: &[Collectible], radius: f32) -> Option<u32> {
    collectibles
        .iter()
        .filter_map(|c| ray.intersect_sphere(c.pos, radius).map(|t| (t, c.id)))
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, id)| id)
}

/// Something the renderer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Player,
    Duck(u32),
}

/// Player and ducks in painter's order (farthest first), skipping anything
/// behind the camera
pub fn draw_order(view_proj: Mat4, player: Vec3, collectibles: &[Collectible]) -> Vec<(Sprite, Vec3)> {
    let mut sprites: Vec<(f32, Sprite, Vec3)> = std::iter::once((Sprite::Player, player))
        .chain(collectibles.iter().map(|c| (Sprite::Duck(c.id), c.pos)))
        .map(|(sprite, pos)| ((view_proj * pos.extend(1.0)).w, sprite, pos))
        .filter(|(w, _, _)| *w > 0.0)
        .collect();
    sprites.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    sprites.into_iter().map(|(_, sprite, pos)| (sprite, pos)).collect()
}

/// Duck heading after `elapsed_secs`
#[inline]
pub fn duck_yaw(elapsed_secs: f32) -> f32 {
    DUCK_SPIN_RATE * elapsed_secs
}
