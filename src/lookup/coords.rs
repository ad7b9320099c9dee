//! Pixel placements to normalized texture coordinates.
//!
//! Container images are stored top row first, while texture coordinates use
//! the OpenGL convention where `v` grows upward. A pixel row `y` therefore maps
//! to `v = 1 - y / atlas_height`, and the pixel-space top-left corner of a
//! placement becomes the corner with the largest `v`.

use glam::Vec2;

/// Normalized corners of a placement inside its container.
///
/// Corner order is top-left, bottom-left, bottom-right, top-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBounds {
    pub corners: [Vec2; 4],
}

impl NormalizedBounds {
    pub const TOP_LEFT: usize = 0;
    pub const BOTTOM_LEFT: usize = 1;
    pub const BOTTOM_RIGHT: usize = 2;
    pub const TOP_RIGHT: usize = 3;

    /// `(u_min, v_min)`, where local `(0, 0)` lands
    pub fn min(&self) -> Vec2 {
        self.corners[Self::BOTTOM_LEFT]
    }

    /// `(u_max, v_max)`, where local `(1, 1)` lands
    pub fn max(&self) -> Vec2 {
        self.corners[Self::TOP_RIGHT]
    }

    /// Map a coordinate meant for the original, unpacked image into the
    /// shared container image.
    pub fn remap(&self, local: Vec2) -> Vec2 {
        let start = self.min();
        let end = self.max();
        start + (end - start) * local
    }
}

/// Normalize a container-relative pixel rectangle
pub fn normalize(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    atlas_width: u32,
    atlas_height: u32,
) -> NormalizedBounds {
    let aw = atlas_width as f32;
    let ah = atlas_height as f32;

    let u1 = x as f32 / aw;
    let u2 = (u64::from(x) + u64::from(width)) as f32 / aw;
    let v1 = 1.0 - (u64::from(y) + u64::from(height)) as f32 / ah;
    let v2 = 1.0 - y as f32 / ah;

    NormalizedBounds {
        corners: [
            Vec2::new(u1, v2),
            Vec2::new(u1, v1),
            Vec2::new(u2, v1),
            Vec2::new(u2, v2),
        ],
    }
}
