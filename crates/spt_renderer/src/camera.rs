//! Pinhole camera for primary ray generation.

use rand::RngCore;
use spt_core::CameraDesc;

use crate::{gen_f64, Ray, Vec3, VecExt};

/// Maps sub-pixel positions to camera rays.
///
/// The image plane is spanned by `cx` (horizontal, scaled by the aspect
/// ratio) and `cy` (vertical); rays are pushed `near_offset` units forward
/// before tracing so they start inside the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    direction: Vec3,
    cx: Vec3,
    cy: Vec3,
    near_offset: f64,
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(desc: &CameraDesc, width: u32, height: u32) -> Self {
        let direction = Vec3::from_array(desc.direction).normalized();
        let cx = Vec3::new(width as f64 * desc.fov_scale / height as f64, 0.0, 0.0);
        let cy = cx.cross(direction).normalized() * desc.fov_scale;

        Self {
            origin: Vec3::from_array(desc.origin),
            direction,
            cx,
            cy,
            near_offset: desc.near_offset,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Jittered ray through sub-pixel `(sx, sy)` of pixel `(x, y)`.
    ///
    /// `y` counts up from the bottom of the image; `sx` and `sy` are 0 or 1.
    pub fn get_ray(&self, x: u32, y: u32, sx: u32, sy: u32, rng: &mut dyn RngCore) -> Ray {
        let dx = tent(2.0 * gen_f64(rng));
        let dy = tent(2.0 * gen_f64(rng));

        let px = ((sx as f64 + 0.5 + dx) / 2.0 + x as f64) / self.width as f64 - 0.5;
        let py = ((sy as f64 + 0.5 + dy) / 2.0 + y as f64) / self.height as f64 - 0.5;
        let d = self.cx * px + self.cy * py + self.direction;

        Ray::new(self.origin + d * self.near_offset, d.normalized())
    }
}

/// Tent filter warp of `r` in [0, 2) to an offset in [-1, 1).
#[inline]
pub fn tent(r: f64) -> f64 {
    if r < 1.0 {
        r.sqrt() - 1.0
    } else {
        1.0 - (2.0 - r).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_tent_range_and_shape() {
        assert_eq!(tent(0.0), -1.0);
        assert_eq!(tent(1.0), 0.0);
        assert!((tent(2.0 - 1e-12)).abs() < 1.0);

        // Monotone over the whole domain
        let mut last = tent(0.0);
        for i in 1..200 {
            let v = tent(i as f64 / 100.0);
            assert!(v >= last);
            assert!((-1.0..1.0).contains(&v));
            last = v;
        }
    }

    #[test]
    fn test_default_camera_basis() {
        let camera = Camera::new(&CameraDesc::default(), 1024, 768);

        assert!((camera.direction.length() - 1.0).abs() < 1e-12);
        assert!((camera.cx.x - 1024.0 * 0.5135 / 768.0).abs() < 1e-12);
        // cy is perpendicular to the view direction and points up
        assert!(camera.cy.dot(camera.direction).abs() < 1e-12);
        assert!(camera.cy.y > 0.0);
        assert!((camera.cy.length() - 0.5135).abs() < 1e-12);
    }

    #[test]
    fn test_rays_start_in_front_of_camera() {
        let desc = CameraDesc::default();
        let camera = Camera::new(&desc, 64, 48);
        let mut rng = StdRng::seed_from_u64(11);

        for (x, y) in [(0, 0), (63, 47), (32, 24)] {
            let ray = camera.get_ray(x, y, 1, 0, &mut rng);
            assert!((ray.direction.length() - 1.0).abs() < 1e-12);
            // Pushed forward along the view, roughly near_offset away
            let offset = ray.origin - Vec3::from_array(desc.origin);
            assert!(offset.length() > desc.near_offset);
            assert!(offset.dot(camera.direction) > 0.0);
        }
    }

    #[test]
    fn test_corner_rays_diverge() {
        let camera = Camera::new(&CameraDesc::default(), 64, 48);
        let mut rng = StdRng::seed_from_u64(12);

        let left = camera.get_ray(0, 24, 0, 0, &mut rng);
        let right = camera.get_ray(63, 24, 1, 0, &mut rng);
        assert!(left.direction.x < 0.0);
        assert!(right.direction.x > 0.0);

        let bottom = camera.get_ray(32, 0, 0, 0, &mut rng);
        let top = camera.get_ray(32, 47, 0, 1, &mut rng);
        assert!(top.direction.y > bottom.direction.y);
    }
}
