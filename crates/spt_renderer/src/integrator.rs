//! Recursive Monte Carlo radiance estimator.
//!
//! Each call follows one path segment: find the nearest hit, sample the
//! material there, then recurse along a reflected, refracted or diffusely
//! scattered ray. Paths longer than [`RR_DEPTH`] are cut short by Russian
//! roulette, and never run past [`MAX_DEPTH`].

use std::f64::consts::PI;

use rand::RngCore;

use crate::{gen_f64, Color, Ray, ReflectionKind, Scene, Shape, Vec3, VecExt};

/// Depth after which Russian roulette may terminate a path.
pub const RR_DEPTH: u32 = 5;

/// Depth at which every path terminates.
pub const MAX_DEPTH: u32 = 50;

/// Dielectric branches deeper than this pick one branch at random instead
/// of blending both.
const SPLIT_DEPTH: u32 = 2;

const AIR_IOR: f64 = 1.0;
const GLASS_IOR: f64 = 1.5;

/// Estimate the radiance arriving along `ray`.
///
/// `depth` is the number of bounces already taken; camera rays start at 0.
pub fn radiance(scene: &Scene, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
    let Some(hit) = scene.intersect(ray) else {
        return Color::ZERO;
    };

    let x = ray.at(hit.t);
    let (n, col) = hit.shape.position(x, ray);
    // Shading normal faces against the incoming ray
    let nl = if n.dot(ray.direction) < 0.0 { n } else { -n };

    let mut f = col.color;
    let p = f.max_component();
    let depth = depth + 1;

    if depth > RR_DEPTH {
        if depth < MAX_DEPTH && gen_f64(rng) < p {
            f /= p;
        } else {
            return col.emission;
        }
    }

    let incoming = match col.reflection {
        ReflectionKind::Diffuse => {
            let d = diffuse_direction(nl, rng);
            radiance(scene, &Ray::new(x, d), depth, rng)
        }
        ReflectionKind::Specular => {
            let reflected = Ray::new(x, reflect(ray.direction, n));
            radiance(scene, &reflected, depth, rng)
        }
        ReflectionKind::Dielectric => dielectric(scene, ray, x, n, nl, depth, rng),
    };

    col.emission + f * incoming
}

/// Cosine-weighted direction on the hemisphere around `w`.
fn diffuse_direction(w: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = 2.0 * PI * gen_f64(rng);
    let r2 = gen_f64(rng);
    let r2s = r2.sqrt();

    let axis = if w.x.abs() > 0.1 { Vec3::Y } else { Vec3::X };
    let u = axis.cross(w).normalized();
    let v = w.cross(u);

    (u * r1.cos() * r2s + v * r1.sin() * r2s + w * (1.0 - r2).sqrt()).normalized()
}

/// Mirror `d` about the plane with normal `n`.
#[inline]
fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - n * 2.0 * n.dot(d)
}

/// Schlick's approximation of Fresnel reflectance.
///
/// `r0` is the reflectance at normal incidence and `c` is one minus the
/// cosine of the relevant angle.
pub fn schlick(r0: f64, c: f64) -> f64 {
    r0 + (1.0 - r0) * c.powi(5)
}

/// Glass: Fresnel-weighted mix of reflection and refraction.
fn dielectric(
    scene: &Scene,
    ray: &Ray,
    x: Vec3,
    n: Vec3,
    nl: Vec3,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let reflected = Ray::new(x, reflect(ray.direction, n));

    let into = n.dot(nl) > 0.0;
    let nnt = if into {
        AIR_IOR / GLASS_IOR
    } else {
        GLASS_IOR / AIR_IOR
    };
    let ddn = ray.direction.dot(nl);
    let cos2t = 1.0 - nnt * nnt * (1.0 - ddn * ddn);

    // Total internal reflection
    if cos2t < 0.0 {
        return radiance(scene, &reflected, depth, rng);
    }

    let sign = if into { 1.0 } else { -1.0 };
    let tdir = (ray.direction * nnt - n * (sign * (ddn * nnt + cos2t.sqrt()))).normalized();
    let refracted = Ray::new(x, tdir);

    let a = GLASS_IOR - AIR_IOR;
    let b = GLASS_IOR + AIR_IOR;
    let r0 = a * a / (b * b);
    let c = 1.0 - if into { -ddn } else { tdir.dot(n) };

    let re = schlick(r0, c);
    let tr = 1.0 - re;

    if depth > SPLIT_DEPTH {
        let probability = 0.25 + 0.5 * re;
        if gen_f64(rng) < probability {
            radiance(scene, &reflected, depth, rng) * (re / probability)
        } else {
            radiance(scene, &refracted, depth, rng) * (tr / (1.0 - probability))
        }
    } else {
        radiance(scene, &reflected, depth, rng) * re + radiance(scene, &refracted, depth, rng) * tr
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{Col, Plane, Sphere, Texture};

    fn solid(emission: Color, color: Color, reflection: ReflectionKind) -> Arc<Texture> {
        Arc::new(Texture::Solid(Col::new(emission, color, reflection)))
    }

    /// Closed diffuse shell around the origin with a light in its ceiling.
    fn diffuse_room() -> Scene {
        let wall = solid(Color::ZERO, Color::splat(0.75), ReflectionKind::Diffuse);
        let light = solid(Color::splat(4.0), Color::ZERO, ReflectionKind::Diffuse);
        Scene::new(vec![
            Sphere::new(Vec3::new(0.0, 0.0, 0.0), 10.0, wall).into(),
            Sphere::new(Vec3::new(0.0, 12.0, 0.0), 4.0, light).into(),
        ])
    }

    #[test]
    fn test_miss_is_black() {
        let scene = Scene::default();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert_eq!(radiance(&scene, &ray, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_miss_is_black_with_surfaces_elsewhere() {
        let scene = Scene::new(vec![Sphere::new(
            Vec3::new(0.0, 0.0, -10.0),
            1.0,
            solid(Color::ONE, Color::ONE, ReflectionKind::Diffuse),
        )
        .into()]);
        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        assert_eq!(radiance(&scene, &ray, 0, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_emissive_non_reflective_surface() {
        let emission = Color::new(0.2, 0.4, 0.8);
        let scene = Scene::new(vec![Sphere::new(
            Vec3::new(0.0, 0.0, -10.0),
            2.0,
            solid(emission, Color::ZERO, ReflectionKind::Diffuse),
        )
        .into()]);
        let mut rng = StdRng::seed_from_u64(3);

        // Black reflectance: the bounce adds nothing on top of the emission
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(radiance(&scene, &ray, 0, &mut rng), emission);
    }

    #[test]
    fn test_path_depth_capped() {
        // A perfect mirror that emits: every bounce adds one unit of light
        // and roulette always survives, so only the depth cap ends the path.
        let scene = Scene::new(vec![Sphere::new(
            Vec3::ZERO,
            5.0,
            solid(Color::ONE, Color::ONE, ReflectionKind::Specular),
        )
        .into()]);
        let mut rng = StdRng::seed_from_u64(4);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let result = radiance(&scene, &ray, 0, &mut rng);
        assert_eq!(result, Color::splat(MAX_DEPTH as f64));
    }

    #[test]
    fn test_specular_reflects_light_source() {
        // Mirror plane facing +Z, light behind the camera
        let mirror = solid(Color::ZERO, Color::splat(0.5), ReflectionKind::Specular);
        let light = solid(Color::splat(2.0), Color::ZERO, ReflectionKind::Diffuse);
        let scene = Scene::new(vec![
            Plane::new(Vec3::new(-5.0, -5.0, -5.0), 10.0, 10.0, mirror).into(),
            Sphere::new(Vec3::new(0.0, 0.0, 20.0), 3.0, light).into(),
        ]);
        let mut rng = StdRng::seed_from_u64(5);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let result = radiance(&scene, &ray, 0, &mut rng);
        assert!((result - Color::splat(1.0)).length() < 1e-12);
    }

    #[test]
    fn test_schlick_limits() {
        let r0 = 0.04;
        assert_eq!(schlick(r0, 0.0), r0);
        assert_eq!(schlick(r0, 1.0), 1.0);

        let mut last = schlick(r0, 0.0);
        for i in 1..=10 {
            let re = schlick(r0, i as f64 / 10.0);
            assert!(re >= last);
            last = re;
        }
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalized();
        let r = reflect(d, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalized()).length() < 1e-12);
    }

    #[test]
    fn test_diffuse_direction_in_hemisphere() {
        let mut rng = StdRng::seed_from_u64(6);

        for normal in [Vec3::X, Vec3::Y, Vec3::NEG_Z, Vec3::new(0.3, -0.9, 0.2).normalized()] {
            for _ in 0..200 {
                let d = diffuse_direction(normal, &mut rng);
                assert!((d.length() - 1.0).abs() < 1e-9);
                assert!(d.dot(normal) >= -1e-12);
            }
        }
    }

    #[test]
    fn test_glass_sphere_is_finite() {
        let glass = solid(Color::ZERO, Color::splat(0.999), ReflectionKind::Dielectric);
        let light = solid(Color::splat(12.0), Color::ZERO, ReflectionKind::Diffuse);
        let scene = Scene::new(vec![
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 3.0, glass).into(),
            Sphere::new(Vec3::new(0.0, 0.0, -40.0), 10.0, light).into(),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let c = radiance(&scene, &Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng);
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_glass_head_on_is_mostly_transmissive() {
        // Looking through glass straight at a light: Fresnel sends most
        // energy through, and the shallow blend makes this deterministic.
        let glass = solid(Color::ZERO, Color::ONE, ReflectionKind::Dielectric);
        let light = solid(Color::ONE, Color::ZERO, ReflectionKind::Diffuse);
        let scene = Scene::new(vec![
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 3.0, glass).into(),
            Sphere::new(Vec3::new(0.0, 0.0, -40.0), 10.0, light).into(),
        ]);
        let mut rng = StdRng::seed_from_u64(8);

        let c = radiance(&scene, &Ray::new(Vec3::ZERO, Vec3::NEG_Z), 0, &mut rng);
        // Two interfaces at 4% reflectance each
        assert!(c.x > 0.9 && c.x <= 1.0, "got {c:?}");
    }

    #[test]
    fn test_diffuse_room_estimates_are_bounded() {
        let scene = diffuse_room();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            let c = radiance(&scene, &Ray::new(Vec3::ZERO, Vec3::Z), 0, &mut rng);
            assert!(c.is_finite());
            assert!(c.min_element() >= 0.0);
        }
    }
}
