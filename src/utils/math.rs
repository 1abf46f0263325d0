//! Additional vector helpers layered on top of `glam`.

use glam::Vec3;

/// Removes the component of `v` along the unit `normal`.
pub fn projection_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - v.dot(normal) * normal
}

/// Signed length of `v` projected onto the direction of `onto`.
///
/// Returns zero when `onto` has no length.
pub fn projection_on_vector(v: Vec3, onto: Vec3) -> f32 {
    let length = onto.length();
    if length <= f32::MIN_POSITIVE {
        return 0.0;
    }
    v.dot(onto) / length
}

/// Cosine of the angle between two vectors, clamped to `[-1, 1]`.
pub fn cos_angle(from: Vec3, to: Vec3) -> f32 {
    let denom = (from.length_squared() * to.length_squared()).sqrt();
    if denom < 1e-15 {
        return 0.0;
    }
    (from.dot(to) / denom).clamp(-1.0, 1.0)
}

/// Angle between two vectors in degrees.
pub fn angle_degrees(from: Vec3, to: Vec3) -> f32 {
    cos_angle(from, to).acos().to_degrees()
}

/// Unit normal of the plane spanned by two edge vectors, or zero if they are parallel.
pub fn normal(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b).normalize_or_zero()
}
