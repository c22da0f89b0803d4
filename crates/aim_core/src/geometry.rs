//! Aim geometry
//!
//! Stateless angular measurements between an attacker's view ray and a
//! target's body.
//!
//! ## Conventions
//! - Yaw is measured clockwise from +Y, pitch is elevation; both in degrees.
//! - Z is vertical. Positions are feet positions: the attacker's eye sits
//!   `EYE_HEIGHT` above them and the target's body centre `BODY_CENTER_HEIGHT`.
//!
//! ## Angular distance
//! ```text
//! ray = direction(origin.yaw, origin.pitch)
//! d   = (target + BODY_CENTER_HEIGHT) - (origin + EYE_HEIGHT)
//! ang = asin(|ray x d| / |d|)
//! ```
//! `ray` is a unit vector, so `|ray x d| / |d|` is the sine of the angle
//! between the aim and the sight line.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::timeline::Position;

/// Eye height above the feet position
pub const EYE_HEIGHT: f64 = 14.0;

/// Body centre height above the feet position
pub const BODY_CENTER_HEIGHT: f64 = 7.5;

/// Physical target width used for apparent size
pub const TARGET_WIDTH: f64 = 8.2;

/// Physical target height used for apparent size
pub const TARGET_HEIGHT: f64 = 15.0;

/// Sight lines shorter than this have no defined angle
pub const MIN_DISTANCE: f64 = 1e-3;

/// Apparent angular extents of the target, in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AngularSize {
    pub width: f64,
    pub height: f64,
}

/// Unit view vector for a yaw/pitch orientation.
pub fn direction(yaw_deg: f64, pitch_deg: f64) -> Vector3<f64> {
    let yaw = yaw_deg.to_radians();
    let pitch = pitch_deg.to_radians();
    Vector3::new(
        pitch.cos() * yaw.sin(),
        pitch.cos() * yaw.cos(),
        pitch.sin(),
    )
}

/// Eye-to-body-centre vector.
fn sight_line(target: &Position, origin: &Position) -> Vector3<f64> {
    let eye = origin.coords() + Vector3::new(0.0, 0.0, EYE_HEIGHT);
    let body = target.coords() + Vector3::new(0.0, 0.0, BODY_CENTER_HEIGHT);
    body - eye
}

/// Angle in degrees between the origin's aim and the line to the target.
///
/// Undefined when the two points coincide; use `checked_angular_distance`
/// unless the distance is already known to be non-degenerate.
pub fn angular_distance(target: &Position, origin: &Position) -> f64 {
    let ray = direction(origin.yaw, origin.pitch);
    let d = sight_line(target, origin);
    let sine = (ray.cross(&d).norm() / d.norm()).min(1.0);
    sine.asin().to_degrees()
}

/// `angular_distance`, or `None` when the sight line is degenerate.
pub fn checked_angular_distance(target: &Position, origin: &Position) -> Option<f64> {
    if distance(target, origin) < MIN_DISTANCE {
        return None;
    }
    Some(angular_distance(target, origin))
}

/// Length of the eye-to-body-centre sight line.
pub fn distance(target: &Position, origin: &Position) -> f64 {
    sight_line(target, origin).norm()
}

/// Small-angle estimate of the target's apparent size.
pub fn angular_size(target: &Position, origin: &Position) -> Option<AngularSize> {
    let dist = distance(target, origin);
    if dist < MIN_DISTANCE {
        return None;
    }
    Some(AngularSize {
        width: (TARGET_WIDTH / dist).to_degrees(),
        height: (TARGET_HEIGHT / dist).to_degrees(),
    })
}

/// How far the view direction turned between two orientations, in degrees.
pub fn look_angle_delta(pos: &Position, prev: &Position) -> f64 {
    let v1 = direction(pos.yaw, pos.pitch);
    let v2 = direction(prev.yaw, prev.pitch);
    v1.dot(&v2).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn at(x: f64, y: f64, z: f64, yaw: f64, pitch: f64) -> Position {
        Position::new(x, y, z, yaw, pitch)
    }

    #[test]
    fn test_direction_axes() {
        let north = direction(0.0, 0.0);
        assert!((north - Vector3::new(0.0, 1.0, 0.0)).norm() < EPS);

        // Clockwise from +Y: 90 degrees points along +X
        let east = direction(90.0, 0.0);
        assert!((east - Vector3::new(1.0, 0.0, 0.0)).norm() < EPS);

        let up = direction(0.0, 90.0);
        assert!((up - Vector3::new(0.0, 0.0, 1.0)).norm() < EPS);

        assert!((direction(37.0, -21.0).norm() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_angular_distance_on_target_is_zero() {
        // Body centre (6.5 + 7.5) level with the eye (0 + 14)
        let origin = at(0.0, 0.0, 0.0, 0.0, 0.0);
        let target = at(0.0, 50.0, 6.5, 0.0, 0.0);
        assert!(angular_distance(&target, &origin).abs() < 1e-6);
    }

    #[test]
    fn test_angular_distance_matches_yaw_offset() {
        let target = at(0.0, 100.0, 6.5, 0.0, 0.0);
        for yaw in [5.0, 12.0, 29.9, 35.0, 60.0] {
            let origin = at(0.0, 0.0, 0.0, yaw, 0.0);
            let ang = angular_distance(&target, &origin);
            assert!((ang - yaw).abs() < 1e-6, "yaw {} gave {}", yaw, ang);
        }
    }

    #[test]
    fn test_angular_distance_caps_at_ninety() {
        // Aim perpendicular to the sight line
        let origin = at(0.0, 0.0, 0.0, 90.0, 0.0);
        let target = at(0.0, 100.0, 6.5, 0.0, 0.0);
        assert!((angular_distance(&target, &origin) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_eye_offset_asymmetry() {
        let a = at(0.0, 0.0, 0.0, 0.0, 0.0);
        let b = at(0.0, 40.0, 0.0, 180.0, 0.0);
        // Same feet height: each eye looks 6.5 units down at the other body
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < EPS);
        assert!(angular_distance(&b, &a) > 0.0);
    }

    #[test]
    fn test_degenerate_distance_is_rejected() {
        // Target body centre exactly at the attacker's eye
        let origin = at(10.0, 10.0, 0.0, 0.0, 0.0);
        let target = at(10.0, 10.0, 6.5, 0.0, 0.0);
        assert!(distance(&target, &origin) < MIN_DISTANCE);
        assert!(checked_angular_distance(&target, &origin).is_none());
        assert!(angular_size(&target, &origin).is_none());
    }

    #[test]
    fn test_angular_size_shrinks_with_distance() {
        let origin = at(0.0, 0.0, 0.0, 0.0, 0.0);
        let near = angular_size(&at(0.0, 50.0, 6.5, 0.0, 0.0), &origin).unwrap();
        let far = angular_size(&at(0.0, 200.0, 6.5, 0.0, 0.0), &origin).unwrap();

        assert!((near.width - (TARGET_WIDTH / 50.0).to_degrees()).abs() < EPS);
        assert!((far.height - (TARGET_HEIGHT / 200.0).to_degrees()).abs() < EPS);
        assert!(near.width > far.width);
        assert!(near.height > near.width);
    }

    #[test]
    fn test_look_angle_delta() {
        let prev = at(0.0, 0.0, 0.0, 10.0, 0.0);
        let now = at(5.0, 5.0, 0.0, 25.0, 0.0);
        assert!((look_angle_delta(&now, &prev) - 15.0).abs() < 1e-6);
        assert!(look_angle_delta(&now, &now).abs() < 1e-5);

        let up = at(0.0, 0.0, 0.0, 0.0, 30.0);
        let level = at(0.0, 0.0, 0.0, 0.0, 0.0);
        assert!((look_angle_delta(&up, &level) - 30.0).abs() < 1e-6);
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: angular distance stays within [0, 90] degrees
            #[test]
            fn prop_angular_distance_in_range(
                ox in -500.0f64..500.0, oy in -500.0f64..500.0, oz in -50.0f64..50.0,
                tx in -500.0f64..500.0, ty in -500.0f64..500.0, tz in -50.0f64..50.0,
                yaw in -360.0f64..360.0, pitch in -90.0f64..90.0
            ) {
                let origin = Position::new(ox, oy, oz, yaw, pitch);
                let target = Position::new(tx, ty, tz, 0.0, 0.0);
                if let Some(ang) = checked_angular_distance(&target, &origin) {
                    prop_assert!((0.0..=90.0).contains(&ang));
                }
            }

            /// Property: look angle delta is symmetric and within [0, 180]
            #[test]
            fn prop_look_angle_delta_symmetric(
                y1 in -360.0f64..360.0, p1 in -90.0f64..90.0,
                y2 in -360.0f64..360.0, p2 in -90.0f64..90.0
            ) {
                let a = Position::new(0.0, 0.0, 0.0, y1, p1);
                let b = Position::new(0.0, 0.0, 0.0, y2, p2);
                let ab = look_angle_delta(&a, &b);
                prop_assert!((ab - look_angle_delta(&b, &a)).abs() < 1e-9);
                prop_assert!((0.0..=180.0).contains(&ab));
            }
        }
    }
}
