//! Minimum-velocity launch solver for thrown rocks.
//!
//! A projectile launched with velocity `v` under downward gravity `g` follows
//! `x(t) = vx·t`, `y(t) = vy·t − ½g·t²`. For a fixed displacement `(dx, dy)` the
//! squared launch speed as a function of `s = T²` is
//!
//! ```text
//! |v|²(s) = r²/s + g·dy + g²·s/4        with r = |(dx, dy)|
//! ```
//!
//! which is minimised at `s = 2r/g`, giving `|v|² = g(r + dy)`. Solving through the
//! flight time keeps every term finite for vertical shots, where the angle-based form
//! divides by `cos θ`.

use glam::Vec2;

/// Displacements shorter than this are treated as "already there".
pub const MIN_DISPLACEMENT: f32 = 1e-5;

/// Launch velocity plus the time the projectile needs to reach the aimed point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LaunchSolution {
    pub velocity: Vec2,
    pub flight_time: f32,
}

impl LaunchSolution {
    pub const ZERO: Self = Self {
        velocity: Vec2::ZERO,
        flight_time: 0.0,
    };

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Smallest launch velocity that makes a projectile pass through `displacement`.
///
/// Returns [`LaunchSolution::ZERO`] for a degenerate displacement or a gravity that is
/// not strictly positive.
pub fn solve_min_velocity(displacement: Vec2, gravity: f32) -> LaunchSolution {
    if !gravity.is_finite() || gravity <= 0.0 || !displacement.is_finite() {
        return LaunchSolution::ZERO;
    }

    let r = displacement.length();
    if r < MIN_DISPLACEMENT {
        return LaunchSolution::ZERO;
    }

    let flight_time = (2.0 * r / gravity).sqrt();
    let velocity = Vec2::new(
        displacement.x / flight_time,
        displacement.y / flight_time + 0.5 * gravity * flight_time,
    );

    LaunchSolution {
        velocity,
        flight_time,
    }
}

/// Position relative to the launch point after `t` seconds.
pub fn position_at(velocity: Vec2, gravity: f32, t: f32) -> Vec2 {
    Vec2::new(velocity.x * t, velocity.y * t - 0.5 * gravity * t * t)
}
