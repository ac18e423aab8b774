//! Leading shots at a moving target.

use crate::ballistics::{LaunchSolution, solve_min_velocity};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Playable region of the boss room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub left: f32,
    pub right: f32,
    /// Lowest y anything can stand on.
    pub floor: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            left: -12.0,
            right: 12.0,
            floor: 0.0,
        }
    }
}

impl ArenaBounds {
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(point.x.clamp(self.left, self.right), point.y.max(self.floor))
    }

    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(self.left, self.right)
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }
}

/// What the thrower knows about its target this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetMotion {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Gliding targets hold their vertical speed, so gravity is left out.
    pub gliding: bool,
    /// Height of `position` above the target's feet.
    pub rest_height: f32,
}

impl TargetMotion {
    pub fn acceleration(&self, gravity: f32) -> Vec2 {
        if self.gliding {
            Vec2::ZERO
        } else {
            Vec2::new(0.0, -gravity)
        }
    }
}

/// Where the target will be after `t` seconds, kept inside the arena.
///
/// A falling target lands with its feet on the floor, so the tracked point never
/// drops below `floor + rest_height`.
pub fn predict_position(motion: &TargetMotion, gravity: f32, t: f32, bounds: &ArenaBounds) -> Vec2 {
    let t = t.max(0.0);
    let accel = motion.acceleration(gravity);
    let raw = motion.position + motion.velocity * t + 0.5 * accel * t * t;
    let at = bounds.clamp(raw);
    Vec2::new(at.x, at.y.max(bounds.floor + motion.rest_height))
}

/// Turns a uniform variate into the share of the prediction to use.
///
/// The square root skews towards 1, so most throws lead the target well while a
/// few land close to where it currently stands.
pub fn skewed_fraction(uniform: f32) -> f32 {
    uniform.clamp(0.0, 1.0).sqrt()
}

pub fn blend_aim(current: Vec2, predicted: Vec2, fraction: f32) -> Vec2 {
    current.lerp(predicted, fraction.clamp(0.0, 1.0))
}

/// Launch solution from `origin` towards a partially led target.
///
/// The flight time of a throw at the target's current position decides how far
/// ahead to predict; the aim point is then blended between now and the prediction.
pub fn aim_throw(
    origin: Vec2,
    motion: &TargetMotion,
    gravity: f32,
    bounds: &ArenaBounds,
    fraction: f32,
) -> LaunchSolution {
    let direct = solve_min_velocity(motion.position - origin, gravity);
    let predicted = predict_position(motion, gravity, direct.flight_time, bounds);
    let aim = blend_aim(motion.position, predicted, fraction);
    solve_min_velocity(aim - origin, gravity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballistics::position_at;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    const G: f32 = 30.0;

    fn arena() -> ArenaBounds {
        ArenaBounds {
            left: -10.0,
            right: 10.0,
            floor: 0.0,
        }
    }

    #[test]
    fn prediction_follows_kinematics() {
        let motion = TargetMotion {
            position: Vec2::new(0.0, 5.0),
            velocity: Vec2::new(2.0, 4.0),
            gliding: false,
            rest_height: 0.0,
        };
        let p = predict_position(&motion, G, 0.5, &arena());
        // 5 + 4*0.5 - 15*0.25 = 3.25
        assert!((p - Vec2::new(1.0, 3.25)).length() < 1e-5, "{p:?}");
    }

    #[test]
    fn gliding_targets_ignore_gravity() {
        let motion = TargetMotion {
            position: Vec2::new(0.0, 5.0),
            velocity: Vec2::new(3.0, -1.0),
            gliding: true,
            rest_height: 0.0,
        };
        let p = predict_position(&motion, G, 1.0, &arena());
        assert_eq!(p, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn prediction_is_clamped_to_arena() {
        let motion = TargetMotion {
            position: Vec2::new(8.0, 1.0),
            velocity: Vec2::new(10.0, 0.0),
            gliding: false,
            rest_height: 0.0,
        };
        let p = predict_position(&motion, G, 2.0, &arena());
        assert_eq!(p, Vec2::new(10.0, 0.0));

        let leftwards = TargetMotion {
            velocity: Vec2::new(-40.0, 0.0),
            ..motion
        };
        assert_eq!(predict_position(&leftwards, G, 2.0, &arena()).x, -10.0);
    }

    #[test]
    fn standing_target_is_predicted_at_its_own_height() {
        // centre of a body whose feet touch the floor
        let motion = TargetMotion {
            position: Vec2::new(2.0, 0.9),
            velocity: Vec2::new(1.0, 0.0),
            gliding: false,
            rest_height: 0.9,
        };
        let p = predict_position(&motion, G, 1.0, &arena());
        assert_eq!(p, Vec2::new(3.0, 0.9));

        let origin = Vec2::new(-6.0, 3.0);
        let shot = aim_throw(origin, &motion, G, &arena(), 1.0);
        let landing = origin + position_at(shot.velocity, G, shot.flight_time);
        assert!((landing.y - 0.9).abs() < 1e-3, "{landing:?}");
    }

    #[test]
    fn negative_time_is_treated_as_now() {
        let motion = TargetMotion {
            position: Vec2::new(1.0, 2.0),
            velocity: Vec2::new(5.0, 5.0),
            gliding: false,
            rest_height: 0.0,
        };
        assert_eq!(predict_position(&motion, G, -3.0, &arena()), motion.position);
    }

    #[test]
    fn skewed_fraction_leans_towards_full_prediction() {
        assert_eq!(skewed_fraction(0.0), 0.0);
        assert_eq!(skewed_fraction(1.0), 1.0);
        assert_eq!(skewed_fraction(0.25), 0.5);
        assert_eq!(skewed_fraction(-1.0), 0.0);
        assert_eq!(skewed_fraction(4.0), 1.0);

        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let mean = (0..n)
            .map(|_| skewed_fraction(rng.random::<f32>()))
            .sum::<f32>()
            / n as f32;
        // E[sqrt(U)] = 2/3, well above the uniform 1/2.
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean {mean}");
    }

    #[test]
    fn blend_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(4.0, 2.0);
        assert_eq!(blend_aim(a, b, 0.0), a);
        assert_eq!(blend_aim(a, b, 1.0), b);
        assert_eq!(blend_aim(a, b, 0.5), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn full_lead_hits_a_linearly_moving_target() {
        let origin = Vec2::new(-6.0, 3.0);
        let motion = TargetMotion {
            position: Vec2::new(4.0, 0.0),
            velocity: Vec2::new(-2.0, 0.0),
            gliding: true,
            rest_height: 0.0,
        };
        let shot = aim_throw(origin, &motion, G, &arena(), 1.0);
        let direct = solve_min_velocity(motion.position - origin, G);
        let expected_aim = motion.position + motion.velocity * direct.flight_time;
        let landing = origin + position_at(shot.velocity, G, shot.flight_time);
        assert!((landing - expected_aim).length() < 1e-3, "{landing:?} vs {expected_aim:?}");
    }

    #[test]
    fn zero_lead_aims_at_current_position() {
        let origin = Vec2::new(0.0, 4.0);
        let motion = TargetMotion {
            position: Vec2::new(6.0, 0.0),
            velocity: Vec2::new(5.0, 0.0),
            gliding: false,
            rest_height: 0.0,
        };
        let shot = aim_throw(origin, &motion, G, &arena(), 0.0);
        assert_eq!(shot, solve_min_velocity(motion.position - origin, G));
    }
}
