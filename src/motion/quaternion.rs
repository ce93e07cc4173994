//! Minimal quaternion type for pose extrapolation (§4.F step 2), a
//! straightforward reimplementation of the original plugin's header-only
//! quaternion library (§9 "Quaternion math"). Angles in radians throughout;
//! callers convert to/from degrees at the boundary.

use crate::motion::vector3::Vector3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Builds a quaternion from pitch/heading(yaw)/bank(roll) Euler angles,
    /// radians, using the ZYX (yaw-pitch-roll) intrinsic convention.
    pub fn from_euler(pitch: f64, heading: f64, bank: f64) -> Quaternion {
        let (sy, cy) = (heading / 2.0).sin_cos();
        let (sp, cp) = (pitch / 2.0).sin_cos();
        let (sr, cr) = (bank / 2.0).sin_cos();

        Quaternion {
            w: cy * cp * cr + sy * sp * sr,
            x: cy * cp * sr - sy * sp * cr,
            y: sy * cp * sr + cy * sp * cr,
            z: sy * cp * cr - cy * sp * sr,
        }
    }

    /// Inverse Euler extraction. Returns `(pitch, heading, bank)` radians.
    /// Guards the pitch asin at the poles to avoid NaN from floating-point
    /// overshoot past ±1 (the gimbal singularity, §9).
    pub fn to_euler(self) -> Vector3 {
        let sinr_cosp = 2.0 * (self.w * self.x + self.y * self.z);
        let cosr_cosp = 1.0 - 2.0 * (self.x * self.x + self.y * self.y);
        let bank = sinr_cosp.atan2(cosr_cosp);

        let sinp = 2.0 * (self.w * self.y - self.z * self.x);
        let pitch = if sinp.abs() >= 1.0 {
            std::f64::consts::FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let siny_cosp = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy_cosp = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        let heading = siny_cosp.atan2(cosy_cosp);

        Vector3::new(pitch, heading, bank)
    }

    pub fn conjugate(self) -> Quaternion {
        Quaternion {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }

    pub fn norm_squared(self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn inverse(self) -> Quaternion {
        let n2 = self.norm_squared();
        let conj = self.conjugate();
        Quaternion {
            w: conj.w / n2,
            x: conj.x / n2,
            y: conj.y / n2,
            z: conj.z / n2,
        }
    }

    pub fn normalize(self) -> Quaternion {
        let n = self.norm_squared().sqrt();
        if n == 0.0 {
            return Quaternion::IDENTITY;
        }
        Quaternion {
            w: self.w / n,
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
        }
    }

    /// Hamilton product, composing `self` then `rhs` (applies `rhs` in
    /// `self`'s frame, matching the original's `current_orientation * slerp`).
    pub fn compose(self, rhs: Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }

    /// Spherical linear interpolation from `self` to `to` at `t` in [0, 1].
    /// Falls back to normalized linear interpolation when the quaternions
    /// are nearly parallel, to avoid division by a near-zero sine.
    pub fn slerp(self, to: Quaternion, t: f64) -> Quaternion {
        let mut to = to;
        let mut dot = self.dot(to);

        if dot < 0.0 {
            to = Quaternion {
                w: -to.w,
                x: -to.x,
                y: -to.y,
                z: -to.z,
            };
            dot = -dot;
        }

        if dot > 0.9995 {
            return Quaternion {
                w: self.w + (to.w - self.w) * t,
                x: self.x + (to.x - self.x) * t,
                y: self.y + (to.y - self.y) * t,
                z: self.z + (to.z - self.z) * t,
            }
            .normalize();
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let (sin_theta, sin_theta_0) = (theta.sin(), theta_0.sin());

        let s0 = (theta_0 - theta).sin() / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        Quaternion {
            w: self.w * s0 + to.w * s1,
            x: self.x * s0 + to.x * s1,
            y: self.y * s0 + to.y * s1,
            z: self.z * s0 + to.z * s1,
        }
    }

    fn dot(self, rhs: Quaternion) -> f64 {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn euler_round_trips_away_from_poles() {
        let pitch = 0.2_f64;
        let heading = 1.1_f64;
        let bank = -0.4_f64;

        let q = Quaternion::from_euler(pitch, heading, bank);
        let back = q.to_euler();

        assert_abs_diff_eq!(back.x, pitch, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, heading, epsilon = 1e-9);
        assert_abs_diff_eq!(back.z, bank, epsilon = 1e-9);
    }

    #[test]
    fn slerp_at_zero_and_one_returns_endpoints() {
        let a = Quaternion::from_euler(0.0, 0.0, 0.0);
        let b = Quaternion::from_euler(0.3, 0.5, 0.1);

        let at_zero = a.slerp(b, 0.0);
        let at_one = a.slerp(b, 1.0);

        assert_abs_diff_eq!(at_zero.w, a.w, epsilon = 1e-9);
        assert_abs_diff_eq!(at_one.w, b.w, epsilon = 1e-9);
    }

    #[test]
    fn identity_compose_is_noop() {
        let q = Quaternion::from_euler(0.1, 0.2, 0.3);
        let composed = q.compose(Quaternion::IDENTITY);
        assert_abs_diff_eq!(composed.w, q.w, epsilon = 1e-12);
        assert_abs_diff_eq!(composed.x, q.x, epsilon = 1e-12);
    }

    #[test]
    fn pitch_near_pole_does_not_produce_nan() {
        let q = Quaternion::from_euler(std::f64::consts::FRAC_PI_2, 0.3, 0.0);
        let euler = q.to_euler();
        assert!(euler.x.is_finite());
        assert!(euler.y.is_finite());
        assert!(euler.z.is_finite());
    }
}
