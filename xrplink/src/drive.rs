// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use aprox_eq::AproxEq;

/// Represents a single frame of the differential drive's state, one speed in
/// [-1, 1] per side.
#[derive(AproxEq, Clone, Copy, Debug, Default, PartialEq)]
pub struct WheelSpeeds {
    pub left: f64,
    pub right: f64,
}

/// Mixes a forward speed and a rotation speed into wheel speeds, both inputs
/// clamped to [-1, 1]. Positive rotation turns clockwise, so the left wheel
/// runs faster. When the mix saturates both sides are scaled down together
/// so the faster wheel sits at full speed and the turn radius is preserved.
#[must_use]
pub fn arcade(forward: f64, rotation: f64) -> WheelSpeeds {
    let forward = forward.clamp(-1f64, 1f64);
    let rotation = rotation.clamp(-1f64, 1f64);

    let mut left = forward + rotation;
    let mut right = forward - rotation;
    let greater = f64::max(left.abs(), right.abs());

    if greater > 1f64 {
        left /= greater;
        right /= greater;
    }

    WheelSpeeds { left, right }
}

/// Passes per-side speeds straight through, clamped to [-1, 1].
#[must_use]
pub fn tank(left: f64, right: f64) -> WheelSpeeds {
    WheelSpeeds {
        left: left.clamp(-1f64, 1f64),
        right: right.clamp(-1f64, 1f64),
    }
}

#[cfg(test)]
mod tests {
    use super::{arcade, tank};
    use aprox_eq::assert_aprox_eq;

    #[test]
    fn straight_and_spin() {
        let straight = arcade(0.6f64, 0f64);

        assert_aprox_eq!(straight.left, 0.6f64);
        assert_aprox_eq!(straight.right, 0.6f64);

        let spin = arcade(0f64, 1f64);

        assert_aprox_eq!(spin.left, 1f64);
        assert_aprox_eq!(spin.right, -1f64);
    }

    #[test]
    fn saturation_preserves_ratio() {
        let speeds = arcade(1f64, 0.5f64);

        assert_aprox_eq!(speeds.left, 1f64);
        assert_aprox_eq!(speeds.right, 1f64 / 3f64);
    }

    #[test]
    fn never_exceeds_one() {
        let mut forward = -1.5f64;

        while forward <= 1.5f64 {
            let mut rotation = -1.5f64;

            while rotation <= 1.5f64 {
                let speeds = arcade(forward, rotation);

                assert!(speeds.left <= 1f64);
                assert!(speeds.left >= -1f64);
                assert!(speeds.right <= 1f64);
                assert!(speeds.right >= -1f64);

                rotation += 0.05f64;
            }

            forward += 0.05f64;
        }
    }

    /// `clamp` keeps `NaN`, so a `NaN` input comes out as `NaN` wheel speeds
    /// for the motor layer to reject.
    #[test]
    fn nan_inputs_yield_nan_speeds() {
        let speeds = arcade(f64::NAN, 0f64);

        assert!(speeds.left.is_nan());
        assert!(speeds.right.is_nan());
    }

    #[test]
    fn tank_clamps() {
        let speeds = tank(2f64, -2f64);

        assert_aprox_eq!(speeds.left, 1f64);
        assert_aprox_eq!(speeds.right, -1f64);
    }
}
