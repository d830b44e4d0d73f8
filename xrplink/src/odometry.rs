// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::angle::Angle;
use aprox_eq::AproxEq;
use serde::{Deserialize, Serialize};

/// A planar pose: position and heading. Units of `x` and `y` are whatever
/// unit the wheel distances are in, inches on the XRP.
#[derive(AproxEq, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: Angle,
}

impl Pose {
    /// Creates a new pose at the given position and heading.
    #[must_use]
    pub fn new(x: f64, y: f64, heading: Angle) -> Self {
        Self { x, y, heading }
    }
}

/// Dead-reckoning odometry for a differential drive. Each update advances
/// the pose by the average of the two wheel distance deltas, projected along
/// the gyro heading. A heading offset is kept so that resetting to a pose
/// makes that pose exact no matter what the raw gyro reads.
#[derive(Debug)]
pub struct DiffDriveOdometry {
    pose: Pose,
    gyro_offset: Angle,
    prev_left: f64,
    prev_right: f64,
}

impl DiffDriveOdometry {
    /// Creates odometry at the origin given the current gyro angle and wheel
    /// distances, which need not be zero.
    #[must_use]
    pub fn new(gyro_angle: Angle, left_distance: f64, right_distance: f64) -> Self {
        let pose = Pose::default();

        Self {
            gyro_offset: pose.heading - gyro_angle,
            pose,
            prev_left: left_distance,
            prev_right: right_distance,
        }
    }

    /// Advances the pose given the current gyro angle and total wheel
    /// distances, and returns the new pose. Meant to be called once per
    /// periodic tick; the integration assumes the robot moved straight along
    /// its heading between calls, which holds well at 50 Hz.
    pub fn update(&mut self, gyro_angle: Angle, left_distance: f64, right_distance: f64) -> Pose {
        let heading = gyro_angle + self.gyro_offset;
        let delta =
            ((left_distance - self.prev_left) + (right_distance - self.prev_right)) / 2f64;

        self.prev_left = left_distance;
        self.prev_right = right_distance;

        self.pose = Pose {
            x: self.pose.x + delta * heading.cos(),
            y: self.pose.y + delta * heading.sin(),
            heading,
        };

        self.pose
    }

    /// Re-seeds the odometry at the given pose. The current gyro angle and
    /// wheel distances become the new references, so the next `update()`
    /// integrates from `pose` exactly.
    pub fn reset_position(
        &mut self,
        pose: Pose,
        gyro_angle: Angle,
        left_distance: f64,
        right_distance: f64,
    ) {
        self.gyro_offset = pose.heading - gyro_angle;
        self.prev_left = left_distance;
        self.prev_right = right_distance;
        self.pose = pose;
    }

    /// The most recently integrated pose.
    #[inline]
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::{DiffDriveOdometry, Pose};
    use crate::angle::Angle;
    use aprox_eq::assert_aprox_eq;

    #[test]
    fn straight_line() {
        let mut odometry = DiffDriveOdometry::new(Angle::default(), 0f64, 0f64);
        let pose = odometry.update(Angle::default(), 10f64, 10f64);

        assert_aprox_eq!(pose.x, 10f64);
        assert_aprox_eq!(pose.y, 0f64);
        assert_aprox_eq!(pose.heading, Angle::default());
    }

    #[test]
    fn heading_projects_motion() {
        let mut odometry = DiffDriveOdometry::new(Angle::default(), 0f64, 0f64);
        let pose = odometry.update(Angle::from_degrees(90f64), 5f64, 5f64);

        assert!(pose.x.abs() < 1e-10);
        assert_aprox_eq!(pose.y, 5f64);
    }

    #[test]
    fn spin_in_place_stays_put() {
        let mut odometry = DiffDriveOdometry::new(Angle::default(), 0f64, 0f64);
        let pose = odometry.update(Angle::from_degrees(180f64), -3f64, 3f64);

        assert_aprox_eq!(pose.x, 0f64);
        assert_aprox_eq!(pose.y, 0f64);
        assert_aprox_eq!(pose.heading, Angle::from_degrees(180f64));
    }

    #[test]
    fn reset_makes_pose_exact() {
        let mut odometry = DiffDriveOdometry::new(Angle::from_degrees(33f64), 7f64, 9f64);
        let target = Pose::new(1f64, 2f64, Angle::from_degrees(45f64));

        odometry.reset_position(target, Angle::from_degrees(60f64), 7f64, 9f64);
        assert_aprox_eq!(odometry.pose(), target);

        // No wheel motion, pose stays; heading tracks the offset gyro.
        let pose = odometry.update(Angle::from_degrees(60f64), 7f64, 9f64);

        assert_aprox_eq!(pose.x, 1f64);
        assert_aprox_eq!(pose.y, 2f64);
        assert_aprox_eq!(pose.heading, Angle::from_degrees(45f64));
    }

    #[test]
    fn nonzero_initial_distances() {
        let mut odometry = DiffDriveOdometry::new(Angle::default(), 100f64, 100f64);
        let pose = odometry.update(Angle::default(), 101f64, 101f64);

        assert_aprox_eq!(pose.x, 1f64);
    }
}
