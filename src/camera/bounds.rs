//! Rectangular room limits for the camera.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Axis-aligned room footprint on the ground plane plus its ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    /// Smallest allowed X.
    pub x_min: f32,
    /// Largest allowed X.
    pub x_max: f32,
    /// Smallest allowed Z.
    pub z_min: f32,
    /// Largest allowed Z.
    pub z_max: f32,
    /// Top of the room.
    pub max_height: f32,
}

impl RoomBounds {
    /// Bounds centred on `center` reaching `half_extents` along X and Z.
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy::prelude::*;
    /// use bookbound::camera::RoomBounds;
    /// let room = RoomBounds::from_center_extents(Vec3::new(10.0, 0.0, 0.0), Vec2::new(4.0, 2.0), 5.0);
    /// assert_eq!(room.x_min, 6.0);
    /// assert_eq!(room.z_max, 2.0);
    /// ```
    #[must_use]
    pub fn from_center_extents(center: Vec3, half_extents: Vec2, max_height: f32) -> Self {
        let half = half_extents.abs();
        Self {
            x_min: center.x - half.x,
            x_max: center.x + half.x,
            z_min: center.z - half.y,
            z_max: center.z + half.y,
            max_height,
        }
    }

    /// Clamps `x` into the room.
    #[must_use]
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(self.x_min.min(self.x_max), self.x_max.max(self.x_min))
    }

    /// Clamps `z` into the room.
    #[must_use]
    pub fn clamp_z(&self, z: f32) -> f32 {
        z.clamp(self.z_min.min(self.z_max), self.z_max.max(self.z_min))
    }

    /// Clamps the ground-plane part of `position`, leaving its height.
    #[must_use]
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(self.clamp_x(position.x), position.y, self.clamp_z(position.z))
    }

    /// Whether the ground-plane part of `position` lies inside the room.
    #[must_use]
    pub fn contains(&self, position: Vec3) -> bool {
        (self.x_min..=self.x_max).contains(&position.x)
            && (self.z_min..=self.z_max).contains(&position.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Vec3::new(-20.0, 3.0, 0.0), Vec3::new(-5.0, 3.0, 0.0))]
    #[case(Vec3::new(2.0, 1.0, 9.0), Vec3::new(2.0, 1.0, 4.0))]
    #[case(Vec3::new(1.0, 0.0, -1.0), Vec3::new(1.0, 0.0, -1.0))]
    fn clamp_limits_ground_plane(#[case] input: Vec3, #[case] expected: Vec3) {
        let room = RoomBounds::from_center_extents(Vec3::ZERO, Vec2::new(5.0, 4.0), 3.0);
        assert_eq!(room.clamp(input), expected);
        assert!(room.contains(room.clamp(input)));
    }

    #[test]
    fn inverted_bounds_still_clamp() {
        let room = RoomBounds {
            x_min: 2.0,
            x_max: -2.0,
            z_min: 0.0,
            z_max: 1.0,
            max_height: 1.0,
        };
        assert_eq!(room.clamp_x(5.0), 2.0);
    }
}
