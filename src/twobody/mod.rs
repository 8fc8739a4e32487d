// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! ## Twobody interactions
//!
//! Module for describing exactly two particles interacting through a hard
//! potential: predicting when their separation crosses the next threshold of
//! a [`StepLadder`](crate::StepLadder) and resolving the crossing.

pub use crate::Vector3;
use crate::{Boundary, Kinetic};
use std::fmt::Debug;

mod bump;
mod collision;
pub use self::bump::Bump;
pub use self::collision::{Crossing, Prediction};

/// Potential energy between a pair of isotropic particles, 𝑈(𝑟)
pub trait IsotropicTwobodyEnergy: Debug {
    /// Interaction energy between a pair of isotropic particles.
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64;
}

/// Separation, 𝒓₁₂ = 𝒓₂ - 𝒓₁, and relative velocity, 𝒗₁₂ = 𝒗₂ - 𝒗₁, of a pair.
///
/// Stored positions lag the true ones by `false_time`, so the separation is advanced
/// by `false_time`·𝒗₁₂ before it is mapped to the nearest image.
pub fn relative_kinematics<A, B, T>(
    boundary: &T,
    first: &A,
    second: &B,
    false_time: f64,
) -> (Vector3, Vector3)
where
    A: Kinetic + ?Sized,
    B: Kinetic + ?Sized,
    T: Boundary + ?Sized,
{
    let velocity = second.velocity() - first.velocity();
    let mut distance = second.position() - first.position() + velocity * false_time;
    boundary.nearest_image(&mut distance);
    (distance, velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Particle, PeriodicCuboid, StepLadder, Unbounded};
    use approx::assert_relative_eq;

    #[test]
    fn test_relative_kinematics() {
        let a = Particle::new(0, Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0), 1.0)
            .unwrap();
        let b = Particle::new(1, Vector3::new(9.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0), 1.0)
            .unwrap();
        let (r12, v12) = relative_kinematics(&Unbounded, &a, &b, 0.5);
        assert_relative_eq!(r12, Vector3::new(7.0, 0.0, 0.0));
        assert_relative_eq!(v12, Vector3::new(-2.0, 0.0, 0.0));

        let cuboid = PeriodicCuboid::new(Vector3::new(10.0, 10.0, 10.0)).unwrap();
        let (r12, _) = relative_kinematics(&cuboid, &a, &b, 0.5);
        assert_relative_eq!(r12, Vector3::new(-3.0, 0.0, 0.0));
    }

    #[test]
    fn test_ladder_energy() {
        let ladder = StepLadder::square_well(1.0, 1.5, 2.0).unwrap();
        let energy: &dyn IsotropicTwobodyEnergy = &ladder;
        assert_eq!(energy.isotropic_twobody_energy(1.2 * 1.2), -2.0);
        assert_eq!(energy.isotropic_twobody_energy(4.0), 0.0);
    }
}
