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

//! # Stepwise
//!
//! A library for event-driven ("hard") interactions where the potential energy
//! is piecewise constant in the separation: hard spheres, square wells and shoulders,
//! tethered bonds and multi-well fields.
//!
//! A hard potential is described by a [`StepLadder`] of squared threshold distances
//! and per-interval energies. For a pair of particles the ladder
//!
//! 1. classifies the current separation into a discrete state,
//! 2. predicts the time until the next threshold crossing, and
//! 3. resolves the crossing ("bump") with a momentum conserving impulse that
//!    either reflects the pair or lets it pass while accounting for the energy jump.
//!
//! The [`PotentialDispatcher`] routes pairs listed in a [`BondRegistry`] to a bonded
//! ladder and all other pairs to the default nonbonded ladder, and [`HardWalls`]
//! applies a ladder between single particles and the faces of a box.
//!
//! ## Examples
//! ~~~
//! use stepwise::{Particle, PotentialDispatcher, StepLadder, Vector3};
//! let hard_sphere = StepLadder::hard_sphere(1.0).unwrap();
//! let tether = StepLadder::tether(1.0, 1.5).unwrap();
//! let dispatcher = PotentialDispatcher::new(hard_sphere, tether);
//!
//! let a = Particle::new(0, Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.5, 0.0, 0.0), 1.0).unwrap();
//! let b = Particle::new(1, Vector3::new(2.0, 0.0, 0.0), Vector3::new(-0.5, 0.0, 0.0), 1.0).unwrap();
//! let state = dispatcher.get_state(&a, &b).unwrap();
//! let time = dispatcher.collision_time(&a, &b, state, 0.0).unwrap();
//! assert!((time - 1.0).abs() < 1e-12);
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;
/// A stack-allocated 3x3 square matrix
pub type Matrix3 = nalgebra::Matrix3<f64>;

pub mod bonding;
pub mod boundary;
pub mod dispatch;
pub mod error;
pub mod ladder;
pub mod onebody;
pub mod particle;
pub mod twobody;

pub use bonding::BondRegistry;
pub use boundary::{Boundary, PeriodicCuboid, Unbounded};
pub use dispatch::{Interaction, PotentialDispatcher};
pub use error::{Error, Result};
pub use ladder::StepLadder;
pub use onebody::HardWalls;
pub use particle::{Kinetic, Particle};
pub use twobody::{Bump, Crossing, Prediction};

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}
