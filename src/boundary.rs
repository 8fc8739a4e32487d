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

//! Boundary conditions applied to separation vectors.

use crate::{Error, Result, Vector3};
use dyn_clone::DynClone;
use std::fmt::Debug;

/// Maps a separation vector onto its nearest periodic image
pub trait Boundary: Debug + DynClone + Send + Sync {
    fn nearest_image(&self, distance: &mut Vector3);
}

dyn_clone::clone_trait_object!(Boundary);

/// Open space; separations are used as they are
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Unbounded;

impl Boundary for Unbounded {
    #[inline]
    fn nearest_image(&self, _distance: &mut Vector3) {}
}

/// Rectangular box, periodic in every direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicCuboid {
    box_length: Vector3,
}

impl PeriodicCuboid {
    pub fn new(box_length: Vector3) -> Result<Self> {
        if box_length.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(Error::Configuration(format!(
                "box lengths must be positive and finite, got {:?}",
                box_length.as_slice()
            )));
        }
        Ok(Self { box_length })
    }

    pub fn box_length(&self) -> &Vector3 {
        &self.box_length
    }
}

impl Boundary for PeriodicCuboid {
    #[inline]
    fn nearest_image(&self, distance: &mut Vector3) {
        for (x, length) in distance.iter_mut().zip(self.box_length.iter()) {
            *x -= length * (*x / length).round();
        }
    }
}
