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

//! Access to the kinetic state of particles owned by the caller.

use crate::{Error, Result, Vector3};

/// Read/write access to a particle's position, velocity and inverse mass.
///
/// Hard potentials never store particles; they only borrow them for the duration
/// of a single query or bump.
pub trait Kinetic {
    /// Stable identity, used for bond lookup
    fn index(&self) -> usize;
    fn position(&self) -> &Vector3;
    fn position_mut(&mut self) -> &mut Vector3;
    fn velocity(&self) -> &Vector3;
    fn velocity_mut(&mut self) -> &mut Vector3;
    /// Inverse mass, 1/m. Zero for an immovable body.
    fn inverse_mass(&self) -> f64;

    /// Momentum, m𝒗. Zero for an immovable body.
    fn momentum(&self) -> Vector3 {
        match self.inverse_mass() {
            rm if rm > 0.0 => self.velocity() / rm,
            _ => Vector3::zeros(),
        }
    }

    /// Kinetic energy, ½m|𝒗|². Zero for an immovable body.
    fn kinetic_energy(&self) -> f64 {
        match self.inverse_mass() {
            rm if rm > 0.0 => 0.5 * self.velocity().norm_squared() / rm,
            _ => 0.0,
        }
    }
}

/// Plain point particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    index: usize,
    pub position: Vector3,
    pub velocity: Vector3,
    inverse_mass: f64,
}

impl Particle {
    /// Create a particle with the given mass. An infinite mass gives an immovable particle.
    pub fn new(index: usize, position: Vector3, velocity: Vector3, mass: f64) -> Result<Self> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(Error::Configuration(format!(
                "mass must be positive, got {}",
                mass
            )));
        }
        Self::with_inverse_mass(index, position, velocity, mass.recip())
    }

    /// Create a particle directly from its inverse mass
    pub fn with_inverse_mass(
        index: usize,
        position: Vector3,
        velocity: Vector3,
        inverse_mass: f64,
    ) -> Result<Self> {
        if !inverse_mass.is_finite() || inverse_mass < 0.0 {
            return Err(Error::Configuration(format!(
                "inverse mass must be finite and non-negative, got {}",
                inverse_mass
            )));
        }
        if !position.iter().chain(velocity.iter()).all(|x| x.is_finite()) {
            return Err(Error::Configuration(
                "position and velocity must be finite".to_string(),
            ));
        }
        Ok(Self {
            index,
            position,
            velocity,
            inverse_mass,
        })
    }

    /// Move the particle ballistically by `time`
    pub fn advance(&mut self, time: f64) {
        self.position += self.velocity * time;
    }
}

impl Kinetic for Particle {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }
    #[inline]
    fn position(&self) -> &Vector3 {
        &self.position
    }
    #[inline]
    fn position_mut(&mut self) -> &mut Vector3 {
        &mut self.position
    }
    #[inline]
    fn velocity(&self) -> &Vector3 {
        &self.velocity
    }
    #[inline]
    fn velocity_mut(&mut self) -> &mut Vector3 {
        &mut self.velocity
    }
    #[inline]
    fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kinetic_energy() {
        let p = Particle::new(7, Vector3::zeros(), Vector3::new(3.0, 4.0, 0.0), 2.0).unwrap();
        assert_relative_eq!(p.kinetic_energy(), 25.0);
        assert_relative_eq!(p.momentum(), Vector3::new(6.0, 8.0, 0.0));
    }

    #[test]
    fn test_immovable() {
        let p = Particle::new(0, Vector3::zeros(), Vector3::zeros(), f64::INFINITY).unwrap();
        assert_eq!(p.inverse_mass(), 0.0);
        assert_eq!(p.kinetic_energy(), 0.0);
    }

    #[test]
    fn test_invalid() {
        assert!(Particle::new(0, Vector3::zeros(), Vector3::zeros(), 0.0).is_err());
        assert!(Particle::new(0, Vector3::zeros(), Vector3::zeros(), f64::NAN).is_err());
        let nan = Vector3::new(f64::NAN, 0.0, 0.0);
        assert!(Particle::new(0, nan, Vector3::zeros(), 1.0).is_err());
    }

    #[test]
    fn test_advance() {
        let mut p = Particle::new(0, Vector3::zeros(), Vector3::new(1.0, -2.0, 0.5), 1.0).unwrap();
        p.advance(2.0);
        assert_relative_eq!(p.position, Vector3::new(2.0, -4.0, 1.0));
    }
}
