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

//! Axis-aligned hard walls.

use crate::{Bump, Crossing, Error, Kinetic, Prediction, Result, StepLadder, Vector3};

/// Side of the box a face bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Lower,
    Upper,
}

/// One of the six faces of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    axis: usize,
    side: Side,
}

impl Face {
    /// Face normal to `axis` (0, 1 or 2)
    pub fn new(axis: usize, side: Side) -> Result<Self> {
        if axis >= 3 {
            return Err(Error::IndexOutOfRange { index: axis, len: 3 });
        }
        Ok(Self { axis, side })
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Position in [`FaceStates`]
    pub fn index(&self) -> usize {
        2 * self.axis
            + match self.side {
                Side::Lower => 0,
                Side::Upper => 1,
            }
    }

    /// All six faces in [`Face::index`] order
    pub fn all() -> impl Iterator<Item = Face> {
        (0..3).flat_map(|axis| {
            [Side::Lower, Side::Upper]
                .into_iter()
                .map(move |side| Face { axis, side })
        })
    }
}

/// State of a particle with respect to each face, indexed by [`Face::index`]
pub type FaceStates = [usize; 6];

/// Planar walls between `lower` and `upper`, each face interacting with particles
/// through the same ladder of distances from the plane.
///
/// Faces can be switched off one by one. A field, as made by [`HardWalls::field`],
/// is a single active face.
#[derive(Debug, Clone, PartialEq)]
pub struct HardWalls {
    ladder: StepLadder,
    lower: Vector3,
    upper: Vector3,
    active: [[bool; 2]; 3],
}

impl HardWalls {
    /// Closed box with all six faces active
    pub fn new(ladder: StepLadder, lower: Vector3, upper: Vector3) -> Result<Self> {
        if !lower.iter().zip(upper.iter()).all(|(l, u)| l < u) {
            return Err(Error::Configuration(format!(
                "lower corner {:?} must be below upper corner {:?}",
                lower.as_slice(),
                upper.as_slice()
            )));
        }
        Ok(Self {
            ladder,
            lower,
            upper,
            active: [[true; 2]; 3],
        })
    }

    /// Field along `axis`, with distances measured from the plane at `origin`
    pub fn field(ladder: StepLadder, axis: usize, origin: f64) -> Result<Self> {
        let face = Face::new(axis, Side::Lower)?;
        let mut walls = Self {
            ladder,
            lower: Vector3::repeat(origin),
            upper: Vector3::repeat(f64::INFINITY),
            active: [[false; 2]; 3],
        };
        walls.set_active(face, true);
        Ok(walls)
    }

    pub fn ladder(&self) -> &StepLadder {
        &self.ladder
    }

    pub fn ladder_mut(&mut self) -> &mut StepLadder {
        &mut self.ladder
    }

    pub fn set_active(&mut self, face: Face, active: bool) {
        self.active[face.axis][face.index() % 2] = active;
    }

    /// Switch both faces normal to an axis
    pub fn set_axis_active(&mut self, axis: usize, active: bool) -> Result<()> {
        if axis >= 3 {
            return Err(Error::IndexOutOfRange { index: axis, len: 3 });
        }
        self.active[axis] = [active; 2];
        Ok(())
    }

    pub fn is_active(&self, face: Face) -> bool {
        self.active[face.axis][face.index() % 2]
    }

    /// Active faces
    pub fn active_faces(&self) -> impl Iterator<Item = Face> + '_ {
        Face::all().filter(|face| self.is_active(*face))
    }

    /// Separation from the face plane to the particle, advanced by the false time.
    ///
    /// Only the component normal to the face is non-zero.
    pub fn separation<P: Kinetic + ?Sized>(&self, face: Face, particle: &P, false_time: f64) -> Vector3 {
        let plane = match face.side {
            Side::Lower => self.lower[face.axis],
            Side::Upper => self.upper[face.axis],
        };
        let mut distance = Vector3::zeros();
        distance[face.axis] =
            particle.position()[face.axis] + particle.velocity()[face.axis] * false_time - plane;
        distance
    }

    /// Particle velocity normal to the face
    fn normal_velocity<P: Kinetic + ?Sized>(face: Face, particle: &P) -> Vector3 {
        let mut velocity = Vector3::zeros();
        velocity[face.axis] = particle.velocity()[face.axis];
        velocity
    }

    /// State of a particle with respect to one face
    pub fn get_state<P: Kinetic + ?Sized>(&self, face: Face, particle: &P) -> Result<usize> {
        self.ladder
            .get_state(self.separation(face, particle, 0.0).norm_squared())
    }

    /// States for all faces; inactive faces are given the outermost state
    pub fn states<P: Kinetic + ?Sized>(&self, particle: &P) -> Result<FaceStates> {
        let mut states = [self.ladder.outer_state(); 6];
        for face in self.active_faces() {
            states[face.index()] = self.get_state(face, particle)?;
        }
        Ok(states)
    }

    /// Next crossing with one face; inactive faces never collide
    pub fn predict<P: Kinetic + ?Sized>(
        &self,
        face: Face,
        particle: &P,
        state: usize,
        false_time: f64,
    ) -> Result<Option<Prediction>> {
        if !self.is_active(face) {
            return Ok(None);
        }
        let distance = self.separation(face, particle, false_time);
        let velocity = Self::normal_velocity(face, particle);
        self.ladder.predict(&distance, &velocity, state, false_time)
    }

    pub fn collision_time<P: Kinetic + ?Sized>(
        &self,
        face: Face,
        particle: &P,
        state: usize,
        false_time: f64,
    ) -> Result<f64> {
        Ok(self
            .predict(face, particle, state, false_time)?
            .map_or(f64::INFINITY, |prediction| prediction.time))
    }

    /// Earliest crossing over all active faces
    pub fn next_collision<P: Kinetic + ?Sized>(
        &self,
        particle: &P,
        states: &FaceStates,
        false_time: f64,
    ) -> Result<Option<(Face, Prediction)>> {
        let mut next: Option<(Face, Prediction)> = None;
        for face in self.active_faces() {
            let Some(prediction) = self.predict(face, particle, states[face.index()], false_time)? else {
                continue;
            };
            if next.map_or(true, |(_, best)| prediction.time < best.time) {
                next = Some((face, prediction));
            }
        }
        Ok(next)
    }

    /// Resolve a crossing with a face and apply it to the particle; inactive faces do nothing
    pub fn bump<P: Kinetic + ?Sized>(
        &self,
        face: Face,
        particle: &mut P,
        state: usize,
        false_time: f64,
    ) -> Bump {
        if !self.is_active(face) {
            return Bump::inert(self.ladder.normalize_state(state));
        }
        let distance = self.separation(face, particle, false_time);
        let velocity = Self::normal_velocity(face, particle);
        let crossing = self.ladder.crossing(&distance, &velocity, state);
        self.bump_crossing(face, particle, state, crossing, false_time)
    }

    /// Resolve a crossing in a known direction, e.g. from [`HardWalls::next_collision`]
    pub fn bump_crossing<P: Kinetic + ?Sized>(
        &self,
        face: Face,
        particle: &mut P,
        state: usize,
        crossing: Crossing,
        false_time: f64,
    ) -> Bump {
        if !self.is_active(face) {
            return Bump::inert(self.ladder.normalize_state(state));
        }
        let distance = self.separation(face, particle, false_time);
        let velocity = Self::normal_velocity(face, particle);
        let outcome = self.ladder.resolve_crossing(
            &distance,
            &velocity,
            state,
            crossing,
            (0.0, particle.inverse_mass()),
        );
        outcome.apply_second(particle, false_time);
        outcome
    }

    /// Energy of a particle summed over the active faces
    pub fn energy<P: Kinetic + ?Sized>(&self, particle: &P) -> f64 {
        self.active_faces()
            .map(|face| {
                self.ladder
                    .energy(self.separation(face, particle, 0.0).norm_squared())
            })
            .sum()
    }
}
