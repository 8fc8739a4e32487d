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

//! Routing of pairs to bonded or nonbonded ladders.

use crate::twobody::relative_kinematics;
use crate::{
    BondRegistry, Boundary, Bump, Crossing, Kinetic, Prediction, Result, StepLadder, Unbounded,
    Vector3,
};

/// How a pair interacts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction<'a> {
    Nonbonded,
    /// Bonded pair with the ladder that applies to this bond
    Bonded(&'a StepLadder),
}

/// Pair-level hard potential for a whole system.
///
/// Pairs registered as bonds use their own ladder, or the default bonded ladder;
/// all other pairs use the nonbonded ladder. Separations are taken as 𝒓₂ - 𝒓₁,
/// mapped through the boundary.
#[derive(Debug, Clone)]
pub struct PotentialDispatcher {
    nonbonded: StepLadder,
    bonded: StepLadder,
    bonds: BondRegistry,
    boundary: Box<dyn Boundary>,
}

impl PotentialDispatcher {
    /// Create with open boundaries and no bonds
    pub fn new(nonbonded: StepLadder, bonded: StepLadder) -> Self {
        Self {
            nonbonded,
            bonded,
            bonds: BondRegistry::default(),
            boundary: Box::new(Unbounded),
        }
    }

    /// Use the given boundary for all separations
    pub fn with_boundary(mut self, boundary: impl Boundary + 'static) -> Self {
        self.boundary = Box::new(boundary);
        self
    }

    pub fn boundary(&self) -> &dyn Boundary {
        self.boundary.as_ref()
    }

    pub fn nonbonded(&self) -> &StepLadder {
        &self.nonbonded
    }

    /// Mutable nonbonded ladder, e.g. for tuning a threshold between runs
    pub fn nonbonded_mut(&mut self) -> &mut StepLadder {
        &mut self.nonbonded
    }

    pub fn bonded(&self) -> &StepLadder {
        &self.bonded
    }

    pub fn bonded_mut(&mut self) -> &mut StepLadder {
        &mut self.bonded
    }

    pub fn bonds(&self) -> &BondRegistry {
        &self.bonds
    }

    /// Bond two particles using the default bonded ladder
    pub fn add_bond(&mut self, p: usize, q: usize) -> Result<()> {
        self.bonds.add_bond(p, q, None)
    }

    /// Bond two particles with a ladder of their own, e.g. a different tether length
    pub fn add_bond_with(&mut self, p: usize, q: usize, ladder: StepLadder) -> Result<()> {
        self.bonds.add_bond(p, q, Some(ladder))
    }

    pub fn remove_bond(&mut self, p: usize, q: usize) -> Result<()> {
        self.bonds.remove_bond(p, q)
    }

    pub fn is_bonded(&self, p: usize, q: usize) -> bool {
        self.bonds.is_bonded(p, q)
    }

    /// Interaction between particles `p` and `q`
    pub fn interaction(&self, p: usize, q: usize) -> Interaction<'_> {
        match self.bonds.bond(p, q) {
            Some(bond) => Interaction::Bonded(bond.ladder().unwrap_or(&self.bonded)),
            None => Interaction::Nonbonded,
        }
    }

    /// Ladder for an interaction
    pub fn ladder<'a>(&'a self, interaction: Interaction<'a>) -> &'a StepLadder {
        match interaction {
            Interaction::Nonbonded => &self.nonbonded,
            Interaction::Bonded(ladder) => ladder,
        }
    }

    /// Ladder that applies to particles `p` and `q`
    pub fn ladder_for(&self, p: usize, q: usize) -> &StepLadder {
        self.ladder(self.interaction(p, q))
    }

    /// Separation and relative velocity, advanced by the false time
    pub fn kinematics<A, B>(&self, first: &A, second: &B, false_time: f64) -> (Vector3, Vector3)
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        relative_kinematics(self.boundary.as_ref(), first, second, false_time)
    }

    /// Current state of a pair
    pub fn get_state<A, B>(&self, first: &A, second: &B) -> Result<usize>
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let (distance, _) = self.kinematics(first, second, 0.0);
        self.ladder_for(first.index(), second.index())
            .get_state(distance.norm_squared())
    }

    /// Potential energy of a pair
    pub fn energy<A, B>(&self, first: &A, second: &B) -> f64
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let (distance, _) = self.kinematics(first, second, 0.0);
        self.ladder_for(first.index(), second.index())
            .energy(distance.norm_squared())
    }

    /// Next threshold crossing of a pair, measured from now
    pub fn predict<A, B>(
        &self,
        first: &A,
        second: &B,
        state: usize,
        false_time: f64,
    ) -> Result<Option<Prediction>>
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let (distance, velocity) = self.kinematics(first, second, false_time);
        self.ladder_for(first.index(), second.index())
            .predict(&distance, &velocity, state, false_time)
    }

    /// Time until the next threshold crossing of a pair; infinite if there is none
    pub fn collision_time<A, B>(
        &self,
        first: &A,
        second: &B,
        state: usize,
        false_time: f64,
    ) -> Result<f64>
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let (distance, velocity) = self.kinematics(first, second, false_time);
        self.ladder_for(first.index(), second.index())
            .collision_time(&distance, &velocity, state, false_time)
    }

    /// Resolve the crossing of a pair whose collision time has come
    pub fn bump<A, B>(&self, first: &mut A, second: &mut B, old_state: usize, false_time: f64) -> Bump
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let (distance, velocity) = self.kinematics(first, second, false_time);
        self.ladder_for(first.index(), second.index()).bump(
            first,
            second,
            &distance,
            &velocity,
            old_state,
            false_time,
        )
    }

    /// Resolve a crossing whose direction is known from [`PotentialDispatcher::predict`]
    pub fn bump_crossing<A, B>(
        &self,
        first: &mut A,
        second: &mut B,
        old_state: usize,
        crossing: Crossing,
        false_time: f64,
    ) -> Bump
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let (distance, velocity) = self.kinematics(first, second, false_time);
        let outcome = self
            .ladder_for(first.index(), second.index())
            .resolve_crossing(
                &distance,
                &velocity,
                old_state,
                crossing,
                (first.inverse_mass(), second.inverse_mass()),
            );
        outcome.apply(first, second, false_time);
        outcome
    }
}
