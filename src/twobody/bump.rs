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

//! Resolution of a threshold crossing.
//!
//! At the crossing the pair exchanges an impulse along 𝒓₁₂. With reduced mass
//! $\mu = 1/(m_1^{-1} + m_2^{-1})$ and $b = 𝒓\cdot𝒗$, the kinetic energy along the
//! separation is $\mu b^2 / 2r_c^2$. If it is smaller than the energy jump $\Delta u$
//! the pair is reflected, with virial $2\mu b$; otherwise it passes with virial
//! $$ \mu\left(b \mp \sqrt{b^2 - 2r^2\Delta u/\mu}\right) $$
//! where the sign keeps the direction of motion.

use super::Crossing;
use crate::{Kinetic, Matrix3, StepLadder, Vector3};

/// Outcome of a threshold crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bump {
    /// State of the pair after the crossing
    pub new_state: usize,
    /// Virial, 𝒓₁₂·Δ𝒑, for pressure bookkeeping
    pub virial: f64,
    /// Change in potential energy; the kinetic energy changes by the opposite amount
    pub energy_change: f64,
    /// Momentum given to the first particle, Δ𝒑 = (virial/r²)·𝒓₁₂.
    /// The second particle receives -Δ𝒑.
    pub impulse: Vector3,
}

impl Bump {
    pub(crate) fn inert(state: usize) -> Self {
        Self {
            new_state: state,
            virial: 0.0,
            energy_change: 0.0,
            impulse: Vector3::zeros(),
        }
    }

    /// Virial tensor, 𝒓₁₂ ⊗ Δ𝒑
    pub fn virial_tensor(&self, distance: &Vector3) -> Matrix3 {
        distance * self.impulse.transpose()
    }

    /// Apply the impulse to both particles.
    ///
    /// Positions are corrected by the false time so that they stay consistent
    /// with the impulse having happened at the predicted instant.
    pub fn apply<A, B>(&self, first: &mut A, second: &mut B, false_time: f64)
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let dv1 = self.impulse * first.inverse_mass();
        *first.velocity_mut() += dv1;
        *first.position_mut() -= dv1 * false_time;
        self.apply_second(second, false_time);
    }

    /// Apply the impulse to the second body only; the first is immovable
    pub fn apply_second<B: Kinetic + ?Sized>(&self, second: &mut B, false_time: f64) {
        let dv2 = self.impulse * second.inverse_mass();
        *second.velocity_mut() -= dv2;
        *second.position_mut() += dv2 * false_time;
    }
}

impl StepLadder {
    /// Direction of the crossing of a pair bumped in `state`.
    ///
    /// Inside the ladder the nearest of the two bounding thresholds is taken to be the
    /// one being crossed. This is ambiguous for slow pairs midway between thresholds;
    /// prefer the crossing from [`StepLadder::predict`] where available.
    pub fn crossing(&self, distance: &Vector3, velocity: &Vector3, state: usize) -> Crossing {
        let state = self.normalize_state(state);
        if state == self.outer_state() {
            return Crossing::Inward;
        }
        if state == 0 {
            // when bumped in state 0 only an overlapping pair is still approaching
            return if distance.dot(velocity) < 0.0 {
                Crossing::Inward
            } else {
                Crossing::Outward
            };
        }
        let r2 = distance.norm_squared();
        let thresholds = self.thresholds_squared();
        if (r2 - thresholds[state - 1]).abs() < (thresholds[state] - r2).abs() {
            Crossing::Inward
        } else {
            Crossing::Outward
        }
    }

    /// Outcome of a crossing without touching any particle.
    ///
    /// `inverse_masses` are those of the first and second particle; zero means immovable.
    pub fn resolve(
        &self,
        distance: &Vector3,
        velocity: &Vector3,
        state: usize,
        inverse_masses: (f64, f64),
    ) -> Bump {
        let crossing = self.crossing(distance, velocity, state);
        self.resolve_crossing(distance, velocity, state, crossing, inverse_masses)
    }

    /// Outcome of a crossing in a known direction
    pub fn resolve_crossing(
        &self,
        distance: &Vector3,
        velocity: &Vector3,
        state: usize,
        crossing: Crossing,
        inverse_masses: (f64, f64),
    ) -> Bump {
        let state = self.normalize_state(state);
        let total_inverse_mass = inverse_masses.0 + inverse_masses.1;
        if total_inverse_mass <= 0.0 {
            return Bump::inert(state);
        }
        let reduced_mass = total_inverse_mass.recip();
        let r2 = distance.norm_squared();
        let b = distance.dot(velocity);
        let outer_state = self.outer_state();

        // threshold being crossed and the state behind it, if there is one
        let (threshold, target) = match crossing {
            Crossing::Inward if state == 0 => (0, None),
            Crossing::Inward => (state - 1, Some(state - 1)),
            Crossing::Outward if state == outer_state => (outer_state - 1, None),
            Crossing::Outward => (state, Some(state + 1)),
        };

        let bounce = (state, 2.0 * reduced_mass * b, 0.0);
        let (new_state, virial, energy_change) = match target {
            None => bounce,
            Some(target) => {
                let old_energy = self.state_energy(state);
                let new_energy = self.state_energy(target);
                if new_energy == f64::INFINITY {
                    bounce
                } else if old_energy == f64::INFINITY {
                    log::warn!(
                        "leaving impenetrable state {} at r² = {}; no energy is accounted",
                        state,
                        r2
                    );
                    (target, 0.0, 0.0)
                } else {
                    let energy_jump = new_energy - old_energy;
                    let threshold_squared = self.thresholds_squared()[threshold];
                    let kinetic = b * b * reduced_mass / (2.0 * threshold_squared);
                    if kinetic < energy_jump {
                        bounce
                    } else {
                        let root = (b * b - 2.0 * r2 * energy_jump / reduced_mass)
                            .max(0.0)
                            .sqrt();
                        let virial = reduced_mass * (b - b.signum() * root);
                        (target, virial, energy_jump)
                    }
                }
            }
        };
        log::trace!(
            "bump {:?} at r² = {}: state {} -> {}, virial {}, du {}",
            crossing,
            r2,
            state,
            new_state,
            virial,
            energy_change
        );
        Bump {
            new_state,
            virial,
            energy_change,
            impulse: distance * (virial / r2),
        }
    }

    /// Resolve the crossing of two particles and apply it.
    ///
    /// `distance` and `velocity` are the separation and relative velocity,
    /// 𝒓₂ - 𝒓₁ and 𝒗₂ - 𝒗₁, at the predicted instant.
    pub fn bump<A, B>(
        &self,
        first: &mut A,
        second: &mut B,
        distance: &Vector3,
        velocity: &Vector3,
        state: usize,
        false_time: f64,
    ) -> Bump
    where
        A: Kinetic + ?Sized,
        B: Kinetic + ?Sized,
    {
        let outcome = self.resolve(
            distance,
            velocity,
            state,
            (first.inverse_mass(), second.inverse_mass()),
        );
        outcome.apply(first, second, false_time);
        outcome
    }
}
