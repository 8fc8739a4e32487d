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

//! # Step ladders
//!
//! A hard potential is fully described by $N$ strictly increasing squared threshold
//! distances $r_0^2 < r_1^2 < \dots < r_{N-1}^2$ and $N+1$ energies, one for each
//! interval between thresholds:
//!
//! $$ u(r) = e_i \quad \text{for} \quad r_{i-1} \le r < r_i $$
//!
//! with $r_{-1} = 0$ and $r_N = \infty$. The interval index $i \in [0, N]$ is the
//! *state* of a pair. State 0 is the core side, state $N$ is beyond the outermost
//! threshold.

use crate::twobody::IsotropicTwobodyEnergy;
use crate::{Cutoff, Error, Result};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Piecewise-constant pair potential with optional overlap repair.
///
/// # Examples
/// ~~~
/// use stepwise::StepLadder;
/// // square well: hard core at 1.0, well of depth 1.0 out to 1.5
/// let ladder = StepLadder::square_well(1.0, 1.5, 1.0).unwrap();
/// assert_eq!(ladder.get_state(1.2_f64.powi(2)).unwrap(), 1);
/// assert_eq!(ladder.get_state(1.5_f64.powi(2)).unwrap(), 2); // on the threshold counts as beyond
/// assert_eq!(ladder.energy(1.2_f64.powi(2)), -1.0);
/// assert!(ladder.get_state(0.9).is_err()); // overlap
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "LadderConfig", into = "LadderConfig")
)]
pub struct StepLadder {
    /// Squared threshold distances, strictly increasing
    thresholds_squared: Vec<f64>,
    /// Energy of each state; one more than the number of thresholds
    energies: Vec<f64>,
    /// Clamp overlaps to state 0 instead of failing
    fix_overlap: bool,
}

/// User-facing ladder parameters with distances instead of squared distances
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct LadderConfig {
    /// Threshold distances, strictly increasing
    pub distances: Vec<f64>,
    /// Energies of the states; the outermost may be omitted and is then zero
    pub energies: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fix_overlap: bool,
}

impl TryFrom<LadderConfig> for StepLadder {
    type Error = Error;
    fn try_from(config: LadderConfig) -> Result<Self> {
        Ok(StepLadder::new(&config.distances, &config.energies)?
            .with_fix_overlap(config.fix_overlap))
    }
}

impl From<StepLadder> for LadderConfig {
    fn from(ladder: StepLadder) -> Self {
        Self {
            distances: ladder.thresholds_squared.iter().map(|r2| r2.sqrt()).collect(),
            energies: ladder.energies,
            fix_overlap: ladder.fix_overlap,
        }
    }
}

fn check_distance(distance: f64) -> Result<()> {
    if distance.is_finite() && distance > 0.0 {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "threshold distances must be positive and finite, got {}",
            distance
        )))
    }
}

fn check_energy(energy: f64) -> Result<()> {
    if energy.is_nan() || energy == f64::NEG_INFINITY {
        Err(Error::Configuration(format!(
            "energies must be finite or +inf, got {}",
            energy
        )))
    } else {
        Ok(())
    }
}

impl StepLadder {
    /// Create from threshold distances and state energies.
    ///
    /// `energies` has either one entry per threshold, in which case the energy
    /// beyond the outermost threshold is zero, or one extra entry for the outermost state.
    pub fn new(distances: &[f64], energies: &[f64]) -> Result<Self> {
        if distances.is_empty() {
            return Err(Error::Configuration(
                "at least one threshold is required".to_string(),
            ));
        }
        for distance in distances {
            check_distance(*distance)?;
        }
        if !distances.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(Error::Configuration(format!(
                "threshold distances must be strictly increasing, got {:?}",
                distances
            )));
        }
        for energy in energies {
            check_energy(*energy)?;
        }
        let energies = match energies.len() {
            n if n == distances.len() => energies.iter().copied().chain([0.0]).collect(),
            n if n == distances.len() + 1 => energies.to_vec(),
            n => {
                return Err(Error::Configuration(format!(
                    "{} thresholds need {} or {} energies, got {}",
                    distances.len(),
                    distances.len(),
                    distances.len() + 1,
                    n
                )))
            }
        };
        Ok(Self {
            thresholds_squared: distances.iter().map(|d| d * d).collect(),
            energies,
            fix_overlap: false,
        })
    }

    /// Impenetrable spheres with contact distance σ
    pub fn hard_sphere(sigma: f64) -> Result<Self> {
        Self::new(&[sigma], &[f64::INFINITY])
    }

    /// Hard core of diameter σ surrounded by an attractive well of depth ε reaching out to λ
    pub fn square_well(sigma: f64, lambda: f64, epsilon: f64) -> Result<Self> {
        Self::new(&[sigma, lambda], &[f64::INFINITY, -epsilon])
    }

    /// Hard core of diameter σ surrounded by a repulsive shoulder of height ε reaching out to λ
    pub fn square_shoulder(sigma: f64, lambda: f64, epsilon: f64) -> Result<Self> {
        Self::new(&[sigma, lambda], &[f64::INFINITY, epsilon])
    }

    /// Pair free to move between a hard core and a maximum (tether) distance
    pub fn tether(core: f64, tether: f64) -> Result<Self> {
        Self::new(&[core, tether], &[f64::INFINITY, 0.0, f64::INFINITY])
    }

    /// Tethered bond of length L that may stretch or compress by the fraction δ
    pub fn bond(length: f64, delta: f64) -> Result<Self> {
        if !(0.0..1.0).contains(&delta) || delta == 0.0 {
            return Err(Error::Configuration(format!(
                "bond fluctuation must be in (0,1), got {}",
                delta
            )));
        }
        Self::tether(length * (1.0 - delta), length * (1.0 + delta))
    }

    /// Hard core of diameter σ followed by wells given as (outer distance, energy)
    pub fn multi_well(sigma: f64, wells: &[(f64, f64)]) -> Result<Self> {
        let distances: Vec<f64> = std::iter::once(sigma)
            .chain(wells.iter().map(|(distance, _)| *distance))
            .collect();
        let energies: Vec<f64> = std::iter::once(f64::INFINITY)
            .chain(wells.iter().map(|(_, energy)| *energy))
            .collect();
        Self::new(&distances, &energies)
    }

    /// Repair overlaps instead of reporting them as errors
    pub fn with_fix_overlap(mut self, fix_overlap: bool) -> Self {
        self.fix_overlap = fix_overlap;
        self
    }

    pub fn fix_overlap(&self) -> bool {
        self.fix_overlap
    }

    pub fn set_fix_overlap(&mut self, fix_overlap: bool) {
        self.fix_overlap = fix_overlap;
    }

    /// Number of thresholds, N
    pub fn len(&self) -> usize {
        self.thresholds_squared.len()
    }

    /// Always false; a ladder has at least one threshold
    pub fn is_empty(&self) -> bool {
        self.thresholds_squared.is_empty()
    }

    /// Number of states, N + 1
    pub fn num_states(&self) -> usize {
        self.energies.len()
    }

    /// Outermost state, N
    #[inline]
    pub fn outer_state(&self) -> usize {
        self.thresholds_squared.len()
    }

    pub fn thresholds_squared(&self) -> &[f64] {
        &self.thresholds_squared
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Threshold distance `i` (not squared)
    pub fn distance(&self, i: usize) -> Result<f64> {
        self.thresholds_squared
            .get(i)
            .map(|r2| r2.sqrt())
            .ok_or(Error::IndexOutOfRange {
                index: i,
                len: self.len(),
            })
    }

    /// Energy of a state. States beyond N are treated as N.
    #[inline]
    pub fn state_energy(&self, state: usize) -> f64 {
        self.energies[self.normalize_state(state)]
    }

    /// True if state 0 is impenetrable
    #[inline]
    pub fn has_hard_core(&self) -> bool {
        self.energies[0] == f64::INFINITY
    }

    /// Map sentinel states (anything above N) to N
    #[inline]
    pub(crate) fn normalize_state(&self, state: usize) -> usize {
        state.min(self.outer_state())
    }

    /// Change threshold distance `i`, keeping the thresholds strictly increasing
    pub fn set_distance(&mut self, i: usize, distance: f64) -> Result<()> {
        if i >= self.len() {
            return Err(Error::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        check_distance(distance)?;
        let r2 = distance * distance;
        let below = i.checked_sub(1).map(|j| self.thresholds_squared[j]);
        let above = self.thresholds_squared.get(i + 1).copied();
        if below.is_some_and(|t| t >= r2) || above.is_some_and(|t| t <= r2) {
            return Err(Error::Configuration(format!(
                "threshold {} at distance {} breaks the ordering of the ladder",
                i, distance
            )));
        }
        self.thresholds_squared[i] = r2;
        Ok(())
    }

    /// Change the energy of `state`
    pub fn set_energy(&mut self, state: usize, energy: f64) -> Result<()> {
        if state >= self.num_states() {
            return Err(Error::IndexOutOfRange {
                index: state,
                len: self.num_states(),
            });
        }
        check_energy(energy)?;
        self.energies[state] = energy;
        Ok(())
    }

    /// State index of a squared separation without overlap checks.
    ///
    /// The smallest `i` with `distance_squared < r_i²`, or N if there is none.
    #[inline]
    pub fn classify(&self, distance_squared: f64) -> usize {
        self.thresholds_squared
            .partition_point(|threshold| *threshold <= distance_squared)
    }

    /// State index of a squared separation.
    ///
    /// A separation inside an impenetrable core is an overlap. It is reported as
    /// [`Error::Overlap`] unless overlaps are repaired, in which case state 0 is returned.
    pub fn get_state(&self, distance_squared: f64) -> Result<usize> {
        let state = self.classify(distance_squared);
        if state == 0 && self.has_hard_core() {
            let threshold_squared = self.thresholds_squared[0];
            if !self.fix_overlap {
                return Err(Error::Overlap {
                    distance_squared,
                    threshold_squared,
                });
            }
            log::warn!(
                "overlap at r² = {} (core r² = {}); clamping to state 0",
                distance_squared,
                threshold_squared
            );
        }
        Ok(state)
    }

    /// Potential energy at the given squared separation
    #[inline]
    pub fn energy(&self, distance_squared: f64) -> f64 {
        self.energies[self.classify(distance_squared)]
    }
}

impl IsotropicTwobodyEnergy for StepLadder {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        self.energy(distance_squared)
    }
}

impl Cutoff for StepLadder {
    fn cutoff(&self) -> f64 {
        self.cutoff_squared().sqrt()
    }
    fn cutoff_squared(&self) -> f64 {
        self.thresholds_squared[self.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_get_state() {
        let ladder = StepLadder::new(&[1.0, 1.5, 2.0], &[f64::INFINITY, -2.0, -1.0]).unwrap();
        assert_eq!(ladder.len(), 3);
        assert_eq!(ladder.num_states(), 4);
        assert_eq!(ladder.get_state(1.1).unwrap(), 1);
        assert_eq!(ladder.get_state(2.25).unwrap(), 2);
        assert_eq!(ladder.get_state(3.0).unwrap(), 2);
        assert_eq!(ladder.get_state(4.0).unwrap(), 3);
        assert_eq!(ladder.get_state(100.0).unwrap(), 3);
        assert_eq!(ladder.get_state(1.0).unwrap(), 1);
        assert_eq!(ladder.energy(3.0), -1.0);
        assert_eq!(ladder.energy(5.0), 0.0);
        assert!(ladder.energy(0.5).is_infinite());
    }

    #[test]
    fn test_overlap() {
        let ladder = StepLadder::hard_sphere(1.0).unwrap();
        assert_eq!(
            ladder.get_state(0.99),
            Err(Error::Overlap {
                distance_squared: 0.99,
                threshold_squared: 1.0
            })
        );
        let ladder = ladder.with_fix_overlap(true);
        assert_eq!(ladder.get_state(1.0 - 1e-12).unwrap(), 0);
    }

    #[test]
    fn test_soft_core_has_no_overlap() {
        // finite innermost energy: state 0 is a legal state
        let ladder = StepLadder::new(&[1.0], &[2.0]).unwrap();
        assert!(!ladder.has_hard_core());
        assert_eq!(ladder.get_state(0.5).unwrap(), 0);
        assert_eq!(ladder.energy(0.5), 2.0);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            StepLadder::new(&[1.0, 1.0], &[f64::INFINITY, -1.0]),
            Err(Error::Configuration(_))
        ));
        assert!(StepLadder::new(&[1.5, 1.0], &[f64::INFINITY, -1.0]).is_err());
        assert!(StepLadder::new(&[], &[]).is_err());
        assert!(StepLadder::new(&[1.0, 2.0], &[1.0]).is_err());
        assert!(StepLadder::new(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0]).is_err());
        assert!(StepLadder::new(&[-1.0], &[1.0]).is_err());
        assert!(StepLadder::new(&[1.0], &[f64::NAN]).is_err());
        assert!(StepLadder::new(&[1.0], &[f64::NEG_INFINITY]).is_err());
        assert!(StepLadder::bond(1.0, 1.5).is_err());
    }

    #[test]
    fn test_named_ladders() {
        let well = StepLadder::square_well(1.0, 1.5, 0.5).unwrap();
        assert_eq!(well.energies(), &[f64::INFINITY, -0.5, 0.0]);
        let shoulder = StepLadder::square_shoulder(1.0, 1.5, 0.5).unwrap();
        assert_eq!(shoulder.energies(), &[f64::INFINITY, 0.5, 0.0]);

        let bond = StepLadder::bond(2.0, 0.1).unwrap();
        assert_relative_eq!(bond.distance(0).unwrap(), 1.8, epsilon = 1e-12);
        assert_relative_eq!(bond.distance(1).unwrap(), 2.2, epsilon = 1e-12);
        assert!(bond.state_energy(2).is_infinite());
        assert!(bond.state_energy(99).is_infinite());
        assert_eq!(bond.state_energy(1), 0.0);

        let wells = StepLadder::multi_well(1.0, &[(1.2, -3.0), (1.4, -1.0)]).unwrap();
        assert_eq!(wells.energies(), &[f64::INFINITY, -3.0, -1.0, 0.0]);
        assert_relative_eq!(wells.cutoff(), 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_setters() {
        let mut ladder = StepLadder::square_well(1.0, 1.5, 1.0).unwrap();
        ladder.set_distance(1, 2.0).unwrap();
        assert_relative_eq!(ladder.cutoff_squared(), 4.0);
        assert!(ladder.set_distance(1, 0.5).is_err());
        assert!(ladder.set_distance(0, 2.0).is_err());
        assert!(matches!(
            ladder.set_distance(2, 3.0),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
        ladder.set_energy(1, -4.0).unwrap();
        assert_eq!(ladder.energy(2.0), -4.0);
        assert!(ladder.set_energy(3, 0.0).is_err());
        assert!(ladder.set_energy(1, f64::NAN).is_err());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde_config() {
        let ladder: StepLadder = serde_json::from_str(
            r#"{"distances": [1.0, 2.0], "energies": [5.0, -1.0], "fix_overlap": true}"#,
        )
        .unwrap();
        assert!(ladder.fix_overlap());
        assert_eq!(ladder.thresholds_squared(), &[1.0, 4.0]);
        assert_eq!(ladder.energies(), &[5.0, -1.0, 0.0]);

        let result: std::result::Result<StepLadder, _> =
            serde_json::from_str(r#"{"distances": [2.0, 1.0], "energies": [5.0, -1.0]}"#);
        assert!(result.is_err());
    }
}
