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

//! Time until the next threshold crossing.
//!
//! With separation 𝒓 and relative velocity 𝒗 the squared distance evolves as
//! $$ |𝒓 + 𝒗t|^2 = r^2 + 2bt + v^2t^2, \quad b = 𝒓\cdot𝒗 $$
//! so the time to reach a squared threshold $r_c^2$ is a root of a quadratic with
//! discriminant $D = b^2 - v^2(r^2 - r_c^2)$.
//! Approaching pairs ($b<0$) hit the inner threshold at the smaller root,
//! $t = (-b - \sqrt{D})/v^2$; all pairs leave through the outer threshold at the
//! larger root, $t = (-b + \sqrt{D})/v^2$.

use crate::{Error, Result, StepLadder, Vector3};

/// Scale of the time given to an overlapping pair before it is bumped apart
const OVERLAP_NUDGE: f64 = 0.001;

/// Relative round-off below the core tolerated for a pair just bumped off it
const CONTACT_TOLERANCE: f64 = 1e-10;

/// Direction in which a pair crosses a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crossing {
    /// Towards the core, from state `s` to `s - 1`
    Inward,
    /// Away from the core, from state `s` to `s + 1`
    Outward,
}

/// Predicted threshold crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Time from now, including the false time
    pub time: f64,
    pub crossing: Crossing,
}

impl StepLadder {
    /// Time until the pair crosses a threshold, or infinity if it never does.
    ///
    /// `distance` and `velocity` are the separation and relative velocity at the
    /// current instant; `false_time` is added to the returned time.
    /// See [`StepLadder::predict`] for errors.
    pub fn collision_time(
        &self,
        distance: &Vector3,
        velocity: &Vector3,
        state: usize,
        false_time: f64,
    ) -> Result<f64> {
        Ok(self
            .predict(distance, velocity, state, false_time)?
            .map_or(f64::INFINITY, |prediction| prediction.time))
    }

    /// Next threshold crossing of a pair in `state`, if any.
    ///
    /// Pure; repeated calls with the same arguments give the same answer.
    /// A pair that is already on the wrong side of a threshold of its state is an
    /// overlap. It is reported as [`Error::Overlap`] unless overlaps are repaired, in which
    /// case a short nudge time is returned so that the pair is bumped apart right away.
    pub fn predict(
        &self,
        distance: &Vector3,
        velocity: &Vector3,
        state: usize,
        false_time: f64,
    ) -> Result<Option<Prediction>> {
        let mut state = self.normalize_state(state);
        let v2 = velocity.norm_squared();
        if v2 == 0.0 {
            return Ok(None);
        }
        let r2 = distance.norm_squared();
        let b = distance.dot(velocity);
        let thresholds = self.thresholds_squared();

        // inside the core, whatever the recorded state or direction of motion
        if self.has_hard_core() && r2 < thresholds[0] * (1.0 - CONTACT_TOLERANCE) {
            if !self.fix_overlap() {
                return Err(Error::Overlap {
                    distance_squared: r2,
                    threshold_squared: thresholds[0],
                });
            }
            state = 0;
        }

        if b < 0.0 {
            if state > 0 {
                let inner = thresholds[state - 1];
                if r2 < inner {
                    return self.repair_overlap(r2, v2, inner, false_time, Crossing::Inward);
                }
                let discriminant = b * b - v2 * (r2 - inner);
                if discriminant > 0.0 {
                    return Ok(Some(Prediction {
                        time: (-b - discriminant.sqrt()) / v2 + false_time,
                        crossing: Crossing::Inward,
                    }));
                }
                // misses the inner threshold; look for the way out below
            } else if self.has_hard_core() {
                return self.repair_overlap(r2, v2, thresholds[0], false_time, Crossing::Inward);
            }
        }

        if state == self.outer_state() {
            return Ok(None);
        }
        let outer = thresholds[state];
        let discriminant = b * b - v2 * (r2 - outer);
        if discriminant <= 0.0 {
            // a pair inside the outer threshold always leaves through it
            if self.fix_overlap() {
                log::warn!(
                    "no exit from state {} at r² = {} (threshold r² = {}); ignoring",
                    state,
                    r2,
                    outer
                );
                return Ok(None);
            }
            return Err(Error::Overlap {
                distance_squared: r2,
                threshold_squared: outer,
            });
        }
        let time = (-b + discriminant.sqrt()) / v2;
        if time < 0.0 {
            return self.repair_overlap(r2, v2, outer, false_time, Crossing::Outward);
        }
        Ok(Some(Prediction {
            time: time + false_time,
            crossing: Crossing::Outward,
        }))
    }

    /// Immediate event for a pair found beyond a threshold it should not have passed
    fn repair_overlap(
        &self,
        r2: f64,
        v2: f64,
        threshold_squared: f64,
        false_time: f64,
        crossing: Crossing,
    ) -> Result<Option<Prediction>> {
        if !self.fix_overlap() {
            return Err(Error::Overlap {
                distance_squared: r2,
                threshold_squared,
            });
        }
        log::warn!(
            "overlap at r² = {} (threshold r² = {}); nudging",
            r2,
            threshold_squared
        );
        Ok(Some(Prediction {
            time: false_time + OVERLAP_NUDGE * (r2 / v2).sqrt(),
            crossing,
        }))
    }
}
