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

//! Error type shared by all hard potentials.

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or evaluating hard potentials.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid ladder or particle parameters, detected at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The pair is closer than an impenetrable threshold and overlaps are not repaired.
    ///
    /// Also raised when a collision was expected but could not be found, which
    /// signals that the integrator let a pair drift into a state it does not belong to.
    #[error("overlap: squared separation {distance_squared} is inside threshold {threshold_squared}")]
    Overlap {
        distance_squared: f64,
        threshold_squared: f64,
    },

    /// Invalid mutation of the bond registry, e.g. removing a missing bond.
    #[error("bond registry error: {0}")]
    BondRegistry(String),

    /// Threshold or state index outside the ladder.
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}
