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

//! Registry of bonded pairs.

use crate::{Error, Result, StepLadder};
use std::sync::Arc;

/// Bond from one particle to a partner
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    partner: usize,
    /// Bond-specific ladder; shared by both ends
    ladder: Option<Arc<StepLadder>>,
}

impl Bond {
    pub fn partner(&self) -> usize {
        self.partner
    }

    /// Ladder specific to this bond, if any
    pub fn ladder(&self) -> Option<&StepLadder> {
        self.ladder.as_deref()
    }
}

/// Symmetric adjacency relation between particle identities.
///
/// Bonds are stored once per end, so finding the bond between two particles
/// only scans the bonds of one of them.
///
/// # Examples
/// ~~~
/// use stepwise::BondRegistry;
/// let mut bonds = BondRegistry::default();
/// bonds.add_bond(3, 7, None).unwrap();
/// assert!(bonds.is_bonded(7, 3));
/// assert!(bonds.remove_bond(3, 7).is_ok());
/// assert!(bonds.remove_bond(3, 7).is_err());
/// ~~~
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BondRegistry {
    /// Bonds of each particle, indexed by particle identity
    bonds: Vec<Vec<Bond>>,
    num_bonds: usize,
}

impl BondRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bond two particles, optionally with a ladder that overrides the default bonded one
    pub fn add_bond(&mut self, p: usize, q: usize, ladder: Option<StepLadder>) -> Result<()> {
        if p == q {
            return Err(Error::BondRegistry(format!(
                "particle {} cannot be bonded to itself",
                p
            )));
        }
        if self.is_bonded(p, q) {
            return Err(Error::BondRegistry(format!(
                "particles {} and {} are already bonded",
                p, q
            )));
        }
        let needed = p.max(q) + 1;
        if self.bonds.len() < needed {
            self.bonds.resize_with(needed, Vec::new);
        }
        let ladder = ladder.map(Arc::new);
        self.bonds[p].push(Bond {
            partner: q,
            ladder: ladder.clone(),
        });
        self.bonds[q].push(Bond { partner: p, ladder });
        self.num_bonds += 1;
        log::debug!("added bond {}-{}", p, q);
        Ok(())
    }

    /// Remove the bond between two particles; it is an error if there is none
    pub fn remove_bond(&mut self, p: usize, q: usize) -> Result<()> {
        let missing = || Error::BondRegistry(format!("no bond between {} and {}", p, q));
        let position_p = self.position(p, q).ok_or_else(missing)?;
        let position_q = self.position(q, p).ok_or_else(missing)?;
        self.bonds[p].swap_remove(position_p);
        self.bonds[q].swap_remove(position_q);
        self.num_bonds -= 1;
        log::debug!("removed bond {}-{}", p, q);
        Ok(())
    }

    fn position(&self, p: usize, q: usize) -> Option<usize> {
        self.bonds
            .get(p)?
            .iter()
            .position(|bond| bond.partner == q)
    }

    /// Bond between two particles, if any
    pub fn bond(&self, p: usize, q: usize) -> Option<&Bond> {
        self.bonds.get(p)?.iter().find(|bond| bond.partner == q)
    }

    pub fn is_bonded(&self, p: usize, q: usize) -> bool {
        self.bond(p, q).is_some()
    }

    /// Identities of all particles bonded to `p`
    pub fn partners(&self, p: usize) -> impl Iterator<Item = usize> + '_ {
        self.bonds
            .get(p)
            .into_iter()
            .flatten()
            .map(|bond| bond.partner)
    }

    /// All bonded pairs, each listed once with the smaller identity first
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bonds.iter().enumerate().flat_map(|(p, bonds)| {
            bonds
                .iter()
                .filter(move |bond| bond.partner > p)
                .map(move |bond| (p, bond.partner))
        })
    }

    pub fn num_bonds(&self) -> usize {
        self.num_bonds
    }

    pub fn is_empty(&self) -> bool {
        self.num_bonds == 0
    }

    pub fn clear(&mut self) {
        self.bonds.clear();
        self.num_bonds = 0;
    }
}
