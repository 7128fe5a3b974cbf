use crate::{Basis, BasisBuilder, BasisError, BasisKind, ShellMetadata};

use log::debug;
use std::collections::{hash_map::Entry, HashMap};

/// Bases built during a run, one per kind. Entries are never invalidated.
#[derive(Debug, Default)]
pub struct BasisCache {
    entries: HashMap<BasisKind, (Basis, ShellMetadata)>,
}

impl BasisCache {
    pub fn new() -> BasisCache {
        BasisCache::default()
    }

    pub fn get(&self, kind: BasisKind) -> Option<&(Basis, ShellMetadata)> {
        self.entries.get(&kind)
    }

    /// Stores a basis computed elsewhere; an existing entry is kept.
    pub fn insert(&mut self, basis: Basis, shells: ShellMetadata) -> &(Basis, ShellMetadata) {
        self.entries.entry(basis.get_kind()).or_insert((basis, shells))
    }

    pub fn get_or_try_build<B: BasisBuilder + ?Sized>(
        &mut self,
        kind: BasisKind,
        builder: &B,
    ) -> Result<&(Basis, ShellMetadata), BasisError> {
        match self.entries.entry(kind) {
            Entry::Occupied(e) => Ok(&*e.into_mut()),
            Entry::Vacant(e) => {
                let built = builder.build(kind)?;

                debug!("built {} basis with {} orbitals", kind, built.0.get_norb());

                Ok(&*e.insert(built))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
