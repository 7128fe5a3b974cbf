use crate::{BasisError, BasisKind, RadialFunction, RadialMesh, Shell, ShellMetadata};

use log::debug;
use std::collections::HashMap;

/// One basis function: a radial function on an atom times a real Y_lm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomicOrbital {
    pub atom: usize,
    pub l: usize,
    pub m: i32,
    pub iradial: usize,
}

#[derive(Debug, Clone)]
pub struct Basis {
    kind: BasisKind,
    mesh: RadialMesh,
    radials: Vec<RadialFunction>,
    orbitals: Vec<AtomicOrbital>,
}

impl Basis {
    pub fn get_kind(&self) -> BasisKind {
        self.kind
    }

    pub fn get_mesh(&self) -> &RadialMesh {
        &self.mesh
    }

    pub fn get_radials(&self) -> &[RadialFunction] {
        &self.radials
    }

    pub fn get_orbitals(&self) -> &[AtomicOrbital] {
        &self.orbitals
    }

    pub fn get_norb(&self) -> usize {
        self.orbitals.len()
    }

    pub fn get_lmax(&self) -> usize {
        self.orbitals.iter().map(|o| o.l).max().unwrap_or(0)
    }
}

pub trait BasisBuilder {
    fn build(&self, kind: BasisKind) -> Result<(Basis, ShellMetadata), BasisError>;
}

/// Places the shells of each species on every atom of that species.
#[derive(Debug, Clone)]
pub struct ShellBasisBuilder {
    shells: Vec<Shell>,
    atom_species: Vec<String>,
}

impl ShellBasisBuilder {
    pub fn new(shells: Vec<Shell>, atom_species: &[String]) -> ShellBasisBuilder {
        ShellBasisBuilder {
            shells,
            atom_species: atom_species.to_vec(),
        }
    }
}

impl BasisBuilder for ShellBasisBuilder {
    fn build(&self, kind: BasisKind) -> Result<(Basis, ShellMetadata), BasisError> {
        if self.shells.is_empty() {
            return Err(BasisError::NoShells);
        }

        let mesh = RadialMesh::new();

        let mut radials = Vec::new();
        let mut orbitals = Vec::new();
        let mut metadata = Vec::with_capacity(self.atom_species.len());

        // one radial function per shell, shared by all atoms of the species
        let mut radial_index: HashMap<usize, usize> = HashMap::new();

        for (iat, species) in self.atom_species.iter().enumerate() {
            let mut atom_shells = Vec::new();

            for (ishell, shell) in self.shells.iter().enumerate() {
                if &shell.species != species {
                    continue;
                }

                if shell.l > special::MAX_L {
                    return Err(BasisError::UnsupportedL(shell.l));
                }

                let iradial = *radial_index.entry(ishell).or_insert_with(|| {
                    radials.push(RadialFunction::new(kind, shell.l, shell.exponent, &mesh));
                    radials.len() - 1
                });

                let l = shell.l;

                for m in -(l as i32)..=l as i32 {
                    orbitals.push(AtomicOrbital {
                        atom: iat,
                        l,
                        m,
                        iradial,
                    });
                }

                atom_shells.push(l);
            }

            if atom_shells.is_empty() {
                return Err(BasisError::MissingSpecies(species.clone()));
            }

            metadata.push(atom_shells);
        }

        debug!(
            "{} basis: {} radial functions, {} orbitals",
            kind,
            radials.len(),
            orbitals.len()
        );

        let basis = Basis {
            kind,
            mesh,
            radials,
            orbitals,
        };

        Ok((basis, ShellMetadata::new(metadata)))
    }
}
