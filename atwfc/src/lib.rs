//! Atomic-orbital basis and its real-space representation at a k-point.
//!
//! A basis is built from per-species shells (`in.basis`), memoized per
//! [`BasisKind`], expanded in the plane waves of a k-point, Löwdin
//! orthogonalized and transformed to a real-space box.

mod shell;
pub use shell::*;

mod radial;
pub use radial::*;

mod basis;
pub use basis::*;

mod cache;
pub use cache::*;

mod pwatwfc;
pub use pwatwfc::*;

mod transform;
pub use transform::*;

use matrix::MatrixError;

use std::{fmt, str::FromStr};

/// Radial form of the basis orbitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasisKind {
    /// Slater-type r^l exp(-zeta r)
    AllElectron,
    /// Gaussian-type r^l exp(-alpha r^2)
    Pseudo,
}

impl FromStr for BasisKind {
    type Err = BasisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all_electron" => Ok(BasisKind::AllElectron),
            "pseudo" => Ok(BasisKind::Pseudo),
            _ => Err(BasisError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for BasisKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BasisKind::AllElectron => write!(f, "all_electron"),
            BasisKind::Pseudo => write!(f, "pseudo"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BasisError {
    #[error("cannot read basis file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("in.basis line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("unknown basis kind '{0}'")]
    UnknownKind(String),

    #[error("angular momentum l = {0} is not supported (max {max})", max = special::MAX_L)]
    UnsupportedL(usize),

    #[error("no shells defined for species '{0}'")]
    MissingSpecies(String),

    #[error("basis has no shells")]
    NoShells,

    #[error("orbital field was built on a {expected:?} grid, {requested:?} requested")]
    GridMismatch { expected: [usize; 3], requested: [usize; 3] },

    #[error("k-point has {npw} plane waves, fewer than the {norb} orbitals to orthogonalize")]
    TooFewPlaneWaves { npw: usize, norb: usize },

    #[error("cannot orthogonalize atomic orbitals: {0}")]
    Orthogonalization(#[from] MatrixError),
}

#[cfg(test)]
mod tests;
