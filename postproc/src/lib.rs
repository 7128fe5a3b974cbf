//! Distributed post-processing stages.
//!
//! Every worker runs each stage in the same order: partition the k-points,
//! accumulate locally, agree that every worker succeeded, reduce onto the
//! coordinator, publish. Only the coordinator writes files and reports.

mod dosstage;
pub use dosstage::*;

mod densitystage;
pub use densitystage::*;

use atwfc::BasisError;
use density::DensityError;
use dos::DosError;
use dwmpi::{CommError, Communicator};
use kpts_distribution::DistributionError;
use property::PropertyError;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("k-point partition: {0}")]
    Distribution(#[from] DistributionError),

    #[error("collective operation: {0}")]
    Comm(#[from] CommError),

    #[error("density of states: {0}")]
    Dos(#[from] DosError),

    #[error("density: {0}")]
    Density(#[from] DensityError),

    #[error("basis: {0}")]
    Basis(#[from] BasisError),

    #[error("output: {0}")]
    Property(#[from] PropertyError),
}

/// Passes `local` through only if it succeeded on every worker.
///
/// A worker that failed gets its own error back, the others get
/// `CommError::PeerFailed`.
pub fn all_agree<C, T, E>(comm: &C, local: Result<T, E>) -> Result<T, PostError>
where
    C: Communicator,
    E: Into<PostError>,
{
    let agreed = comm.check_all_ok(local.is_ok());

    match (local, agreed) {
        (Err(e), _) => Err(e.into()),
        (Ok(_), Err(e)) => Err(e.into()),
        (Ok(v), Ok(())) => Ok(v),
    }
}
