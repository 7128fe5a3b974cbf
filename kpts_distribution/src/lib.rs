//! Block distribution of k-points over workers.
//!
//! Worker r of P owns a contiguous range; the first nkpt % P workers own one
//! k-point more than the rest. Workers beyond nkpt own an empty range.

use dwmpi::{CommError, Communicator};
use log::debug;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    #[error("cannot distribute k-points over zero workers")]
    NoWorkers,

    #[error("worker {rank} is outside a world of {nrank}")]
    RankOutOfRange { rank: usize, nrank: usize },

    #[error("workers disagree on the distribution: {0}")]
    Inconsistent(#[source] CommError),
}

/// Number of k-points each worker owns, in rank order.
pub fn get_chunk_sizes(nkpt: usize, nrank: usize) -> Result<Vec<usize>, DistributionError> {
    if nrank == 0 {
        return Err(DistributionError::NoWorkers);
    }

    let base = nkpt / nrank;
    let extra = nkpt % nrank;

    Ok((0..nrank)
        .map(|irank| if irank < extra { base + 1 } else { base })
        .collect())
}

/// Half-open k-point range of worker `rank`.
pub fn get_k_range(nkpt: usize, nrank: usize, rank: usize) -> Result<Range<usize>, DistributionError> {
    if nrank == 0 {
        return Err(DistributionError::NoWorkers);
    }

    if rank >= nrank {
        return Err(DistributionError::RankOutOfRange { rank, nrank });
    }

    let base = nkpt / nrank;
    let extra = nkpt % nrank;

    let first = rank * base + rank.min(extra);
    let len = if rank < extra { base + 1 } else { base };

    Ok(first..first + len)
}

/// Range owned by this worker, after checking that every worker agrees on
/// the world size and the number of k-points.
pub fn get_my_k_range<C: Communicator>(comm: &C, nkpt: usize) -> Result<Range<usize>, DistributionError> {
    comm.ensure_uniform(&[comm.size() as u64, nkpt as u64])
        .map_err(DistributionError::Inconsistent)?;

    let range = get_k_range(nkpt, comm.size(), comm.rank())?;

    debug!("rank {} owns k-points {:?}", comm.rank(), range);

    Ok(range)
}
