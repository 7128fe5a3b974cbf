//! Collective operations for a fixed group of cooperating workers.
//!
//! Every worker runs the same sequence of stages and meets the others at each
//! collective call. Results of a reduction exist only on the coordinator
//! (rank 0); broadcasts hand the coordinator's data to every worker.

mod selfcomm;
pub use selfcomm::SelfComm;

mod threadcomm;
pub use threadcomm::ThreadComm;

#[cfg(feature = "mpi")]
mod mpicomm;
#[cfg(feature = "mpi")]
pub use mpicomm::MpiComm;

use log::debug;
use std::ops::AddAssign;
use types::c64;

/// Rank of the coordinator.
pub const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Coordinator,
    Worker,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommError {
    #[error("buffer length differs across workers (min {min}, max {max})")]
    ShapeMismatch { min: usize, max: usize },

    #[error("element type differs across workers")]
    TypeMismatch,

    #[error("value #{index} differs across workers (min {min}, max {max})")]
    NotUniform { index: usize, min: u64, max: u64 },

    #[error("another worker failed before the collective")]
    PeerFailed,

    #[error("coordinator has no data to broadcast")]
    MissingRootData,

    #[error("worker synchronization state is poisoned")]
    Poisoned,

    #[error("buffer of {0} elements exceeds the MPI count limit")]
    TooLarge(usize),

    #[error("MPI call returned error code {0}")]
    Mpi(i32),
}

/// Element types that can travel through a collective.
pub trait MPIDataType: Copy + Default + Send + Sync + AddAssign + 'static {
    /// Distinct per type, compared across workers before data moves.
    const TYPE_TAG: u64;

    #[cfg(feature = "mpi")]
    fn get_mpi_data_type() -> mpi_sys::MpiDatatype;
}

impl MPIDataType for f64 {
    const TYPE_TAG: u64 = 1;

    #[cfg(feature = "mpi")]
    fn get_mpi_data_type() -> mpi_sys::MpiDatatype {
        mpi_sys::MPI_DOUBLE
    }
}

impl MPIDataType for c64 {
    const TYPE_TAG: u64 = 2;

    #[cfg(feature = "mpi")]
    fn get_mpi_data_type() -> mpi_sys::MpiDatatype {
        mpi_sys::MPI_DOUBLE_COMPLEX
    }
}

impl MPIDataType for u64 {
    const TYPE_TAG: u64 = 3;

    #[cfg(feature = "mpi")]
    fn get_mpi_data_type() -> mpi_sys::MpiDatatype {
        mpi_sys::MPI_UNSIGNED_LONG_LONG
    }
}

impl MPIDataType for i32 {
    const TYPE_TAG: u64 = 4;

    #[cfg(feature = "mpi")]
    fn get_mpi_data_type() -> mpi_sys::MpiDatatype {
        mpi_sys::MPI_INT
    }
}

/// A group of workers executing the same program.
///
/// The `*_raw` primitives assume every worker passes buffers of the same
/// length and type; the provided methods establish that collectively first
/// and fail on every worker at once when it does not hold.
pub trait Communicator: Sync {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn barrier(&self) -> Result<(), CommError>;

    /// Minimum and maximum of `value` over all workers, on every worker.
    fn allreduce_min_max(&self, value: u64) -> Result<(u64, u64), CommError>;

    /// Element-wise sum of all `local` buffers, returned on the coordinator only.
    fn reduce_sum_raw<T: MPIDataType>(&self, local: Vec<T>) -> Result<Option<Vec<T>>, CommError>;

    /// Overwrites `buf` on every worker with the coordinator's `buf`.
    fn bcast_raw<T: MPIDataType>(&self, buf: &mut [T]) -> Result<(), CommError>;

    fn role(&self) -> Role {
        if self.rank() == ROOT {
            Role::Coordinator
        } else {
            Role::Worker
        }
    }

    fn is_root(&self) -> bool {
        self.role() == Role::Coordinator
    }

    /// Succeeds only if `ok` holds on every worker.
    fn check_all_ok(&self, ok: bool) -> Result<(), CommError> {
        let (min, _) = self.allreduce_min_max(ok as u64)?;

        if min == 1 {
            Ok(())
        } else {
            Err(CommError::PeerFailed)
        }
    }

    /// Succeeds only if every worker passes the same `values`.
    fn ensure_uniform(&self, values: &[u64]) -> Result<(), CommError> {
        let (nmin, nmax) = self.allreduce_min_max(values.len() as u64)?;

        if nmin != nmax {
            return Err(CommError::ShapeMismatch {
                min: nmin as usize,
                max: nmax as usize,
            });
        }

        let mut first_err = None;

        for (index, &v) in values.iter().enumerate() {
            let (min, max) = self.allreduce_min_max(v)?;

            if min != max && first_err.is_none() {
                first_err = Some(CommError::NotUniform { index, min, max });
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Sums every worker's buffer into one buffer held by the coordinator.
    ///
    /// `local` is consumed; workers other than the coordinator get `None`.
    /// A length or type disagreement fails on all workers and nothing is summed.
    fn reduce_sum<T: MPIDataType>(&self, local: Vec<T>) -> Result<Option<Vec<T>>, CommError> {
        let (lmin, lmax) = self.allreduce_min_max(local.len() as u64)?;
        let (tmin, tmax) = self.allreduce_min_max(T::TYPE_TAG)?;

        if tmin != tmax {
            return Err(CommError::TypeMismatch);
        }

        if lmin != lmax {
            return Err(CommError::ShapeMismatch {
                min: lmin as usize,
                max: lmax as usize,
            });
        }

        debug!("rank {} reduce_sum of {} elements", self.rank(), local.len());

        self.reduce_sum_raw(local)
    }

    /// Hands the coordinator's vector to every worker.
    ///
    /// The coordinator passes `Some`; other workers' argument is ignored.
    fn bcast_vec<T: MPIDataType>(&self, data: Option<Vec<T>>) -> Result<Vec<T>, CommError> {
        const NO_DATA: u64 = u64::MAX;

        let mut len = [NO_DATA];

        if self.is_root() {
            if let Some(v) = data.as_ref() {
                len[0] = v.len() as u64;
            }
        }

        self.bcast_raw(&mut len)?;

        if len[0] == NO_DATA {
            return Err(CommError::MissingRootData);
        }

        let mut buf = match data {
            Some(v) if self.is_root() => v,
            _ => vec![T::default(); len[0] as usize],
        };

        self.bcast_raw(&mut buf)?;

        Ok(buf)
    }
}
