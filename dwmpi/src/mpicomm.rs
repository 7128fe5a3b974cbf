use crate::{CommError, Communicator, MPIDataType, ROOT};

use mpi_sys::*;
use std::os::raw::{c_int, c_void};
use std::ptr;

fn check(code: c_int) -> Result<(), CommError> {
    if code == MPI_SUCCESS {
        Ok(())
    } else {
        Err(CommError::Mpi(code))
    }
}

fn count(n: usize) -> Result<c_int, CommError> {
    if n > c_int::MAX as usize {
        Err(CommError::TooLarge(n))
    } else {
        Ok(n as c_int)
    }
}

/// MPI_COMM_WORLD. Initializes MPI on creation and finalizes it on drop, so
/// create exactly one per process.
pub struct MpiComm {
    comm: mpi_sys::MpiComm,
    rank: usize,
    size: usize,
}

impl MpiComm {
    pub fn init() -> Result<MpiComm, CommError> {
        let mut rank = 0;
        let mut size = 0;

        unsafe {
            check(MPI_Init(ptr::null(), ptr::null()))?;
            check(MPI_Comm_rank(MPI_COMM_WORLD, &mut rank))?;
            check(MPI_Comm_size(MPI_COMM_WORLD, &mut size))?;
        }

        Ok(MpiComm {
            comm: MPI_COMM_WORLD,
            rank: rank as usize,
            size: size as usize,
        })
    }

    fn allreduce_u64(&self, value: u64, op: MpiOp) -> Result<u64, CommError> {
        let mut out = 0u64;

        unsafe {
            check(MPI_Allreduce(
                &value as *const u64 as *const c_void,
                &mut out as *mut u64 as *mut c_void,
                1,
                u64::get_mpi_data_type(),
                op,
                self.comm,
            ))?;
        }

        Ok(out)
    }
}

impl Drop for MpiComm {
    fn drop(&mut self) {
        unsafe {
            MPI_Finalize();
        }
    }
}

impl Communicator for MpiComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) -> Result<(), CommError> {
        unsafe { check(MPI_Barrier(self.comm)) }
    }

    fn allreduce_min_max(&self, value: u64) -> Result<(u64, u64), CommError> {
        let min = self.allreduce_u64(value, MPI_MIN)?;
        let max = self.allreduce_u64(value, MPI_MAX)?;

        Ok((min, max))
    }

    fn reduce_sum_raw<T: MPIDataType>(&self, local: Vec<T>) -> Result<Option<Vec<T>>, CommError> {
        let n = count(local.len())?;

        let is_root = self.rank == ROOT;

        let mut out: Vec<T> = if is_root {
            vec![T::default(); local.len()]
        } else {
            Vec::new()
        };

        let recvbuf = if is_root {
            out.as_mut_ptr() as *mut c_void
        } else {
            ptr::null_mut()
        };

        unsafe {
            check(MPI_Reduce(
                local.as_ptr() as *const c_void,
                recvbuf,
                n,
                T::get_mpi_data_type(),
                MPI_SUM,
                ROOT as c_int,
                self.comm,
            ))?;
        }

        drop(local);

        Ok(if is_root { Some(out) } else { None })
    }

    fn bcast_raw<T: MPIDataType>(&self, buf: &mut [T]) -> Result<(), CommError> {
        let n = count(buf.len())?;

        unsafe {
            check(MPI_Bcast(
                buf.as_mut_ptr() as *mut c_void,
                n,
                T::get_mpi_data_type(),
                ROOT as c_int,
                self.comm,
            ))
        }
    }
}
