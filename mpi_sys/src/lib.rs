#![allow(non_camel_case_types, non_snake_case)]
// MPICH ABI handles and the subset of the C API used by the collectives.

use std::os::raw::*;

pub type MpiComm = c_int;
pub type MpiDatatype = c_int;
pub type MpiOp = c_int;

pub const MPI_SUCCESS: c_int = 0;

pub const MPI_MAX: MpiOp = 0x58000001;
pub const MPI_MIN: MpiOp = 0x58000002;
pub const MPI_SUM: MpiOp = 0x58000003;

pub const MPI_COMM_WORLD: MpiComm = 0x44000000;

pub const MPI_INT: MpiDatatype = 0x4c000405;
pub const MPI_DOUBLE: MpiDatatype = 0x4c00080b;
pub const MPI_UNSIGNED_LONG_LONG: MpiDatatype = 0x4c000819;
pub const MPI_DOUBLE_COMPLEX: MpiDatatype = 1275072546;

#[cfg_attr(feature = "link", link(name = "mpich", kind = "dylib"))]
extern "C" {
    pub fn MPI_Init(argc: *const c_int, argv: *const c_char) -> c_int;

    pub fn MPI_Finalize() -> c_int;

    pub fn MPI_Comm_rank(comm: MpiComm, rank: *mut c_int) -> c_int;

    pub fn MPI_Comm_size(comm: MpiComm, size: *mut c_int) -> c_int;

    pub fn MPI_Barrier(comm: MpiComm) -> c_int;

    pub fn MPI_Bcast(
        buf: *mut c_void,
        count: c_int,
        datatype: MpiDatatype,
        root: c_int,
        comm: MpiComm,
    ) -> c_int;

    pub fn MPI_Reduce(
        sendbuf: *const c_void,
        recvbuf: *mut c_void,
        count: c_int,
        datatype: MpiDatatype,
        op: MpiOp,
        root: c_int,
        comm: MpiComm,
    ) -> c_int;

    pub fn MPI_Allreduce(
        sendbuf: *const c_void,
        recvbuf: *mut c_void,
        count: c_int,
        datatype: MpiDatatype,
        op: MpiOp,
        comm: MpiComm,
    ) -> c_int;
}
