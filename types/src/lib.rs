pub use num_complex::Complex64 as c64;

/// Spin channel index used to key per-spin tables and output files.
pub type SpinIndex = usize;
