//! Real-space electron density from occupied eigenstates.
//!
//! For every local k-point the orbital field is obtained once; each occupied
//! band is contracted with it and 2 |psi(r)|^2 volume / (nk N) is added to
//! the density of its spin channel.

mod ncl;
mod nonspin;
mod spin;

pub use ncl::*;
pub use nonspin::*;
pub use spin::*;

use atwfc::{Basis, BasisError, OrbitalTransform, RealSpaceOrbitalField};
use dfttypes::*;
use dwconsts::*;
use log::debug;
use matrix::Matrix;
use ndarray::Array3;
use types::*;

use std::ops::Range;

#[derive(Debug, thiserror::Error)]
pub enum DensityError {
    #[error("eigenvectors have {ncomp} components but the orbital field has {expected}")]
    ComponentMismatch { ncomp: usize, expected: usize },

    #[error("orbital field is on a {field:?} grid, density on {rho:?}")]
    GridMismatch { field: [usize; 3], rho: [usize; 3] },

    #[error("k-point range {start}..{end} exceeds the {nk} k-points of the eigen data")]
    KPointOutOfRange { start: usize, end: usize, nk: usize },

    #[error("density has {found} spin channels, {expected} expected")]
    SpinChannels { expected: usize, found: usize },

    #[error("{nspin} spin channels cannot be combined with spin_orbit = {spin_orbit}")]
    UnsupportedSpin { nspin: usize, spin_orbit: bool },

    #[error(transparent)]
    Basis(#[from] BasisError),
}

pub trait Density {
    /// Adds the occupied bands of k-point `ik` to `rho`.
    fn add_k_point(
        &self,
        field: &RealSpaceOrbitalField,
        eigen: &EigenData,
        ik: usize,
        factor: f64,
        rho: &mut RHOR,
    ) -> Result<(), DensityError>;
}

pub fn new(nspin: usize, spin_orbit: bool) -> Result<Box<dyn Density>, DensityError> {
    match (nspin, spin_orbit) {
        (1, false) => Ok(Box::new(DensityNonspin::new())),
        (2, false) => Ok(Box::new(DensitySpin::new())),
        (1, true) => Ok(Box::new(DensityNcl::new())),
        (nspin, spin_orbit) => Err(DensityError::UnsupportedSpin { nspin, spin_orbit }),
    }
}

/// A band is occupied when its energy is at or below the Fermi level (zero),
/// with a tolerance of OCC_EPS.
pub fn is_occupied(energy: f64) -> bool {
    energy <= 0.0 + OCC_EPS
}

/// 2 volume / (nk n1 n2 n3), the weight of |psi(r)|^2 of one occupied band.
pub fn density_factor(volume: f64, nk: usize, grid: [usize; 3]) -> f64 {
    let ntot = grid[0] * grid[1] * grid[2];

    BAND_OCCUPATION * volume / (nk as f64 * ntot as f64)
}

/// Density of the k-points in `k_range`, unreduced.
///
/// An empty range gives a zero density of the full shape.
#[allow(clippy::too_many_arguments)]
pub fn compute_partial_density<T: OrbitalTransform + ?Sized>(
    density: &dyn Density,
    transform: &T,
    basis: &Basis,
    eigen: &EigenData,
    k_range: Range<usize>,
    grid: [usize; 3],
    volume: f64,
    spin_orbit: bool,
) -> Result<RHOR, DensityError> {
    let nk = eigen.get_nk();

    if k_range.end > nk {
        return Err(DensityError::KPointOutOfRange {
            start: k_range.start,
            end: k_range.end,
            nk,
        });
    }

    let mut rho = RHOR::new(eigen.get_nspin(), grid);

    let factor = density_factor(volume, nk, grid);

    for ik in k_range {
        let field = transform.k_point_to_real_space_field(basis, eigen.get_k_frac(ik), grid, spin_orbit)?;

        if field.get_fftgrid().get_size() != grid {
            return Err(DensityError::GridMismatch {
                field: field.get_fftgrid().get_size(),
                rho: grid,
            });
        }

        density.add_k_point(&field, eigen, ik, factor, &mut rho)?;

        debug!("density: k-point {} done", ik);
    }

    Ok(rho)
}

fn check_components(evecs: &Matrix<c64>, field: &RealSpaceOrbitalField) -> Result<(), DensityError> {
    if evecs.nrow() != field.get_ncomp() {
        return Err(DensityError::ComponentMismatch {
            ncomp: evecs.nrow(),
            expected: field.get_ncomp(),
        });
    }

    Ok(())
}

// amp = sum_j coef[j] phi_{j - first}, over the components `first..first + norb`
fn band_amplitude(field: &RealSpaceOrbitalField, coef: &[c64], first: usize, amp: &mut Array3<c64>) {
    amp.set_value(ZERO_C64);

    for j in 0..field.get_norb() {
        amp.zaxpy(coef[first + j], field.get_orbital(j));
    }
}

// rho += factor |sum_j v_j phi_j|^2 for every occupied band of one spin channel
fn add_collinear_channel(
    field: &RealSpaceOrbitalField,
    evals: &[f64],
    evecs: &Matrix<c64>,
    factor: f64,
    rho: &mut Array3<c64>,
) -> Result<(), DensityError> {
    check_components(evecs, field)?;

    let mut amp = Array3::<c64>::new(rho.shape());

    for (ib, &e) in evals.iter().enumerate() {
        if !is_occupied(e) {
            continue;
        }

        band_amplitude(field, evecs.get_col(ib), 0, &mut amp);

        rho.scaled_sqr_add(&amp, factor);
    }

    Ok(())
}

#[cfg(test)]
mod tests;
