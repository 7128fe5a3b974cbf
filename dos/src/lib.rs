//! Gaussian-broadened density of states.
//!
//! Workers sum unnormalized Gaussians over their local eigenvalues; the
//! coordinator normalizes the reduced sum once.

use dwconsts::SQRT_PI;
use log::debug;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DosError {
    #[error("empty energy window: emin = {emin} is not below emax = {emax} (after clamping)")]
    DegenerateRange { emin: f64, emax: f64 },

    #[error("broadening width must be positive, got {0}")]
    InvalidWidth(f64),

    #[error("at least 2 energy points are needed, got {0}")]
    TooFewSamples(usize),

    #[error("cannot normalize a density of states without states")]
    NoStates,
}

/// Upper end of the window: the requested maximum, clamped to the trusted spectrum.
pub fn clamp_emax(emax: f64, shift: f64) -> f64 {
    emax.min(shift)
}

/// `ne` evenly spaced energies from `emin` to min(emax, shift), both ends included.
pub fn energy_grid(emin: f64, emax: f64, shift: f64, ne: usize) -> Result<Vec<f64>, DosError> {
    let emax = clamp_emax(emax, shift);

    if !(emin < emax) {
        return Err(DosError::DegenerateRange { emin, emax });
    }

    if ne < 2 {
        return Err(DosError::TooFewSamples(ne));
    }

    let de = (emax - emin) / (ne - 1) as f64;

    Ok((0..ne).map(|i| emin + i as f64 * de).collect())
}

/// sum_{k,b} exp(-((e_n - E_kb) / delta)^2) for every sample e_n.
///
/// `evals` holds the local k-points of one spin channel; an empty slice gives
/// a zero curve of the grid's length.
pub fn gaussian_partial(energies: &[f64], evals: &[Vec<f64>], delta: f64) -> Result<Vec<f64>, DosError> {
    if !(delta > 0.0) {
        return Err(DosError::InvalidWidth(delta));
    }

    let mut dos = vec![0.0; energies.len()];

    for (d, &e) in dos.iter_mut().zip(energies.iter()) {
        *d = evals
            .iter()
            .flatten()
            .map(|&ek| {
                let x = (e - ek) / delta;
                (-x * x).exp()
            })
            .sum();
    }

    debug!("dos partial over {} k-points", evals.len());

    Ok(dos)
}

/// bnd / (netot sqrt(pi) delta), netot = nk * bnd.
pub fn normalization(nbnd: usize, nk: usize, delta: f64) -> Result<f64, DosError> {
    if !(delta > 0.0) {
        return Err(DosError::InvalidWidth(delta));
    }

    let netot = nk * nbnd;

    if netot == 0 {
        return Err(DosError::NoStates);
    }

    Ok(nbnd as f64 / (netot as f64 * SQRT_PI * delta))
}

/// Applies `normalization` to a fully reduced curve. Call once, on the coordinator.
pub fn normalize(dos: &mut [f64], nbnd: usize, nk: usize, delta: f64) -> Result<(), DosError> {
    let fac = normalization(nbnd, nk, delta)?;

    dos.iter_mut().for_each(|v| *v *= fac);

    Ok(())
}
