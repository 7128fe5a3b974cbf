use crate::{Basis, BasisError};

use dwconsts::*;
use gvector::GVector;
use kgylm::KGYLM;
use matrix::{Dot, Matrix};
use pwbasis::PWBasis;
use rayon::prelude::*;
use types::c64;
use vector3::Vector3f64;

// (-i)^l
fn minus_i_pow(l: usize) -> c64 {
    match l % 4 {
        0 => ONE_C64,
        1 => -I_C64,
        2 => -ONE_C64,
        _ => I_C64,
    }
}

/// Atomic orbitals in the plane waves of one k-point, `npw x norb`:
///
/// phi(k+G) = 4pi/sqrt(volume) (-i)^l Y_lm(k+G) int R j_l(|k+G|r) r^2 dr exp(-i (k+G).tau)
///
/// `k_frac` and `atom_positions` are fractional.
pub fn calc_atwfc_k(
    basis: &Basis,
    atom_positions: &[Vector3f64],
    k_frac: &Vector3f64,
    pwwfc: &PWBasis,
    gvec: &GVector,
    volume: f64,
) -> Matrix<c64> {
    let npw = pwwfc.get_n_plane_waves();
    let miller = gvec.get_miller();

    let kgylm = KGYLM::new(basis.get_lmax(), &pwwfc.get_kg_cart(gvec));

    let chi_kg: Vec<Vec<f64>> = basis
        .get_radials()
        .par_iter()
        .map(|rf| rf.bessel_transform(basis.get_mesh(), pwwfc.get_kg(), volume))
        .collect();

    let sfact: Vec<Vec<c64>> = atom_positions
        .iter()
        .map(|tau| {
            pwwfc
                .get_gindex()
                .iter()
                .map(|&ig| {
                    let kg = *k_frac + miller[ig].to_f64();
                    c64::new(0.0, -TWOPI * kg.dot_product(tau)).exp()
                })
                .collect()
        })
        .collect();

    let mut atwfc = Matrix::<c64>::new(npw, basis.get_norb());

    for (iorb, orb) in basis.get_orbitals().iter().enumerate() {
        let ylm = kgylm.get_data(orb.l, orb.m);
        let chi = &chi_kg[orb.iradial];
        let sf = &sfact[orb.atom];
        let phase = minus_i_pow(orb.l);

        let col: Vec<c64> = (0..npw).map(|ig| phase * ylm[ig] * chi[ig] * sf[ig]).collect();

        atwfc.set_col(iorb, &col);
    }

    atwfc
}

/// Löwdin orthogonalization of the columns, A S^(-1/2) with S = A^H A.
pub fn ortho_atwfc_k(atwfc: &Matrix<c64>) -> Result<Matrix<c64>, BasisError> {
    if atwfc.nrow() < atwfc.ncol() {
        return Err(BasisError::TooFewPlaneWaves {
            npw: atwfc.nrow(),
            norb: atwfc.ncol(),
        });
    }

    let s_inv_sqrt = atwfc.overlap().hermitian_inv_sqrt()?;

    Ok(atwfc.dot(&s_inv_sqrt))
}
