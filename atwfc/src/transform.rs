use crate::{calc_atwfc_k, ortho_atwfc_k, Basis, BasisError};

use crystal::Crystal;
use fftgrid::FFTGrid;
use gvector::GVector;
use log::debug;
use ndarray::Array3;
use pwbasis::PWBasis;
use rgtransform::RGTransform;
use types::c64;
use vector3::Vector3f64;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Orthonormal orbitals of one k-point on a real-space box.
///
/// For spinor eigenvectors the field has `2 * norb` components; component
/// `j` and `j + norb` share spatial orbital `j`.
#[derive(Debug)]
pub struct RealSpaceOrbitalField {
    fftgrid: FFTGrid,
    orbitals: Vec<Array3<c64>>,
    spinor: bool,
}

impl RealSpaceOrbitalField {
    pub fn new(fftgrid: FFTGrid, orbitals: Vec<Array3<c64>>, spinor: bool) -> RealSpaceOrbitalField {
        for orb in orbitals.iter() {
            assert_eq!(orb.shape(), fftgrid.get_size());
        }

        RealSpaceOrbitalField {
            fftgrid,
            orbitals,
            spinor,
        }
    }

    pub fn get_fftgrid(&self) -> &FFTGrid {
        &self.fftgrid
    }

    pub fn is_spinor(&self) -> bool {
        self.spinor
    }

    /// Spatial orbitals.
    pub fn get_norb(&self) -> usize {
        self.orbitals.len()
    }

    /// Eigenvector components this field can be contracted with.
    pub fn get_ncomp(&self) -> usize {
        if self.spinor {
            2 * self.orbitals.len()
        } else {
            self.orbitals.len()
        }
    }

    pub fn get_orbital(&self, icomp: usize) -> &Array3<c64> {
        &self.orbitals[icomp % self.orbitals.len()]
    }
}

pub trait OrbitalTransform {
    fn k_point_to_real_space_field(
        &self,
        basis: &Basis,
        k_frac: &Vector3f64,
        grid: [usize; 3],
        spin_orbit: bool,
    ) -> Result<RealSpaceOrbitalField, BasisError>;
}

/// Plane-wave route: k+G sphere, G-space orbitals, Löwdin, backward FFT.
///
/// The real-space orbitals are the cell-periodic parts, normalized so that
/// sum_r |u(r)|^2 volume / N = 1.
pub struct PlaneWaveTransform<'a> {
    crystal: &'a Crystal,
    ecut: f64,
    gvectors: Mutex<HashMap<[usize; 3], Arc<GVector>>>,
}

impl<'a> PlaneWaveTransform<'a> {
    /// `ecut` in Hartree.
    pub fn new(crystal: &'a Crystal, ecut: f64) -> PlaneWaveTransform<'a> {
        PlaneWaveTransform {
            crystal,
            ecut,
            gvectors: Mutex::new(HashMap::new()),
        }
    }

    fn get_gvector(&self, fftgrid: &FFTGrid) -> Arc<GVector> {
        let mut gvectors = self.gvectors.lock().unwrap_or_else(|e| e.into_inner());

        Arc::clone(
            gvectors
                .entry(fftgrid.get_size())
                .or_insert_with(|| Arc::new(GVector::new(self.crystal.get_latt(), fftgrid))),
        )
    }
}

impl<'a> OrbitalTransform for PlaneWaveTransform<'a> {
    fn k_point_to_real_space_field(
        &self,
        basis: &Basis,
        k_frac: &Vector3f64,
        grid: [usize; 3],
        spin_orbit: bool,
    ) -> Result<RealSpaceOrbitalField, BasisError> {
        let fftgrid = FFTGrid::new(grid[0], grid[1], grid[2]);
        let gvec = self.get_gvector(&fftgrid);

        let latt = self.crystal.get_latt();
        let volume = latt.volume();

        let k_cart = latt.reciprocal().frac_to_cart(k_frac);
        let pwwfc = PWBasis::new(k_cart, 0, self.ecut, &gvec);

        debug!("k = {} : {} plane waves", k_frac, pwwfc.get_n_plane_waves());

        let atwfc = calc_atwfc_k(
            basis,
            self.crystal.get_atom_positions(),
            k_frac,
            &pwwfc,
            &gvec,
            volume,
        );

        let oatwfc = ortho_atwfc_k(&atwfc)?;

        let rgtrans = RGTransform::new(&fftgrid);
        let fac = 1.0 / volume.sqrt();

        let orbitals = (0..oatwfc.ncol())
            .map(|iorb| {
                let mut fr = Array3::<c64>::new(grid);
                rgtrans.g1d_to_r3d(&gvec, pwwfc.get_gindex(), oatwfc.get_col(iorb), &mut fr);
                fr.scale(fac);
                fr
            })
            .collect();

        Ok(RealSpaceOrbitalField::new(fftgrid, orbitals, spin_orbit))
    }
}
