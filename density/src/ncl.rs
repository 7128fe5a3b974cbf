use crate::{band_amplitude, check_components, is_occupied, Density, DensityError};

use atwfc::RealSpaceOrbitalField;
use dfttypes::*;
use ndarray::Array3;
use types::c64;

/// Two-component spinors: rho = 2 (|psi_up|^2 + |psi_dn|^2).
pub struct DensityNcl {}

impl DensityNcl {
    pub fn new() -> DensityNcl {
        DensityNcl {}
    }
}

impl Default for DensityNcl {
    fn default() -> Self {
        DensityNcl::new()
    }
}

impl Density for DensityNcl {
    fn add_k_point(
        &self,
        field: &RealSpaceOrbitalField,
        eigen: &EigenData,
        ik: usize,
        factor: f64,
        rho: &mut RHOR,
    ) -> Result<(), DensityError> {
        let evals = eigen.get_eigvalue(0, ik);
        let evecs = eigen.get_eigvector(0, ik);

        check_components(evecs, field)?;

        let nspin = rho.get_nspin();

        let rho = match rho.as_non_spin_mut() {
            Some(rho) => rho,
            None => return Err(DensityError::SpinChannels {
                    expected: 1,
                    found: nspin,
                }),
        };

        let norb = field.get_norb();

        let mut up = Array3::<c64>::new(rho.shape());
        let mut dn = Array3::<c64>::new(rho.shape());

        for (ib, &e) in evals.iter().enumerate() {
            if !is_occupied(e) {
                continue;
            }

            let coef = evecs.get_col(ib);

            band_amplitude(field, coef, 0, &mut up);
            band_amplitude(field, coef, norb, &mut dn);

            rho.scaled_sqr_add(&up, factor);
            rho.scaled_sqr_add(&dn, factor);
        }

        Ok(())
    }
}
