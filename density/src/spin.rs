use crate::{add_collinear_channel, Density, DensityError};

use atwfc::RealSpaceOrbitalField;
use dfttypes::*;

/// Collinear spin: up and down bands share the orbital field but fill
/// separate densities.
pub struct DensitySpin {}

impl DensitySpin {
    pub fn new() -> DensitySpin {
        DensitySpin {}
    }
}

impl Default for DensitySpin {
    fn default() -> Self {
        DensitySpin::new()
    }
}

impl Density for DensitySpin {
    fn add_k_point(
        &self,
        field: &RealSpaceOrbitalField,
        eigen: &EigenData,
        ik: usize,
        factor: f64,
        rho: &mut RHOR,
    ) -> Result<(), DensityError> {
        let nspin = rho.get_nspin();

        let (rho_up, rho_dn) = match rho.as_spin_mut() {
            Some(channels) => channels,
            None => return Err(DensityError::SpinChannels {
                    expected: 2,
                    found: nspin,
                }),
        };

        add_collinear_channel(
            field,
            eigen.get_eigvalue(0, ik),
            eigen.get_eigvector(0, ik),
            factor,
            rho_up,
        )?;

        add_collinear_channel(
            field,
            eigen.get_eigvalue(1, ik),
            eigen.get_eigvector(1, ik),
            factor,
            rho_dn,
        )
    }
}
