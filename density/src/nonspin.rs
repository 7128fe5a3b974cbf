use crate::{add_collinear_channel, Density, DensityError};

use atwfc::RealSpaceOrbitalField;
use dfttypes::*;

pub struct DensityNonspin {}

impl DensityNonspin {
    pub fn new() -> DensityNonspin {
        DensityNonspin {}
    }
}

impl Default for DensityNonspin {
    fn default() -> Self {
        DensityNonspin::new()
    }
}

impl Density for DensityNonspin {
    fn add_k_point(
        &self,
        field: &RealSpaceOrbitalField,
        eigen: &EigenData,
        ik: usize,
        factor: f64,
        rho: &mut RHOR,
    ) -> Result<(), DensityError> {
        add_collinear_channel(
            field,
            eigen.get_eigvalue(0, ik),
            eigen.get_eigvector(0, ik),
            factor,
            rho.get_spin_channel_mut(0),
        )
    }
}
