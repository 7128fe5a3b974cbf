use crate::{all_agree, PostError};

use atwfc::{BasisBuilder, BasisCache, BasisKind, OrbitalTransform};
use dfttypes::PostContext;
use dwmpi::Communicator;
use log::info;
use ndarray::Array3;
use property::GridWriter;
use types::c64;

use std::str::FromStr;

/// Real-space density of every spin channel, written to `density_{ispin}.xsf`.
///
/// The basis comes from `cache`, built with `builder` the first time its kind
/// is requested. The reduced grids stay on the coordinator, which also gets
/// the total charge (sum over all channels and grid points) back.
pub fn run_density<C, T>(
    comm: &C,
    ctx: &PostContext,
    cache: &mut BasisCache,
    builder: &dyn BasisBuilder,
    transform: &T,
    writer: &dyn GridWriter,
) -> Result<Option<f64>, PostError>
where
    C: Communicator,
    T: OrbitalTransform + ?Sized,
{
    let ctrl = ctx.get_control();

    let grid = ctrl.get_density_grid();
    let spin_orbit = ctrl.is_spin_orbit();

    if comm.is_root() && ctx.is_verbose() {
        info!("Writing density files");
    }

    let k_range = kpts_distribution::get_my_k_range(comm, ctx.get_nk())?;

    let local = (|| -> Result<_, PostError> {
        let kind = BasisKind::from_str(ctrl.get_basis_scheme())?;

        let (basis, _shells) = cache.get_or_try_build(kind, builder)?;

        let driver = density::new(ctx.get_nspin(), spin_orbit)?;

        let rho = density::compute_partial_density(
            driver.as_ref(),
            transform,
            basis,
            ctx.get_eigen(),
            k_range,
            grid,
            ctx.get_volume(),
            spin_orbit,
        )?;

        Ok(rho)
    })();

    let rho = all_agree(comm, local)?;

    let mut total_charge = 0.0;

    for (ispin, channel) in rho.into_channels().into_iter().enumerate() {
        // the partial grid is consumed by the reduction
        let reduced = comm.reduce_sum(channel.into_vec())?;

        let written = match reduced {
            Some(data) => {
                let rho_r = Array3::<c64>::from_vec(grid, data).real_part();

                total_charge += rho_r.sum();

                let path = ctx.get_out_file(&format!("density_{}.xsf", ispin));

                writer.write_grid(&path, &rho_r)
            }
            None => Ok(()),
        };

        all_agree(comm, written)?;
    }

    if comm.is_root() {
        if ctx.is_verbose() {
            info!("Total charge = {:.3}", total_charge);
        }

        Ok(Some(total_charge))
    } else {
        Ok(None)
    }
}
