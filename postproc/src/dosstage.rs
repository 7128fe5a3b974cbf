use crate::{all_agree, PostError};

use dfttypes::{DosCurve, PostContext};
use dwmpi::Communicator;
use log::info;
use property::CurveWriter;

/// Gaussian-broadened DOS of every spin channel.
///
/// Each channel is reduced onto the coordinator, normalized there once,
/// written to `dos_{ispin}.dat` and broadcast, so that every worker ends with
/// the same curves in `ctx`.
pub fn run_dos<C: Communicator>(
    comm: &C,
    ctx: &mut PostContext,
    writer: &dyn CurveWriter,
) -> Result<(), PostError> {
    let ctrl = ctx.get_control();

    let emin = ctrl.get_dos_emin();
    let emax = ctrl.get_dos_emax();
    let ne = ctrl.get_dos_ne();
    let delta = ctrl.get_dos_delta();

    if comm.is_root() && ctx.is_verbose() {
        info!("Writing DoS files");
    }

    let k_range = kpts_distribution::get_my_k_range(comm, ctx.get_nk())?;

    let local = dos::energy_grid(emin, emax, ctx.get_shift(), ne).and_then(|energies| {
        let evals = ctx.get_eigen().get_eigvalues();

        let partials = (0..ctx.get_nspin())
            .map(|ispin| {
                let my_evals = &evals.get_spin_channel(ispin)[k_range.clone()];
                dos::gaussian_partial(&energies, my_evals, delta)
            })
            .collect::<Result<Vec<Vec<f64>>, _>>()?;

        Ok((energies, partials))
    });

    let (energies, partials) = all_agree(comm, local)?;

    let mut curves = Vec::with_capacity(partials.len());

    for (ispin, partial) in partials.into_iter().enumerate() {
        let reduced = comm.reduce_sum(partial)?;

        // coordinator only
        let published = match reduced {
            Some(mut values) => {
                let written = dos::normalize(&mut values, ctx.get_nbnd(), ctx.get_nk(), delta)
                    .map_err(PostError::from)
                    .and_then(|_| {
                        let path = ctx.get_out_file(&format!("dos_{}.dat", ispin));
                        writer
                            .write_curve(&path, &energies, &values)
                            .map_err(PostError::from)
                    });

                written.map(|_| Some(values))
            }
            None => Ok(None),
        };

        let published = all_agree(comm, published)?;

        let values = comm.bcast_vec(published)?;

        curves.push(DosCurve {
            energies: energies.clone(),
            values,
        });
    }

    ctx.set_dos_curves(curves);

    Ok(())
}
