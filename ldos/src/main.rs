use std::path::PathBuf;
use std::time;

use anyhow::Context;
use atwfc::{BasisCache, PlaneWaveTransform, Shell, ShellBasisBuilder};
use clap::Parser;
use control::Control;
use crystal::Crystal;
use dfttypes::{EigenData, PostContext};
use dwmpi::{Communicator, Role};
use env_logger::init_from_env;
use log::{error, info};
use postproc::PostError;
use property::{DatCurveWriter, XsfGridWriter};

#[derive(Debug, Parser)]
#[command(
    name = "ldos",
    about = "Density of states and real-space charge density from projected eigenstates"
)]
struct Cli {
    #[arg(long, value_name = "path", default_value = "in.ctrl")]
    ctrl: PathBuf,

    #[arg(long, value_name = "path", default_value = "in.crystal")]
    crystal: PathBuf,

    #[arg(long, value_name = "path", default_value = "in.basis")]
    basis: PathBuf,

    #[arg(long, value_name = "path", default_value = "in.eigen")]
    eigen: PathBuf,

    /// Overrides `nworkers` of the control file; ignored under MPI.
    #[arg(long)]
    nworkers: Option<usize>,

    #[arg(long, value_name = "dir")]
    out_dir: Option<String>,

    /// dos, density or all
    #[arg(long)]
    task: Option<String>,
}

struct Inputs {
    control: Control,
    crystal: Crystal,
    shells: Vec<Shell>,
    eigen: EigenData,
}

fn read_inputs(cli: &Cli) -> anyhow::Result<Inputs> {
    let mut control = Control::read_file(&cli.ctrl)
        .with_context(|| format!("reading {}", cli.ctrl.display()))?;

    if let Some(task) = &cli.task {
        control.set_task(task)?;
    }

    if let Some(out_dir) = &cli.out_dir {
        control.set_out_dir(out_dir);
    }

    if let Some(n) = cli.nworkers {
        anyhow::ensure!(n > 0, "--nworkers must be at least 1");
        control.set_nworkers(n);
    }

    let crystal = Crystal::read_file(&cli.crystal)
        .with_context(|| format!("reading {}", cli.crystal.display()))?;

    let shells = atwfc::read_shells(&cli.basis)
        .with_context(|| format!("reading {}", cli.basis.display()))?;

    let eigen = EigenData::read_file(&cli.eigen)
        .with_context(|| format!("reading {}", cli.eigen.display()))?;

    anyhow::ensure!(
        !control.is_spin_orbit() || eigen.get_nspin() == 1,
        "spin_orbit needs a single spinor channel in {}, found {}",
        cli.eigen.display(),
        eigen.get_nspin()
    );

    std::fs::create_dir_all(control.get_out_dir())
        .with_context(|| format!("creating {}", control.get_out_dir()))?;

    Ok(Inputs {
        control,
        crystal,
        shells,
        eigen,
    })
}

fn run_worker<C: Communicator>(comm: &C, inputs: &Inputs) -> Result<(), PostError> {
    let mut ctx = PostContext::new(
        inputs.control.clone(),
        inputs.crystal.clone(),
        inputs.eigen.clone(),
    );

    if comm.is_root() {
        info!("   workers = {}", comm.size());

        ctx.get_control().display();
        ctx.get_crystal().display();
        ctx.get_eigen().display();
    }

    if ctx.get_control().run_dos() {
        postproc::run_dos(comm, &mut ctx, &DatCurveWriter::default())?;
    }

    if ctx.get_control().run_density() {
        let crystal = ctx.get_crystal();

        let builder = ShellBasisBuilder::new(inputs.shells.clone(), crystal.get_atom_species());
        let transform = PlaneWaveTransform::new(crystal, ctx.get_control().get_ecut());
        let writer = XsfGridWriter::new(crystal);

        let mut cache = BasisCache::new();

        postproc::run_density(comm, &ctx, &mut cache, &builder, &transform, &writer)?;
    }

    Ok(())
}

// The worker that failed first reports its own error, the others only see PeerFailed.
#[cfg(not(feature = "mpi"))]
fn first_failure(results: Vec<Result<(), PostError>>) -> Result<(), PostError> {
    let mut peer_failed = None;

    for r in results {
        match r {
            Ok(()) => {}
            Err(PostError::Comm(dwmpi::CommError::PeerFailed)) => {
                peer_failed.get_or_insert(PostError::Comm(dwmpi::CommError::PeerFailed));
            }
            Err(e) => return Err(e),
        }
    }

    match peer_failed {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

// The returned role decides whether this process reports the outcome.
#[cfg(not(feature = "mpi"))]
fn run(inputs: &Inputs) -> (Role, Result<(), PostError>) {
    let nworkers = inputs.control.get_nworkers();

    let result = if nworkers == 1 {
        run_worker(&dwmpi::SelfComm, inputs)
    } else {
        first_failure(dwmpi::ThreadComm::run(nworkers, |comm| run_worker(comm, inputs)))
    };

    (Role::Coordinator, result)
}

#[cfg(feature = "mpi")]
fn run(inputs: &Inputs) -> (Role, Result<(), PostError>) {
    match dwmpi::MpiComm::init() {
        Ok(comm) => (comm.role(), run_worker(&comm, inputs)),
        Err(e) => (Role::Coordinator, Err(e.into())),
    }
}

fn main() -> anyhow::Result<()> {
    let now = time::Instant::now();

    init_from_env(env_logger::Env::new().filter_or("LDOS_LOG", "info"));

    let cli = Cli::parse();

    let inputs = read_inputs(&cli)?;

    let (role, result) = run(&inputs);

    if role == Role::Coordinator {
        match &result {
            Ok(()) => info!("Time used: {:?}", now.elapsed()),
            Err(e) => error!("{}", e),
        }
    }

    Ok(result?)
}
