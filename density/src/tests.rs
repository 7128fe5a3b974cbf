use super::*;
use approx::assert_abs_diff_eq;
use atwfc::{BasisBuilder, BasisKind, PlaneWaveTransform, ShellBasisBuilder};
use crystal::Crystal;
use fftgrid::FFTGrid;
use lattice::Lattice;
use vector3::Vector3f64;

const VOLUME: f64 = 27.0;

// Orthonormal plane waves exp(2 pi i j x) / sqrt(volume), j = 0..norb.
struct PlaneWaveOrbitals {
    norb: usize,
}

impl OrbitalTransform for PlaneWaveOrbitals {
    fn k_point_to_real_space_field(
        &self,
        _basis: &Basis,
        _k_frac: &Vector3f64,
        grid: [usize; 3],
        spin_orbit: bool,
    ) -> Result<RealSpaceOrbitalField, BasisError> {
        let [n1, n2, n3] = grid;

        let orbitals = (0..self.norb)
            .map(|j| {
                let mut u = Array3::<c64>::new(grid);
                for i3 in 0..n3 {
                    for i2 in 0..n2 {
                        for i1 in 0..n1 {
                            let x = (j * i1) as f64 / n1 as f64;
                            u[[i1, i2, i3]] = c64::new(0.0, TWOPI * x).exp() / VOLUME.sqrt();
                        }
                    }
                }
                u
            })
            .collect();

        Ok(RealSpaceOrbitalField::new(FFTGrid::new(n1, n2, n3), orbitals, spin_orbit))
    }
}

fn h_basis() -> Basis {
    let latt = Lattice::new(&[3.0, 0.0, 0.0], &[0.0, 3.0, 0.0], &[0.0, 0.0, 3.0]);
    let crystal = Crystal::new(latt, vec!["H".to_string()], vec![Vector3f64::zeros()]);

    ShellBasisBuilder::new(atwfc::parse_shells("H s 1.0").unwrap(), crystal.get_atom_species())
        .build(BasisKind::Pseudo)
        .unwrap()
        .0
}

fn nonspin_eigen(nk: usize, evals: Vec<f64>, evecs: Matrix<c64>) -> EigenData {
    EigenData::new(
        vec![Vector3f64::zeros(); nk],
        VKEigenValue::NonSpin(vec![evals; nk]),
        VKEigenVector::NonSpin(vec![evecs; nk]),
    )
}

fn total_charge(rho: &RHOR) -> f64 {
    (0..rho.get_nspin())
        .map(|ispin| rho.get_spin_channel(ispin).sum().re)
        .sum()
}

#[test]
fn test_occupancy_boundary() {
    assert!(is_occupied(0.0));
    assert!(is_occupied(-1.0));
    assert!(is_occupied(OCC_EPS));
    assert!(!is_occupied(2.0 * OCC_EPS));

    // three bands, one orbital each; only the bands at 0 and -1 count
    let eigen = nonspin_eigen(1, vec![0.0, 2.0 * OCC_EPS, -1.0], Matrix::<c64>::identity(3));

    let grid = [4, 3, 2];
    let rho = compute_partial_density(
        &DensityNonspin::new(),
        &PlaneWaveOrbitals { norb: 3 },
        &h_basis(),
        &eigen,
        0..1,
        grid,
        VOLUME,
        false,
    )
    .unwrap();

    assert_abs_diff_eq!(total_charge(&rho), 4.0, epsilon = 1E-10);
}

#[test]
fn test_single_band_total_charge() {
    let mut v = Matrix::<c64>::new(2, 1);
    v[[0, 0]] = c64::new(0.6, 0.0);
    v[[1, 0]] = c64::new(0.0, 0.8);

    let eigen = nonspin_eigen(3, vec![-2.0], v);

    let density = new(1, false).unwrap();
    let grid = [6, 5, 4];

    let mut rho = RHOR::new(1, grid);

    for ik in 0..3 {
        let part = compute_partial_density(
            density.as_ref(),
            &PlaneWaveOrbitals { norb: 2 },
            &h_basis(),
            &eigen,
            ik..ik + 1,
            grid,
            VOLUME,
            false,
        )
        .unwrap();

        rho.get_spin_channel_mut(0).add_from(part.get_spin_channel(0));
    }

    assert_abs_diff_eq!(total_charge(&rho), 2.0, epsilon = 1E-10);

    for v in rho.get_spin_channel(0).as_slice() {
        assert!(v.re >= 0.0);
        assert_abs_diff_eq!(v.im, 0.0);
    }
}

#[test]
fn test_total_charge_with_atomic_orbitals() {
    let latt = Lattice::new(&[6.0, 0.0, 0.0], &[0.0, 6.0, 0.0], &[0.0, 0.0, 6.0]);
    let crystal = Crystal::new(
        latt,
        vec!["H".to_string(), "H".to_string()],
        vec![Vector3f64::new(0.0, 0.0, 0.0), Vector3f64::new(0.0, 0.0, 0.25)],
    );

    let (basis, _) = ShellBasisBuilder::new(atwfc::parse_shells("H s 1.0").unwrap(), crystal.get_atom_species())
        .build(BasisKind::Pseudo)
        .unwrap();

    let mut v = Matrix::<c64>::new(2, 2);
    v[[0, 0]] = c64::new(0.6, 0.0);
    v[[1, 0]] = c64::new(0.0, 0.8);
    v[[0, 1]] = c64::new(0.8, 0.0);
    v[[1, 1]] = c64::new(0.0, -0.6);

    let eigen = nonspin_eigen(1, vec![-0.5, 1.0], v);

    let transform = PlaneWaveTransform::new(&crystal, 10.0);
    let volume = crystal.get_latt().volume();

    let rho = compute_partial_density(
        &DensityNonspin::new(),
        &transform,
        &basis,
        &eigen,
        0..1,
        [12, 12, 12],
        volume,
        false,
    )
    .unwrap();

    assert_abs_diff_eq!(total_charge(&rho), 2.0, epsilon = 1E-8);

    for v in rho.get_spin_channel(0).as_slice() {
        assert!(v.re >= 0.0);
    }
}

#[test]
fn test_collinear_spin_channels() {
    let eigen = EigenData::new(
        vec![Vector3f64::zeros()],
        VKEigenValue::Spin(vec![vec![-1.0]], vec![vec![0.5]]),
        VKEigenVector::Spin(vec![Matrix::<c64>::identity(1)], vec![Matrix::<c64>::identity(1)]),
    );

    let density = new(2, false).unwrap();

    let rho = compute_partial_density(
        density.as_ref(),
        &PlaneWaveOrbitals { norb: 1 },
        &h_basis(),
        &eigen,
        0..1,
        [3, 3, 3],
        VOLUME,
        false,
    )
    .unwrap();

    assert_eq!(rho.get_nspin(), 2);
    assert_abs_diff_eq!(rho.get_spin_channel(0).sum().re, 2.0, epsilon = 1E-10);
    assert_abs_diff_eq!(rho.get_spin_channel(1).sum().re, 0.0);
}

#[test]
fn test_spinor_density() {
    let h = std::f64::consts::FRAC_1_SQRT_2;

    let mut v = Matrix::<c64>::new(4, 1);
    v[[0, 0]] = c64::new(h, 0.0);
    v[[3, 0]] = c64::new(0.0, h);

    let eigen = nonspin_eigen(1, vec![-0.1], v);

    let density = new(1, true).unwrap();

    let rho = compute_partial_density(
        density.as_ref(),
        &PlaneWaveOrbitals { norb: 2 },
        &h_basis(),
        &eigen,
        0..1,
        [4, 4, 4],
        VOLUME,
        true,
    )
    .unwrap();

    assert_abs_diff_eq!(total_charge(&rho), 2.0, epsilon = 1E-10);
}

#[test]
fn test_component_mismatch() {
    let eigen = nonspin_eigen(1, vec![-1.0], Matrix::<c64>::new(3, 1));

    let err = compute_partial_density(
        &DensityNonspin::new(),
        &PlaneWaveOrbitals { norb: 2 },
        &h_basis(),
        &eigen,
        0..1,
        [2, 2, 2],
        VOLUME,
        false,
    )
    .unwrap_err();

    assert!(matches!(err, DensityError::ComponentMismatch { ncomp: 3, expected: 2 }));
}

#[test]
fn test_empty_range_gives_zero_density() {
    let eigen = nonspin_eigen(2, vec![-1.0], Matrix::<c64>::identity(1));

    let rho = compute_partial_density(
        &DensityNonspin::new(),
        &PlaneWaveOrbitals { norb: 1 },
        &h_basis(),
        &eigen,
        2..2,
        [5, 4, 3],
        VOLUME,
        false,
    )
    .unwrap();

    assert_eq!(rho.get_shape(), [5, 4, 3]);
    assert!(rho.get_spin_channel(0).as_slice().iter().all(|v| *v == ZERO_C64));
}

#[test]
fn test_invalid_inputs() {
    let eigen = nonspin_eigen(2, vec![-1.0], Matrix::<c64>::identity(1));

    let err = compute_partial_density(
        &DensityNonspin::new(),
        &PlaneWaveOrbitals { norb: 1 },
        &h_basis(),
        &eigen,
        1..3,
        [2, 2, 2],
        VOLUME,
        false,
    )
    .unwrap_err();

    assert!(matches!(err, DensityError::KPointOutOfRange { nk: 2, .. }));

    assert!(matches!(
        new(2, true),
        Err(DensityError::UnsupportedSpin { nspin: 2, spin_orbit: true })
    ));
}

#[test]
fn test_density_factor() {
    assert_abs_diff_eq!(density_factor(10.0, 4, [2, 5, 1]), 2.0 * 10.0 / 40.0);
}
