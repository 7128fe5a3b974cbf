use super::*;
use approx::assert_abs_diff_eq;
use crystal::Crystal;
use lattice::Lattice;
use matrix::Matrix;
use std::cell::Cell;
use types::c64;
use vector3::Vector3f64;

fn h2_crystal() -> Crystal {
    let latt = Lattice::new(&[6.0, 0.0, 0.0], &[0.0, 6.0, 0.0], &[0.0, 0.0, 6.0]);

    Crystal::new(
        latt,
        vec!["H".to_string(), "H".to_string()],
        vec![Vector3f64::new(0.0, 0.0, 0.0), Vector3f64::new(0.2, 0.0, 0.0)],
    )
}

#[test]
fn test_parse_shells() {
    let shells = parse_shells("Si s 1.2\n  # valence\nSi P 0.8  # p shell\nO 2 1.5\n").unwrap();

    assert_eq!(shells.len(), 3);
    assert_eq!(shells[1].l, 1);
    assert_eq!(shells[2].species, "O");
    assert_eq!(shells[2].l, 2);
    assert_eq!(shells[2].exponent, 1.5);
}

#[test]
fn test_malformed_shells() {
    assert!(matches!(
        parse_shells("Si s"),
        Err(BasisError::Parse { line: 1, .. })
    ));
    assert!(matches!(
        parse_shells("Si x 1.0"),
        Err(BasisError::Parse { line: 1, .. })
    ));
    assert!(matches!(
        parse_shells("Si s 1.0\nSi p -0.5"),
        Err(BasisError::Parse { line: 2, .. })
    ));
    assert!(matches!(
        parse_shells("Si g 1.0"),
        Err(BasisError::Parse { .. })
    ));
    assert!(matches!(
        parse_shells("Si 4 1.0"),
        Err(BasisError::UnsupportedL(4))
    ));
    assert!(matches!(
        read_shells("/nonexistent/in.basis"),
        Err(BasisError::Io { .. })
    ));
}

#[test]
fn test_basis_kind_from_str() {
    assert_eq!("pseudo".parse::<BasisKind>().unwrap(), BasisKind::Pseudo);
    assert_eq!("All_Electron".parse::<BasisKind>().unwrap(), BasisKind::AllElectron);
    assert!("paw".parse::<BasisKind>().is_err());
}

#[test]
fn test_radial_normalization() {
    let mesh = RadialMesh::new();

    for kind in [BasisKind::Pseudo, BasisKind::AllElectron].iter() {
        for l in 0..=3 {
            let rf = RadialFunction::new(*kind, l, 1.3, &mesh);
            assert_eq!(rf.get_l(), l);

            let work: Vec<f64> = rf
                .get_values()
                .iter()
                .zip(mesh.get_rad().iter())
                .map(|(v, r)| v * v * r * r)
                .collect();

            assert_abs_diff_eq!(integral::simpson_rab(&work, mesh.get_rab()), 1.0, epsilon = 1E-10);
        }
    }
}

#[test]
fn test_builder_layout() {
    let crystal = h2_crystal();
    let shells = parse_shells("H s 1.0\nH p 0.7").unwrap();

    let builder = ShellBasisBuilder::new(shells, crystal.get_atom_species());
    let (basis, meta) = builder.build(BasisKind::Pseudo).unwrap();

    assert_eq!(basis.get_kind(), BasisKind::Pseudo);
    assert_eq!(basis.get_norb(), 8);
    assert_eq!(basis.get_radials().len(), 2);
    assert_eq!(basis.get_lmax(), 1);

    assert_eq!(meta.get_n_atoms(), 2);
    assert_eq!(meta.get_shells_of_atom(1), &[0, 1]);
    assert_eq!(meta.get_norb(), 8);

    let orb = basis.get_orbitals()[5];
    assert_eq!((orb.atom, orb.l, orb.m), (1, 1, -1));
}

#[test]
fn test_builder_errors() {
    let crystal = h2_crystal();

    let builder = ShellBasisBuilder::new(parse_shells("He s 1.0").unwrap(), crystal.get_atom_species());
    assert!(matches!(
        builder.build(BasisKind::AllElectron),
        Err(BasisError::MissingSpecies(ref s)) if s == "H"
    ));

    let builder = ShellBasisBuilder::new(Vec::new(), crystal.get_atom_species());
    assert!(matches!(builder.build(BasisKind::Pseudo), Err(BasisError::NoShells)));
}

struct CountingBuilder {
    inner: ShellBasisBuilder,
    nbuild: Cell<usize>,
}

impl BasisBuilder for CountingBuilder {
    fn build(&self, kind: BasisKind) -> Result<(Basis, ShellMetadata), BasisError> {
        self.nbuild.set(self.nbuild.get() + 1);
        self.inner.build(kind)
    }
}

#[test]
fn test_cache_builds_once_per_kind() {
    let crystal = h2_crystal();

    let builder = CountingBuilder {
        inner: ShellBasisBuilder::new(parse_shells("H s 1.0").unwrap(), crystal.get_atom_species()),
        nbuild: Cell::new(0),
    };

    let mut cache = BasisCache::new();
    assert!(cache.is_empty());

    let norb = cache.get_or_try_build(BasisKind::Pseudo, &builder).unwrap().0.get_norb();
    assert_eq!(norb, 2);

    cache.get_or_try_build(BasisKind::Pseudo, &builder).unwrap();
    assert_eq!(builder.nbuild.get(), 1);

    cache.get_or_try_build(BasisKind::AllElectron, &builder).unwrap();
    assert_eq!(builder.nbuild.get(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_cache_accepts_precomputed_basis() {
    let crystal = h2_crystal();
    let shells = parse_shells("H s 1.0\nH s 0.3").unwrap();

    let (basis, meta) = ShellBasisBuilder::new(shells, crystal.get_atom_species())
        .build(BasisKind::AllElectron)
        .unwrap();

    let mut cache = BasisCache::new();
    cache.insert(basis, meta);

    let failing = ShellBasisBuilder::new(Vec::new(), crystal.get_atom_species());

    let (basis, _) = cache.get_or_try_build(BasisKind::AllElectron, &failing).unwrap();
    assert_eq!(basis.get_norb(), 4);

    assert!(cache.get_or_try_build(BasisKind::Pseudo, &failing).is_err());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_lowdin_orthonormality() {
    let (npw, norb) = (7, 3);

    let data: Vec<c64> = (0..npw * norb)
        .map(|i| {
            let x = i as f64;
            c64::new((0.7 * x).sin() + 1.0, (1.3 * x).cos())
        })
        .collect();

    let a = Matrix::from_col_vec(npw, norb, data);
    let oa = ortho_atwfc_k(&a).unwrap();

    let s = oa.overlap();

    for i in 0..norb {
        for j in 0..norb {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(s[[i, j]], c64::new(expected, 0.0), epsilon = 1E-10);
        }
    }

    let wide = Matrix::<c64>::new(2, 3);
    assert!(matches!(
        ortho_atwfc_k(&wide),
        Err(BasisError::TooFewPlaneWaves { npw: 2, norb: 3 })
    ));
}

#[test]
fn test_real_space_field_is_orthonormal() {
    let crystal = h2_crystal();
    let shells = parse_shells("H s 1.0\nH p 0.8").unwrap();

    let (basis, _) = ShellBasisBuilder::new(shells, crystal.get_atom_species())
        .build(BasisKind::Pseudo)
        .unwrap();

    let transform = PlaneWaveTransform::new(&crystal, 10.0);

    let grid = [12, 12, 12];
    let k_frac = Vector3f64::new(0.25, 0.0, 0.0);

    let field = transform
        .k_point_to_real_space_field(&basis, &k_frac, grid, false)
        .unwrap();

    assert_eq!(field.get_norb(), basis.get_norb());
    assert_eq!(field.get_ncomp(), basis.get_norb());

    let dv = crystal.get_latt().volume() / 1728.0;

    for i in 0..field.get_norb() {
        for j in 0..field.get_norb() {
            let s: c64 = field
                .get_orbital(i)
                .as_slice()
                .iter()
                .zip(field.get_orbital(j).as_slice().iter())
                .map(|(a, b)| a.conj() * b)
                .sum::<c64>()
                * dv;

            let expected = if i == j { 1.0 } else { 0.0 };
            assert_abs_diff_eq!(s, c64::new(expected, 0.0), epsilon = 1E-8);
        }
    }
}

#[test]
fn test_spinor_field_components() {
    let crystal = h2_crystal();

    let (basis, _) = ShellBasisBuilder::new(parse_shells("H s 1.0").unwrap(), crystal.get_atom_species())
        .build(BasisKind::AllElectron)
        .unwrap();

    let transform = PlaneWaveTransform::new(&crystal, 8.0);

    let field = transform
        .k_point_to_real_space_field(&basis, &Vector3f64::zeros(), [10, 10, 10], true)
        .unwrap();

    assert!(field.is_spinor());
    assert_eq!(field.get_norb(), 2);
    assert_eq!(field.get_ncomp(), 4);
    assert_eq!(field.get_orbital(3).as_slice(), field.get_orbital(1).as_slice());
}
