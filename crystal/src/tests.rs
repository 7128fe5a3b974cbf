use super::*;
use approx::assert_relative_eq;

#[test]
fn test_crystal_read_file() {
    let mut d = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    d.push("src/in.crystal");

    let crystal = Crystal::read_file(&d).unwrap();

    assert_eq!(crystal.get_n_atoms(), 2);
    assert_eq!(crystal.get_unique_species(), vec!["Si".to_string()]);
    assert_eq!(crystal.get_atom_indices_of_specie(0), &[0, 1]);

    // fcc primitive cell, a^3 / 4
    let a = 5.43 * ANG_TO_BOHR;
    assert_relative_eq!(crystal.get_latt().volume(), a * a * a / 4.0, epsilon = 1E-8);
}

#[test]
fn test_crystal_species_grouping() {
    let text = "1.0 1.0 1.0\n\
                4.0 0.0 0.0\n\
                0.0 4.0 0.0\n\
                0.0 0.0 4.0\n\
                Na 0.0 0.0 0.0\n\
                Cl 0.5 0.5 0.5\n\
                Na 0.5 0.0 0.0\n";

    let crystal = Crystal::parse(text).unwrap();

    assert_eq!(crystal.get_n_unique_species(), 2);
    assert_eq!(crystal.get_atom_indices_of_specie(0), &[0, 2]);
    assert_eq!(crystal.get_atom_indices_of_specie(1), &[1]);

    let cart = crystal.get_atom_positions_cart();
    assert_relative_eq!(cart[1].x, 2.0 * ANG_TO_BOHR, epsilon = 1E-12);
}

#[test]
fn test_crystal_rejects_bad_input() {
    assert!(matches!(
        Crystal::parse("1.0 1.0 1.0\n1 0 0\n"),
        Err(CrystalError::Incomplete)
    ));

    let bad = "1 1 1\n1 0 0\n0 1 0\n0 0 1\nSi 0.0 x 0.0\n";

    match Crystal::parse(bad) {
        Err(CrystalError::Parse { line, .. }) => assert_eq!(line, 5),
        other => panic!("unexpected {:?}", other),
    }
}
