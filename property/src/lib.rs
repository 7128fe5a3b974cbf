//! Output files: two-column curves and XSF volumetric grids.

use crystal::Crystal;
use dwconsts::BOHR_TO_ANG;
use log::info;
use ndarray::Array3;
use vector3::Vector3f64;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("curve has {nx} abscissae but {ny} values")]
    LengthMismatch { nx: usize, ny: usize },

    #[error("grid {0:?} has no points")]
    EmptyGrid([usize; 3]),
}

pub trait CurveWriter {
    fn write_curve(&self, path: &Path, x: &[f64], y: &[f64]) -> Result<(), PropertyError>;
}

pub trait GridWriter {
    fn write_grid(&self, path: &Path, data: &Array3<f64>) -> Result<(), PropertyError>;
}

fn create(path: &Path) -> Result<BufWriter<File>, PropertyError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| PropertyError::Io {
            path: path.display().to_string(),
            source,
        })
}

fn io_context(path: &Path) -> impl Fn(std::io::Error) -> PropertyError + '_ {
    move |source| PropertyError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// `# header` line followed by `x y` rows.
pub struct DatCurveWriter {
    header: String,
}

impl DatCurveWriter {
    pub fn new(header: &str) -> DatCurveWriter {
        DatCurveWriter {
            header: header.to_string(),
        }
    }
}

impl Default for DatCurveWriter {
    fn default() -> Self {
        DatCurveWriter::new("energy_eV dos_states_per_eV")
    }
}

impl CurveWriter for DatCurveWriter {
    fn write_curve(&self, path: &Path, x: &[f64], y: &[f64]) -> Result<(), PropertyError> {
        if x.len() != y.len() {
            return Err(PropertyError::LengthMismatch {
                nx: x.len(),
                ny: y.len(),
            });
        }

        let mut f = create(path)?;

        let write = |f: &mut BufWriter<File>| -> std::io::Result<()> {
            writeln!(f, "# {}", self.header)?;

            for (xi, yi) in x.iter().zip(y.iter()) {
                writeln!(f, "{:16.8} {:20.10E}", xi, yi)?;
            }

            f.flush()
        };

        write(&mut f).map_err(io_context(path))?;

        info!("   {} written", path.display());

        Ok(())
    }
}

/// XCrySDen structure plus a periodic `DATAGRID_3D`, lengths in Angstrom.
///
/// The general grid repeats the first plane of each direction at its end.
pub struct XsfGridWriter<'a> {
    crystal: &'a Crystal,
}

impl<'a> XsfGridWriter<'a> {
    pub fn new(crystal: &'a Crystal) -> XsfGridWriter<'a> {
        XsfGridWriter { crystal }
    }

    fn write_structure(&self, f: &mut dyn Write) -> std::io::Result<()> {
        let latt = self.crystal.get_latt();

        writeln!(f, "CRYSTAL")?;
        writeln!(f, "PRIMVEC")?;

        for v in [latt.get_vector_a(), latt.get_vector_b(), latt.get_vector_c()].iter() {
            write_ang(f, v)?;
        }

        writeln!(f, "PRIMCOORD")?;
        writeln!(f, "{:6} {:3}", self.crystal.get_n_atoms(), 1)?;

        for (sp, pos) in self
            .crystal
            .get_atom_species()
            .iter()
            .zip(self.crystal.get_atom_positions_cart().iter())
        {
            write!(f, "{:<4}", sp)?;
            write_ang(f, pos)?;
        }

        Ok(())
    }
}

fn write_ang(f: &mut dyn Write, v: &Vector3f64) -> std::io::Result<()> {
    writeln!(
        f,
        "{:16.10} {:16.10} {:16.10}",
        v.x * BOHR_TO_ANG,
        v.y * BOHR_TO_ANG,
        v.z * BOHR_TO_ANG
    )
}

impl<'a> GridWriter for XsfGridWriter<'a> {
    fn write_grid(&self, path: &Path, data: &Array3<f64>) -> Result<(), PropertyError> {
        let [n1, n2, n3] = data.shape();

        if n1 * n2 * n3 == 0 {
            return Err(PropertyError::EmptyGrid([n1, n2, n3]));
        }

        let latt = self.crystal.get_latt();

        let mut f = create(path)?;

        let write = |f: &mut BufWriter<File>| -> std::io::Result<()> {
            self.write_structure(f)?;

            writeln!(f, "BEGIN_BLOCK_DATAGRID_3D")?;
            writeln!(f, "density")?;
            writeln!(f, "BEGIN_DATAGRID_3D_density")?;
            writeln!(f, "{:6} {:6} {:6}", n1 + 1, n2 + 1, n3 + 1)?;
            write_ang(f, &Vector3f64::zeros())?;
            write_ang(f, &latt.get_vector_a())?;
            write_ang(f, &latt.get_vector_b())?;
            write_ang(f, &latt.get_vector_c())?;

            let mut count = 0;

            for k in 0..=n3 {
                for j in 0..=n2 {
                    for i in 0..=n1 {
                        write!(f, "{:16.8E}", data[[i % n1, j % n2, k % n3]])?;

                        count += 1;

                        if count % 6 == 0 {
                            writeln!(f)?;
                        }
                    }
                }
            }

            if count % 6 != 0 {
                writeln!(f)?;
            }

            writeln!(f, "END_DATAGRID_3D")?;
            writeln!(f, "END_BLOCK_DATAGRID_3D")?;

            f.flush()
        };

        write(&mut f).map_err(io_context(path))?;

        info!("   {} written", path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dwconsts::ANG_TO_BOHR;
    use lattice::Lattice;
    use std::fs;

    #[test]
    fn test_write_curve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dos_0.dat");

        DatCurveWriter::default()
            .write_curve(&path, &[-1.0, 0.0, 1.0], &[0.25, 0.5, 0.125])
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('#'));

        let row: Vec<f64> = lines[2].split_whitespace().map(|t| t.parse().unwrap()).collect();
        assert_relative_eq!(row[0], 0.0);
        assert_relative_eq!(row[1], 0.5);
    }

    #[test]
    fn test_curve_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();

        let err = DatCurveWriter::default()
            .write_curve(&dir.path().join("x.dat"), &[0.0, 1.0], &[0.0])
            .unwrap_err();

        assert!(matches!(err, PropertyError::LengthMismatch { nx: 2, ny: 1 }));
    }

    #[test]
    fn test_unwritable_path() {
        let err = DatCurveWriter::default()
            .write_curve(Path::new("/nonexistent/dir/dos_0.dat"), &[0.0], &[0.0])
            .unwrap_err();

        assert!(matches!(err, PropertyError::Io { .. }));
    }

    #[test]
    fn test_write_xsf() {
        let a = 2.0 * ANG_TO_BOHR;
        let latt = Lattice::new(&[a, 0.0, 0.0], &[0.0, a, 0.0], &[0.0, 0.0, a]);
        let crystal = Crystal::new(
            latt,
            vec!["Si".to_string()],
            vec![Vector3f64::new(0.5, 0.0, 0.0)],
        );

        let data = Array3::from_vec([2, 1, 1], vec![1.0, 2.0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("density_0.xsf");

        XsfGridWriter::new(&crystal).write_grid(&path, &data).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "CRYSTAL");

        let pos: Vec<&str> = lines[7].split_whitespace().collect();
        assert_eq!(pos[0], "Si");
        assert_relative_eq!(pos[1].parse::<f64>().unwrap(), 1.0, epsilon = 1E-8);

        let igrid = lines
            .iter()
            .position(|l| *l == "BEGIN_DATAGRID_3D_density")
            .unwrap();

        let dims: Vec<usize> = lines[igrid + 1].split_whitespace().map(|t| t.parse().unwrap()).collect();
        assert_eq!(dims, vec![3, 2, 2]);

        // 3 * 2 * 2 values, wrapped periodically along x
        let values: Vec<f64> = lines[igrid + 6..]
            .iter()
            .take_while(|l| !l.starts_with("END"))
            .flat_map(|l| l.split_whitespace().map(|t| t.parse::<f64>().unwrap()))
            .collect();

        assert_eq!(values.len(), 12);
        assert_eq!(&values[..3], &[1.0, 2.0, 1.0]);
        assert_eq!(lines.last(), Some(&"END_BLOCK_DATAGRID_3D"));
    }

    #[test]
    fn test_write_xsf_empty_grid() {
        let latt = Lattice::new(&[4.0, 0.0, 0.0], &[0.0, 4.0, 0.0], &[0.0, 0.0, 4.0]);
        let crystal = Crystal::new(latt, vec!["H".to_string()], vec![Vector3f64::zeros()]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("density_0.xsf");

        let err = XsfGridWriter::new(&crystal)
            .write_grid(&path, &Array3::<f64>::new([0, 4, 4]))
            .unwrap_err();

        assert!(matches!(err, PropertyError::EmptyGrid([0, 4, 4])));
        assert!(!path.exists());
    }
}
