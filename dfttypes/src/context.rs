use crate::EigenData;

use control::Control;
use crystal::Crystal;

use std::path::{Path, PathBuf};

/// A normalized density-of-states curve for one spin channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DosCurve {
    pub energies: Vec<f64>,
    pub values: Vec<f64>,
}

/// Everything a post-processing stage reads, passed explicitly to each stage.
///
/// The inputs are read-only for the whole run. The published DOS curves are
/// written once by the DOS publisher, after which every worker holds the same
/// copy.
#[derive(Debug)]
pub struct PostContext {
    control: Control,
    crystal: Crystal,
    eigen: EigenData,
    dos_curves: Option<Vec<DosCurve>>,
}

impl PostContext {
    pub fn new(control: Control, crystal: Crystal, eigen: EigenData) -> PostContext {
        PostContext {
            control,
            crystal,
            eigen,
            dos_curves: None,
        }
    }

    pub fn get_control(&self) -> &Control {
        &self.control
    }

    pub fn get_crystal(&self) -> &Crystal {
        &self.crystal
    }

    pub fn get_eigen(&self) -> &EigenData {
        &self.eigen
    }

    pub fn get_nspin(&self) -> usize {
        self.eigen.get_nspin()
    }

    pub fn get_nbnd(&self) -> usize {
        self.eigen.get_nbnd()
    }

    pub fn get_nk(&self) -> usize {
        self.eigen.get_nk()
    }

    pub fn is_verbose(&self) -> bool {
        self.control.is_verbose()
    }

    /// Cell volume in Bohr^3.
    pub fn get_volume(&self) -> f64 {
        self.crystal.get_latt().volume()
    }

    pub fn get_out_dir(&self) -> &Path {
        Path::new(self.control.get_out_dir())
    }

    pub fn get_out_file(&self, name: &str) -> PathBuf {
        self.get_out_dir().join(name)
    }

    /// Trusted-spectrum cutoff, eV.
    pub fn get_shift(&self) -> f64 {
        self.control.get_shift()
    }

    pub fn get_dos_curves(&self) -> Option<&[DosCurve]> {
        self.dos_curves.as_deref()
    }

    pub fn set_dos_curves(&mut self, curves: Vec<DosCurve>) {
        self.dos_curves = Some(curves);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VKEigenValue, VKEigenVector};
    use approx::assert_relative_eq;
    use lattice::Lattice;
    use matrix::Matrix;
    use types::c64;
    use vector3::Vector3f64;

    #[test]
    fn test_context_fields() {
        let latt = Lattice::new(&[2.0, 0.0, 0.0], &[0.0, 3.0, 0.0], &[0.0, 0.0, 4.0]);
        let crystal = Crystal::new(latt, vec!["H".to_string()], vec![Vector3f64::zeros()]);

        let eigen = EigenData::new(
            vec![Vector3f64::zeros(); 3],
            VKEigenValue::NonSpin(vec![vec![-1.0, 1.0]; 3]),
            VKEigenVector::NonSpin(vec![Matrix::<c64>::new(1, 2); 3]),
        );

        let mut ctrl = Control::new();
        ctrl.set_out_dir("/tmp/run");

        let mut ctx = PostContext::new(ctrl, crystal, eigen);

        assert_eq!(ctx.get_nk(), 3);
        assert_eq!(ctx.get_nbnd(), 2);
        assert_eq!(ctx.get_nspin(), 1);
        assert_relative_eq!(ctx.get_volume(), 24.0, epsilon = 1E-12);
        assert_eq!(ctx.get_out_file("dos_0.dat"), PathBuf::from("/tmp/run/dos_0.dat"));
        assert!(ctx.get_dos_curves().is_none());

        ctx.set_dos_curves(vec![DosCurve {
            energies: vec![0.0, 1.0],
            values: vec![0.5, 0.25],
        }]);

        assert_eq!(ctx.get_dos_curves().unwrap()[0].values, vec![0.5, 0.25]);
    }
}
