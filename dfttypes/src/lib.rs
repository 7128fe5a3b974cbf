mod eigen;
pub use eigen::*;

mod context;
pub use context::*;

use matrix::*;
use ndarray::*;
use types::*;

use enum_as_inner::EnumAsInner;

/// Band energies per k-point, `[ik][ib]`, in eV relative to the Fermi level.
#[derive(Debug, Clone, EnumAsInner)]
pub enum VKEigenValue {
    NonSpin(Vec<Vec<f64>>),
    Spin(Vec<Vec<f64>>, Vec<Vec<f64>>),
}

impl VKEigenValue {
    pub fn get_nspin(&self) -> usize {
        match self {
            VKEigenValue::NonSpin(_) => 1,
            VKEigenValue::Spin(_, _) => 2,
        }
    }

    pub fn get_spin_channel(&self, ispin: SpinIndex) -> &[Vec<f64>] {
        match (self, ispin) {
            (VKEigenValue::NonSpin(v), 0) => v,
            (VKEigenValue::Spin(up, _), 0) => up,
            (VKEigenValue::Spin(_, dn), 1) => dn,
            _ => panic!("spin channel {} does not exist", ispin),
        }
    }
}

/// Eigenvector coefficients per k-point; column `ib` of the `ncomp x nbnd`
/// matrix expands band `ib` in the orbital basis.
#[derive(Debug, Clone, EnumAsInner)]
pub enum VKEigenVector {
    NonSpin(Vec<Matrix<c64>>),
    Spin(Vec<Matrix<c64>>, Vec<Matrix<c64>>),
}

impl VKEigenVector {
    pub fn get_nspin(&self) -> usize {
        match self {
            VKEigenVector::NonSpin(_) => 1,
            VKEigenVector::Spin(_, _) => 2,
        }
    }

    pub fn get_spin_channel(&self, ispin: SpinIndex) -> &[Matrix<c64>] {
        match (self, ispin) {
            (VKEigenVector::NonSpin(v), 0) => v,
            (VKEigenVector::Spin(up, _), 0) => up,
            (VKEigenVector::Spin(_, dn), 1) => dn,
            _ => panic!("spin channel {} does not exist", ispin),
        }
    }
}

/// Real-space density, one grid per spin channel.
#[derive(Debug, Clone, EnumAsInner)]
pub enum RHOR {
    NonSpin(Array3<c64>),
    Spin(Array3<c64>, Array3<c64>),
}

impl RHOR {
    /// Zero density with `nspin` (1 or 2) channels.
    pub fn new(nspin: usize, shape: [usize; 3]) -> RHOR {
        match nspin {
            1 => RHOR::NonSpin(Array3::<c64>::new(shape)),
            2 => RHOR::Spin(Array3::<c64>::new(shape), Array3::<c64>::new(shape)),
            _ => panic!("density with {} spin channels is not supported", nspin),
        }
    }

    pub fn get_nspin(&self) -> usize {
        match self {
            RHOR::NonSpin(_) => 1,
            RHOR::Spin(_, _) => 2,
        }
    }

    pub fn get_shape(&self) -> [usize; 3] {
        self.get_spin_channel(0).shape()
    }

    pub fn get_spin_channel(&self, ispin: SpinIndex) -> &Array3<c64> {
        match (self, ispin) {
            (RHOR::NonSpin(rho), 0) => rho,
            (RHOR::Spin(up, _), 0) => up,
            (RHOR::Spin(_, dn), 1) => dn,
            _ => panic!("spin channel {} does not exist", ispin),
        }
    }

    pub fn get_spin_channel_mut(&mut self, ispin: SpinIndex) -> &mut Array3<c64> {
        match (self, ispin) {
            (RHOR::NonSpin(rho), 0) => rho,
            (RHOR::Spin(up, _), 0) => up,
            (RHOR::Spin(_, dn), 1) => dn,
            (_, ispin) => panic!("spin channel {} does not exist", ispin),
        }
    }

    /// Channels in spin order, consuming the density.
    pub fn into_channels(self) -> Vec<Array3<c64>> {
        match self {
            RHOR::NonSpin(rho) => vec![rho],
            RHOR::Spin(up, dn) => vec![up, dn],
        }
    }
}

#[test]
fn test_spin_channels() {
    let vkevals = VKEigenValue::Spin(vec![vec![-1.0]], vec![vec![-2.0]]);

    assert_eq!(vkevals.get_nspin(), 2);
    assert_eq!(vkevals.get_spin_channel(1)[0][0], -2.0);

    let (up, _dn) = vkevals.as_spin().unwrap();
    assert_eq!(up[0][0], -1.0);

    let vkevecs = VKEigenVector::NonSpin(vec![Matrix::<c64>::new(2, 3)]);

    assert_eq!(vkevecs.get_nspin(), 1);
    assert_eq!(vkevecs.get_spin_channel(0)[0].ncol(), 3);
    assert!(vkevecs.as_spin().is_none());

    let mut rho = RHOR::new(2, [2, 2, 1]);
    rho.get_spin_channel_mut(1)[[1, 0, 0]] = c64::new(3.0, 0.0);

    assert_eq!(rho.get_nspin(), 2);
    assert_eq!(rho.get_shape(), [2, 2, 1]);
    assert_eq!(rho.get_spin_channel(0).sum(), c64::new(0.0, 0.0));

    let channels = rho.into_channels();
    assert_eq!(channels[1].sum(), c64::new(3.0, 0.0));
}
