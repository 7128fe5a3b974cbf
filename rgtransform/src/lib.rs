use dwconsts::ZERO_C64;
use dwfft3d::DWFFT3D;
use fftgrid::FFTGrid;
use gvector::GVector;
use ndarray::*;
use types::c64;
use vector3::Vector3i32;

use std::cell::RefCell;
use std::collections::HashMap;

struct ThreadWorkspace {
    pfft: DWFFT3D,
    fft_work: Array3<c64>,
}

thread_local! {
    static THREAD_WORKSPACE: RefCell<HashMap<[usize; 3], ThreadWorkspace>> = RefCell::new(HashMap::new());
}

/// Moves coefficients on a G sphere to and from the real-space box.
pub struct RGTransform {
    fftmesh: [usize; 3],
}

impl RGTransform {
    pub fn new(fftgrid: &FFTGrid) -> RGTransform {
        RGTransform {
            fftmesh: fftgrid.get_size(),
        }
    }

    fn with_workspace<R>(&self, f: impl FnOnce(&DWFFT3D, &mut Array3<c64>) -> R) -> R {
        THREAD_WORKSPACE.with(|workspaces| {
            let mut workspaces = workspaces.borrow_mut();

            let workspace = workspaces
                .entry(self.fftmesh)
                .or_insert_with(|| ThreadWorkspace {
                    pfft: DWFFT3D::new(self.fftmesh[0], self.fftmesh[1], self.fftmesh[2]),
                    fft_work: Array3::<c64>::new(self.fftmesh),
                });

            f(&workspace.pfft, &mut workspace.fft_work)
        })
    }

    /// f(r) = sum_G f(G) exp(i G.r) on the box points, f(G) given on `gindex`.
    pub fn g1d_to_r3d(&self, gvec: &GVector, gindex: &[usize], fg_1d: &[c64], fr_3d: &mut Array3<c64>) {
        assert_eq!(fr_3d.shape(), self.fftmesh);

        self.with_workspace(|pfft, fft_work| {
            map_1d_to_3d(gvec.get_miller(), gindex, fg_1d, fft_work);

            pfft.ifft3d(fft_work.as_slice(), fr_3d.as_mut_slice());
        });
    }
}

/// Scatters sphere coefficients into an FFT box; everything else is zeroed.
pub fn map_1d_to_3d(miller: &[Vector3i32], gindex: &[usize], v1d: &[c64], v3d: &mut Array3<c64>) {
    assert_eq!(gindex.len(), v1d.len());

    let [n1, n2, n3] = v3d.shape();

    v3d.set_value(ZERO_C64);

    for (v, &ig) in v1d.iter().zip(gindex.iter()) {
        let mi = miller[ig];

        let idx0 = utility::fft_i2n(mi.x, n1);
        let idx1 = utility::fft_i2n(mi.y, n2);
        let idx2 = utility::fft_i2n(mi.z, n3);

        v3d[[idx0, idx1, idx2]] = *v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use lattice::Lattice;

    #[test]
    fn test_g1d_to_r3d_parseval() {
        let latt = Lattice::new(&[5.0, 0.0, 0.0], &[0.0, 5.0, 0.0], &[0.0, 0.0, 5.0]);
        let grid = FFTGrid::new(6, 6, 6);
        let gvec = GVector::new(&latt, &grid);

        let gindex: Vec<usize> = (0..7).collect();
        let coef: Vec<c64> = (0..7).map(|i| c64::new(1.0 / (i + 1) as f64, 0.3)).collect();

        let rgtrans = RGTransform::new(&grid);
        let mut fr = Array3::<c64>::new(grid.get_size());

        rgtrans.g1d_to_r3d(&gvec, &gindex, &coef, &mut fr);

        // sum_r |f(r)|^2 = N sum_G |f(G)|^2
        let lhs: f64 = fr.as_slice().iter().map(|z| z.norm_sqr()).sum();
        let rhs: f64 = coef.iter().map(|z| z.norm_sqr()).sum::<f64>() * grid.get_ntotf64();

        assert_abs_diff_eq!(lhs, rhs, epsilon = 1E-10);

        // G = 0 term is the box average
        let avg = fr.sum() / grid.get_ntotf64();
        assert_abs_diff_eq!(avg, coef[0], epsilon = 1E-12);
    }
}
