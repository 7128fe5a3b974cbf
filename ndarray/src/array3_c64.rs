use crate::Array3;

use itertools::multizip;
use rayon::prelude::*;

use types::*;

const PARALLEL_MIN_LEN: usize = 8192;

#[inline]
fn use_parallel_for_len(len: usize) -> bool {
    len >= PARALLEL_MIN_LEN && rayon::current_num_threads() > 1
}

impl Array3<c64> {
    pub fn scale(&mut self, f: f64) {
        self.as_mut_slice().iter_mut().for_each(|x| *x *= f);
    }

    /// self += factor * rhs
    pub fn zaxpy(&mut self, factor: c64, rhs: &Array3<c64>) {
        let psrc = rhs.as_slice();
        let pdst = self.as_mut_slice();

        assert_eq!(psrc.len(), pdst.len());

        if use_parallel_for_len(pdst.len()) {
            pdst.par_iter_mut().zip(psrc.par_iter()).for_each(|(d, s)| {
                *d += factor * s;
            });
        } else {
            for (s, d) in multizip((psrc.iter(), pdst.iter_mut())) {
                *d += factor * s;
            }
        }
    }

    /// self += factor * |rhs|^2
    pub fn scaled_sqr_add(&mut self, rhs: &Array3<c64>, factor: f64) {
        let psrc = rhs.as_slice();
        let pdst = self.as_mut_slice();

        assert_eq!(psrc.len(), pdst.len());

        if use_parallel_for_len(pdst.len()) {
            pdst.par_iter_mut().zip(psrc.par_iter()).for_each(|(d, s)| {
                *d += s.norm_sqr() * factor;
            });
        } else {
            for (s, d) in multizip((psrc.iter(), pdst.iter_mut())) {
                *d += s.norm_sqr() * factor;
            }
        }
    }

    pub fn real_part(&self) -> Array3<f64> {
        self.map(|z| z.re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zaxpy_and_sqr_add() {
        let phi = Array3::from_vec([2, 1, 1], vec![c64::new(1.0, 0.0), c64::new(0.0, 2.0)]);

        let mut amp = Array3::<c64>::new([2, 1, 1]);
        amp.zaxpy(c64::new(0.0, 1.0), &phi);

        assert_eq!(amp[[0, 0, 0]], c64::new(0.0, 1.0));
        assert_eq!(amp[[1, 0, 0]], c64::new(-2.0, 0.0));

        let mut rho = Array3::<c64>::new([2, 1, 1]);
        rho.scaled_sqr_add(&amp, 2.0);

        let re = rho.real_part();
        assert_eq!(re.as_slice(), &[2.0, 8.0]);
        assert_eq!(rho[[1, 0, 0]].im, 0.0);
    }
}
