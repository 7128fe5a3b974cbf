use rustfft::{Fft, FftPlanner};
use std::sync::Arc;
use types::c64;

/// Unnormalized 3-D complex FFT over a first-index-fastest box.
///
/// forward : sum_r f(r) exp(-i G.r)
/// backward: sum_G f(G) exp(+i G.r)
pub struct DWFFT3D {
    n: [usize; 3],
    plan_fwd: [Arc<dyn Fft<f64>>; 3],
    plan_bwd: [Arc<dyn Fft<f64>>; 3],
}

impl DWFFT3D {
    pub fn new(n1: usize, n2: usize, n3: usize) -> DWFFT3D {
        let mut planner = FftPlanner::<f64>::new();

        let plan_fwd = [
            planner.plan_fft_forward(n1),
            planner.plan_fft_forward(n2),
            planner.plan_fft_forward(n3),
        ];

        let plan_bwd = [
            planner.plan_fft_inverse(n1),
            planner.plan_fft_inverse(n2),
            planner.plan_fft_inverse(n3),
        ];

        DWFFT3D {
            n: [n1, n2, n3],
            plan_fwd,
            plan_bwd,
        }
    }

    pub fn get_size(&self) -> [usize; 3] {
        self.n
    }

    pub fn fft3d(&self, slice_in: &[c64], slice_out: &mut [c64]) {
        slice_out.copy_from_slice(slice_in);
        self.execute(&self.plan_fwd, slice_out);
    }

    pub fn ifft3d(&self, slice_in: &[c64], slice_out: &mut [c64]) {
        slice_out.copy_from_slice(slice_in);
        self.execute(&self.plan_bwd, slice_out);
    }

    fn execute(&self, plans: &[Arc<dyn Fft<f64>>; 3], data: &mut [c64]) {
        let [n1, n2, n3] = self.n;

        assert_eq!(data.len(), n1 * n2 * n3);

        if data.is_empty() {
            return;
        }

        // axis 0 is contiguous
        plans[0].process(data);

        // axis 1, stride n1
        let mut line = vec![c64::new(0.0, 0.0); n2.max(n3)];

        for k in 0..n3 {
            for i in 0..n1 {
                let base = i + k * n1 * n2;

                for j in 0..n2 {
                    line[j] = data[base + j * n1];
                }

                plans[1].process(&mut line[..n2]);

                for j in 0..n2 {
                    data[base + j * n1] = line[j];
                }
            }
        }

        // axis 2, stride n1 * n2
        let stride = n1 * n2;

        for base in 0..stride {
            for k in 0..n3 {
                line[k] = data[base + k * stride];
            }

            plans[2].process(&mut line[..n3]);

            for k in 0..n3 {
                data[base + k * stride] = line[k];
            }
        }
    }
}
