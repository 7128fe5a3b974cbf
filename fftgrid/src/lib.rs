use std::fmt;

/// Real-space sampling box of the periodic cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FFTGrid {
    n1: usize,
    n2: usize,
    n3: usize,
}

impl FFTGrid {
    pub fn new(n1: usize, n2: usize, n3: usize) -> FFTGrid {
        FFTGrid { n1, n2, n3 }
    }

    pub fn get_ntotf64(&self) -> f64 {
        self.get_ntot() as f64
    }

    pub fn get_ntot(&self) -> usize {
        self.n1 * self.n2 * self.n3
    }

    pub fn get_size(&self) -> [usize; 3] {
        [self.n1, self.n2, self.n3]
    }

    pub fn is_empty(&self) -> bool {
        self.get_ntot() == 0
    }

    /// Inclusive Miller index range along each axis.
    pub fn get_miller_bounds(&self) -> [(i32, i32); 3] {
        [
            (utility::fft_left_end(self.n1), utility::fft_right_end(self.n1)),
            (utility::fft_left_end(self.n2), utility::fft_right_end(self.n2)),
            (utility::fft_left_end(self.n3), utility::fft_right_end(self.n3)),
        ]
    }
}

impl fmt::Display for FFTGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x {} x {}", self.n1, self.n2, self.n3)
    }
}
