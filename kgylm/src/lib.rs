use vector3::Vector3f64;

//
// Y_lm(k+G) for every plane wave of one k point, l = 0..=lmax
//
pub struct KGYLM {
    lmax: usize,
    data: Vec<Vec<f64>>,
}

impl KGYLM {
    pub fn new(lmax: usize, kg_cart: &[Vector3f64]) -> KGYLM {
        let mut data = Vec::with_capacity((lmax + 1) * (lmax + 1));

        for l in 0..=lmax {
            for m in -(l as i32)..=l as i32 {
                data.push(
                    kg_cart
                        .iter()
                        .map(|v| special::real_spherical_harmonics(l, m, *v))
                        .collect(),
                );
            }
        }

        KGYLM { lmax, data }
    }

    pub fn get_lmax(&self) -> usize {
        self.lmax
    }

    pub fn get_data(&self, l: usize, m: i32) -> &[f64] {
        assert!(l <= self.lmax && m.unsigned_abs() as usize <= l);

        &self.data[l * l + (m + l as i32) as usize]
    }
}
