use dwconsts::TWOPI;
use matrix::*;
use vector3::*;

use std::fmt;

/// Three lattice vectors stored as the columns of a 3 x 3 matrix.
#[derive(Debug, Default, Clone)]
pub struct Lattice {
    data: Matrix<f64>,
}

impl Lattice {
    pub fn new(a: &[f64], b: &[f64], c: &[f64]) -> Lattice {
        let mut data = Matrix::<f64>::new(3, 3);

        data.set_col(0, a);
        data.set_col(1, b);
        data.set_col(2, c);

        Lattice { data }
    }

    // ( a x b ) . c
    pub fn volume(&self) -> f64 {
        let a = self.get_vector_a();
        let b = self.get_vector_b();
        let c = self.get_vector_c();

        a.cross_product(&b).dot_product(&c)
    }

    // ra = 2 x PI x (b x c) / volume
    // rb = 2 x PI x (c x a) / volume
    // rc = 2 x PI x (a x b) / volume
    pub fn reciprocal(&self) -> Lattice {
        let factor = TWOPI / self.volume();

        let a = self.get_vector_a();
        let b = self.get_vector_b();
        let c = self.get_vector_c();

        let blatt_a = b.cross_product(&c) * factor;
        let blatt_b = c.cross_product(&a) * factor;
        let blatt_c = a.cross_product(&b) * factor;

        Lattice::new(&blatt_a.to_vec(), &blatt_b.to_vec(), &blatt_c.to_vec())
    }

    pub fn get_vector_a(&self) -> Vector3f64 {
        Vector3f64::from_slice(self.data.get_col(0))
    }

    pub fn get_vector_b(&self) -> Vector3f64 {
        Vector3f64::from_slice(self.data.get_col(1))
    }

    pub fn get_vector_c(&self) -> Vector3f64 {
        Vector3f64::from_slice(self.data.get_col(2))
    }

    pub fn frac_to_cart(&self, pos_f: &Vector3f64) -> Vector3f64 {
        self.get_vector_a() * pos_f.x + self.get_vector_b() * pos_f.y + self.get_vector_c() * pos_f.z
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.get_vector_a())?;
        writeln!(f, "{}", self.get_vector_b())?;
        write!(f, "{}", self.get_vector_c())
    }
}
