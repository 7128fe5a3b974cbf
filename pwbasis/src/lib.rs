use gvector::GVector;
use vector3::Vector3f64;

/// Plane waves of one k-point: the G vectors inside the |k+G| cutoff sphere,
/// ordered by |k+G|.
#[derive(Debug, Default)]
pub struct PWBasis {
    k_cart: Vector3f64, // in cartesian coordinates
    k_index: usize,     // index of this xk in all xks
    gindex: Vec<usize>, // indices of G vectors used in this set of plane wave basis
    kg: Vec<f64>,       // norms of the vectors xk+gvec
}

impl PWBasis {
    pub fn new(k_cart: Vector3f64, k_index: usize, ecut: f64, gvec: &GVector) -> PWBasis {
        let t_gindex = gvec.get_g_vector_index(ecut, k_cart);

        let gcart = gvec.get_cart();

        let t_kg: Vec<f64> = t_gindex.iter().map(|&j| (k_cart + gcart[j]).norm2()).collect();

        // sort |k+G|

        let ordered_index = utility::argsort(&t_kg);

        let gindex = ordered_index.iter().map(|&j| t_gindex[j]).collect();
        let kg = ordered_index.iter().map(|&j| t_kg[j]).collect();

        PWBasis {
            k_cart,
            k_index,
            gindex,
            kg,
        }
    }

    pub fn get_kg(&self) -> &[f64] {
        &self.kg
    }

    pub fn get_k_index(&self) -> usize {
        self.k_index
    }

    pub fn get_gindex(&self) -> &[usize] {
        &self.gindex
    }

    pub fn get_n_plane_waves(&self) -> usize {
        self.gindex.len()
    }

    /// Cartesian k+G of every plane wave.
    pub fn get_kg_cart(&self, gvec: &GVector) -> Vec<Vector3f64> {
        let gcart = gvec.get_cart();

        self.gindex.iter().map(|&j| self.k_cart + gcart[j]).collect()
    }
}
