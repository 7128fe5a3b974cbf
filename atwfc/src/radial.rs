use crate::BasisKind;

// log mesh r_i = exp(XMIN + i * DX), in Bohr
const XMIN: f64 = -8.0;
const DX: f64 = 0.0125;
const RMAX: f64 = 60.0;

/// Logarithmic radial mesh and its Jacobian dr/di.
#[derive(Debug, Clone)]
pub struct RadialMesh {
    rad: Vec<f64>,
    rab: Vec<f64>,
}

impl Default for RadialMesh {
    fn default() -> Self {
        let n = ((RMAX.ln() - XMIN) / DX).ceil() as usize + 1;

        let rad: Vec<f64> = (0..n).map(|i| (XMIN + i as f64 * DX).exp()).collect();
        let rab = rad.iter().map(|r| r * DX).collect();

        RadialMesh { rad, rab }
    }
}

impl RadialMesh {
    pub fn new() -> RadialMesh {
        RadialMesh::default()
    }

    pub fn get_rad(&self) -> &[f64] {
        &self.rad
    }

    pub fn get_rab(&self) -> &[f64] {
        &self.rab
    }

    pub fn len(&self) -> usize {
        self.rad.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rad.is_empty()
    }
}

/// R(r) tabulated on a mesh, normalized to int R^2 r^2 dr = 1.
#[derive(Debug, Clone)]
pub struct RadialFunction {
    l: usize,
    values: Vec<f64>,
}

impl RadialFunction {
    pub fn new(kind: BasisKind, l: usize, exponent: f64, mesh: &RadialMesh) -> RadialFunction {
        let mut values: Vec<f64> = mesh
            .get_rad()
            .iter()
            .map(|&r| {
                let decay = match kind {
                    BasisKind::AllElectron => (-exponent * r).exp(),
                    BasisKind::Pseudo => (-exponent * r * r).exp(),
                };
                r.powi(l as i32) * decay
            })
            .collect();

        let work: Vec<f64> = values
            .iter()
            .zip(mesh.get_rad().iter())
            .map(|(v, r)| v * v * r * r)
            .collect();

        let norm = integral::simpson_rab(&work, mesh.get_rab()).sqrt();

        if norm > 0.0 {
            for v in values.iter_mut() {
                *v /= norm;
            }
        }

        RadialFunction { l, values }
    }

    pub fn get_l(&self) -> usize {
        self.l
    }

    pub fn get_values(&self) -> &[f64] {
        &self.values
    }

    /// (4pi / sqrt(volume)) int R(r) j_l(|k+G| r) r^2 dr for every |k+G| in `kg`.
    pub fn bessel_transform(&self, mesh: &RadialMesh, kg: &[f64], volume: f64) -> Vec<f64> {
        let rad = mesh.get_rad();
        let rab = mesh.get_rab();

        let prefactor = dwconsts::FOURPI / volume.sqrt();

        let mut work = vec![0.0; rad.len()];

        kg.iter()
            .map(|&q| {
                for (ir, w) in work.iter_mut().enumerate() {
                    let r = rad[ir];
                    *w = self.values[ir] * r * r * special::spherical_bessel_jn(self.l, q * r);
                }

                prefactor * integral::simpson_rab(&work, rab)
            })
            .collect()
    }
}
