use crate::{VKEigenValue, VKEigenVector};

use log::info;
use matrix::Matrix;
use types::c64;
use vector3::Vector3f64;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::SplitWhitespace,
};

#[derive(Debug, thiserror::Error)]
pub enum EigenError {
    #[error("cannot read eigen file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("in.eigen line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("in.eigen: unexpected end of file, {0}")]
    Truncated(String),

    #[error("in.eigen: nspin must be 1 or 2, got {0}")]
    InvalidSpin(usize),
}

/// Eigenvalues and eigenvectors of every k-point, as produced by the solver.
#[derive(Debug, Clone)]
pub struct EigenData {
    nbnd: usize,
    ncomp: usize,
    k_frac: Vec<Vector3f64>,
    vkevals: VKEigenValue,
    vkevecs: VKEigenVector,
}

impl EigenData {
    pub fn new(k_frac: Vec<Vector3f64>, vkevals: VKEigenValue, vkevecs: VKEigenVector) -> EigenData {
        assert_eq!(vkevals.get_nspin(), vkevecs.get_nspin());

        let nk = k_frac.len();

        let mut nbnd = 0;
        let mut ncomp = 0;

        for ispin in 0..vkevals.get_nspin() {
            let evals = vkevals.get_spin_channel(ispin);
            let evecs = vkevecs.get_spin_channel(ispin);

            assert_eq!(evals.len(), nk);
            assert_eq!(evecs.len(), nk);

            if let (Some(e), Some(v)) = (evals.first(), evecs.first()) {
                nbnd = e.len();
                ncomp = v.nrow();
            }

            for (e, v) in evals.iter().zip(evecs.iter()) {
                assert_eq!(e.len(), nbnd);
                assert_eq!(v.ncol(), nbnd);
                assert_eq!(v.nrow(), ncomp);
            }
        }

        EigenData {
            nbnd,
            ncomp,
            k_frac,
            vkevals,
            vkevecs,
        }
    }

    pub fn get_nk(&self) -> usize {
        self.k_frac.len()
    }

    pub fn get_nbnd(&self) -> usize {
        self.nbnd
    }

    pub fn get_nspin(&self) -> usize {
        self.vkevals.get_nspin()
    }

    /// Number of eigenvector coefficients per band.
    pub fn get_ncomp(&self) -> usize {
        self.ncomp
    }

    /// k-point in fractional reciprocal coordinates.
    pub fn get_k_frac(&self, ik: usize) -> &Vector3f64 {
        &self.k_frac[ik]
    }

    pub fn get_eigvalues(&self) -> &VKEigenValue {
        &self.vkevals
    }

    pub fn get_eigvalue(&self, ispin: usize, ik: usize) -> &[f64] {
        &self.vkevals.get_spin_channel(ispin)[ik]
    }

    pub fn get_eigvector(&self, ispin: usize, ik: usize) -> &Matrix<c64> {
        &self.vkevecs.get_spin_channel(ispin)[ik]
    }

    pub fn display(&self) {
        info!("   {:-^88}", " eigen states ");

        for (name, value) in [
            ("nk", self.get_nk()),
            ("nbnd", self.get_nbnd()),
            ("nspin", self.get_nspin()),
            ("ncomp", self.get_ncomp()),
        ]
        .iter()
        {
            info!("   {:<16} = {:>16}", name, value);
        }

        let (emin, emax) = (0..self.get_nspin())
            .flat_map(|ispin| self.vkevals.get_spin_channel(ispin).iter().flatten())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| (lo.min(e), hi.max(e)));

        if emin <= emax {
            info!("   {:<16} = {:>16.3} eV", "lowest band", emin);
            info!("   {:<16} = {:>16.3} eV", "highest band", emax);
        }
    }

    // in.eigen:
    // header: nk nbnd nspin ncomp
    // per k-point: k kx ky kz
    //              nspin * nbnd lines of energy re_0 im_0 ... re_{ncomp-1} im_{ncomp-1}
    pub fn read_file<P: AsRef<Path>>(inpfile: P) -> Result<EigenData, EigenError> {
        let path = inpfile.as_ref();

        let io_err = |source| EigenError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;

        let mut text = String::new();

        for line in BufReader::new(file).lines() {
            text.push_str(&line.map_err(io_err)?);
            text.push('\n');
        }

        EigenData::parse(&text)
    }

    pub fn parse(text: &str) -> Result<EigenData, EigenError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.split('#').next().unwrap_or("").trim()))
            .filter(|(_, l)| !l.is_empty());

        let (iline, header) = lines
            .next()
            .ok_or_else(|| EigenError::Truncated("missing header".to_string()))?;

        let mut tokens = header.split_whitespace();

        let nk: usize = next_value(&mut tokens, iline, "nk")?;
        let nbnd: usize = next_value(&mut tokens, iline, "nbnd")?;
        let nspin: usize = next_value(&mut tokens, iline, "nspin")?;
        let ncomp: usize = next_value(&mut tokens, iline, "ncomp")?;

        if nspin != 1 && nspin != 2 {
            return Err(EigenError::InvalidSpin(nspin));
        }

        // sizes come from the header, storage grows with the lines actually read
        let mut k_frac = Vec::new();
        let mut evals = vec![Vec::new(); nspin];
        let mut evecs = vec![Vec::new(); nspin];

        for ik in 0..nk {
            let (iline, kline) = lines
                .next()
                .ok_or_else(|| EigenError::Truncated(format!("k-point {} is missing", ik)))?;

            let mut tokens = kline.split_whitespace();

            if tokens.next() != Some("k") {
                return Err(EigenError::Parse {
                    line: iline,
                    msg: "expected 'k kx ky kz'".to_string(),
                });
            }

            let kx = next_value(&mut tokens, iline, "kx")?;
            let ky = next_value(&mut tokens, iline, "ky")?;
            let kz = next_value(&mut tokens, iline, "kz")?;

            k_frac.push(Vector3f64::new(kx, ky, kz));

            for ispin in 0..nspin {
                let mut energy = Vec::new();
                let mut columns = Vec::new();

                for ib in 0..nbnd {
                    let (iline, bline) = lines.next().ok_or_else(|| {
                        EigenError::Truncated(format!("band {} of k-point {} is missing", ib, ik))
                    })?;

                    let mut tokens = bline.split_whitespace();

                    energy.push(next_value(&mut tokens, iline, "energy")?);

                    for _ in 0..ncomp {
                        let re = next_value(&mut tokens, iline, "coefficient")?;
                        let im = next_value(&mut tokens, iline, "coefficient")?;

                        columns.push(c64::new(re, im));
                    }

                    if tokens.next().is_some() {
                        return Err(EigenError::Parse {
                            line: iline,
                            msg: format!("more than {} coefficients", ncomp),
                        });
                    }
                }

                evals[ispin].push(energy);
                evecs[ispin].push(Matrix::from_col_vec(ncomp, nbnd, columns));
            }
        }

        if let Some((iline, _)) = lines.next() {
            return Err(EigenError::Parse {
                line: iline,
                msg: format!("trailing data after {} k-points", nk),
            });
        }

        let (vkevals, vkevecs) = if nspin == 1 {
            let v = evals.pop().unwrap_or_default();
            let m = evecs.pop().unwrap_or_default();
            (VKEigenValue::NonSpin(v), VKEigenVector::NonSpin(m))
        } else {
            let dn = evals.pop().unwrap_or_default();
            let up = evals.pop().unwrap_or_default();
            let mdn = evecs.pop().unwrap_or_default();
            let mup = evecs.pop().unwrap_or_default();
            (VKEigenValue::Spin(up, dn), VKEigenVector::Spin(mup, mdn))
        };

        Ok(EigenData {
            nbnd,
            ncomp,
            k_frac,
            vkevals,
            vkevecs,
        })
    }
}

fn next_value<T: std::str::FromStr>(
    tokens: &mut SplitWhitespace,
    line: usize,
    what: &str,
) -> Result<T, EigenError> {
    let tok = tokens.next().ok_or_else(|| EigenError::Parse {
        line,
        msg: format!("missing {}", what),
    })?;

    tok.parse().map_err(|_| EigenError::Parse {
        line,
        msg: format!("'{}' is not a valid {}", tok, what),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const SPIN_EIGEN: &str = "
        # two k-points, two bands, collinear spin, one orbital
        2 2 2 1
        k 0.0 0.0 0.0
        -1.5  1.0 0.0
         0.5  0.0 1.0
        -1.4  1.0 0.0
         0.6  0.0 1.0
        k 0.5 0.0 0.0
        -1.0  0.6 0.8
         1.0  0.8 -0.6
        -0.9  1.0 0.0
         1.1  0.0 -1.0
    ";

    #[test]
    fn test_parse_spin() {
        let eigen = EigenData::parse(SPIN_EIGEN).unwrap();

        assert_eq!(eigen.get_nk(), 2);
        assert_eq!(eigen.get_nbnd(), 2);
        assert_eq!(eigen.get_nspin(), 2);
        assert_eq!(eigen.get_ncomp(), 1);

        assert_relative_eq!(eigen.get_k_frac(1).x, 0.5);
        assert_eq!(eigen.get_eigvalue(0, 1), &[-1.0, 1.0]);
        assert_eq!(eigen.get_eigvalue(1, 0), &[-1.4, 0.6]);

        let m = eigen.get_eigvector(0, 1);
        assert_eq!(m[[0, 0]], c64::new(0.6, 0.8));
        assert_eq!(m[[0, 1]], c64::new(0.8, -0.6));

        assert_eq!(eigen.get_eigvector(1, 1)[[0, 1]], c64::new(0.0, -1.0));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.eigen");

        let mut f = File::create(&path).unwrap();
        write!(f, "1 1 1 2\nk 0 0 0\n-0.5 1 0 0 1\n").unwrap();

        let eigen = EigenData::read_file(&path).unwrap();

        assert_eq!(eigen.get_ncomp(), 2);
        assert_eq!(eigen.get_eigvector(0, 0)[[1, 0]], c64::new(0.0, 1.0));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            EigenData::parse("1 1 3 1\nk 0 0 0\n0.0 1 0\n"),
            Err(EigenError::InvalidSpin(3))
        ));
        assert!(matches!(
            EigenData::parse("1 2 1 1\nk 0 0 0\n0.0 1 0\n"),
            Err(EigenError::Truncated(_))
        ));
        assert!(matches!(
            EigenData::parse("1 1 1 1\n0 0 0\n0.0 1 0\n"),
            Err(EigenError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            EigenData::parse("1 1 1 1\nk 0 0 0\n0.0 1\n"),
            Err(EigenError::Parse { line: 3, .. })
        ));
        assert!(matches!(
            EigenData::read_file("/nonexistent/in.eigen"),
            Err(EigenError::Io { .. })
        ));
    }

    #[test]
    fn test_huge_header_is_truncated() {
        assert!(matches!(
            EigenData::parse("100000000000000 1 1 1\n"),
            Err(EigenError::Truncated(_))
        ));
        assert!(matches!(
            EigenData::parse("1 100000000000000 2 1\nk 0 0 0\n0.0 1 0\n"),
            Err(EigenError::Truncated(_))
        ));
        assert!(matches!(
            EigenData::parse("1 1 1 100000000000000\nk 0 0 0\n0.0 1 0\n"),
            Err(EigenError::Parse { line: 3, .. })
        ));
    }
}
