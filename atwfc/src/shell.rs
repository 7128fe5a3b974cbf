use crate::BasisError;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// One radial shell of a species: angular momentum and radial exponent (Bohr units).
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub species: String,
    pub l: usize,
    pub exponent: f64,
}

/// Angular momenta of the shells placed on each atom, in basis order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShellMetadata {
    shells: Vec<Vec<usize>>,
}

impl ShellMetadata {
    pub fn new(shells: Vec<Vec<usize>>) -> ShellMetadata {
        ShellMetadata { shells }
    }

    pub fn get_n_atoms(&self) -> usize {
        self.shells.len()
    }

    pub fn get_shells_of_atom(&self, iat: usize) -> &[usize] {
        &self.shells[iat]
    }

    /// Number of orbitals, 2l+1 per shell.
    pub fn get_norb(&self) -> usize {
        self.shells.iter().flatten().map(|l| 2 * l + 1).sum()
    }
}

fn parse_l(token: &str) -> Option<usize> {
    match token.to_lowercase().as_str() {
        "s" => Some(0),
        "p" => Some(1),
        "d" => Some(2),
        "f" => Some(3),
        t => t.parse().ok(),
    }
}

// in.basis:
// species l exponent
// l is an integer or one of s p d f
pub fn parse_shells(text: &str) -> Result<Vec<Shell>, BasisError> {
    let mut shells = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("").trim();

        if content.is_empty() {
            continue;
        }

        let s: Vec<&str> = content.split_whitespace().collect();

        if s.len() != 3 {
            return Err(BasisError::Parse {
                line: i + 1,
                msg: "expected 'species l exponent'".to_string(),
            });
        }

        let l = parse_l(s[1]).ok_or_else(|| BasisError::Parse {
            line: i + 1,
            msg: format!("'{}' is not an angular momentum", s[1]),
        })?;

        if l > special::MAX_L {
            return Err(BasisError::UnsupportedL(l));
        }

        let exponent: f64 = s[2].parse().map_err(|_| BasisError::Parse {
            line: i + 1,
            msg: format!("'{}' is not a number", s[2]),
        })?;

        if !(exponent > 0.0) {
            return Err(BasisError::Parse {
                line: i + 1,
                msg: format!("exponent must be positive, got {}", exponent),
            });
        }

        shells.push(Shell {
            species: s[0].to_string(),
            l,
            exponent,
        });
    }

    Ok(shells)
}

pub fn read_shells<P: AsRef<Path>>(inpfile: P) -> Result<Vec<Shell>, BasisError> {
    let path = inpfile.as_ref();

    let io_err = |source| BasisError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;

    let mut text = String::new();

    for line in BufReader::new(file).lines() {
        text.push_str(&line.map_err(io_err)?);
        text.push('\n');
    }

    parse_shells(&text)
}
