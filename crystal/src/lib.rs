use dwconsts::*;
use itertools::Itertools;
use lattice::Lattice;
use log::info;
use vector3::*;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

#[derive(Debug, thiserror::Error)]
pub enum CrystalError {
    #[error("cannot read crystal file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("in.crystal line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("in.crystal: expected a scale line and three lattice vectors")]
    Incomplete,
}

// Crystal structure container.
//
// - lattice vectors stored in Bohr
// - atomic positions stored in fractional coordinates
#[derive(Debug, Default, Clone)]
pub struct Crystal {
    latt: Lattice,
    atom_positions: Vec<Vector3f64>,
    atom_species: Vec<String>,
    atom_indices_by_specie: Vec<Vec<usize>>,
}

impl Crystal {
    pub fn new(latt: Lattice, atom_species: Vec<String>, atom_positions: Vec<Vector3f64>) -> Crystal {
        assert_eq!(atom_species.len(), atom_positions.len());

        let mut crystal = Crystal {
            latt,
            atom_positions,
            atom_species,
            atom_indices_by_specie: Vec::new(),
        };

        crystal.index_species();

        crystal
    }

    pub fn get_latt(&self) -> &Lattice {
        &self.latt
    }

    pub fn get_unique_species(&self) -> Vec<String> {
        self.atom_species.iter().cloned().unique().collect()
    }

    pub fn get_n_unique_species(&self) -> usize {
        self.atom_indices_by_specie.len()
    }

    pub fn get_atom_indices_of_specie(&self, isp: usize) -> &[usize] {
        &self.atom_indices_by_specie[isp]
    }

    pub fn get_n_atoms(&self) -> usize {
        self.atom_positions.len()
    }

    pub fn get_atom_positions(&self) -> &[Vector3f64] {
        &self.atom_positions
    }

    pub fn get_atom_positions_cart(&self) -> Vec<Vector3f64> {
        self.atom_positions
            .iter()
            .map(|p| self.latt.frac_to_cart(p))
            .collect()
    }

    pub fn get_atom_species(&self) -> &[String] {
        &self.atom_species
    }

    // in.crystal:
    // line 1: scale_a scale_b scale_c
    // line 2-4: lattice vectors in Angstrom, optionally followed by T/F cell mask flags
    // remaining lines: species x y z (fractional atomic positions)
    pub fn read_file<P: AsRef<Path>>(inpfile: P) -> Result<Crystal, CrystalError> {
        let path = inpfile.as_ref();

        let file = File::open(path).map_err(|source| CrystalError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut text = String::new();

        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| CrystalError::Io {
                path: path.display().to_string(),
                source,
            })?;
            text.push_str(&line);
            text.push('\n');
        }

        Crystal::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Crystal, CrystalError> {
        let mut scale = [1.0; 3];
        let mut vecs = [[0.0; 3]; 3];

        let mut species = Vec::new();
        let mut positions = Vec::new();

        let mut nheader = 0;

        for (i, line) in text.lines().enumerate() {
            let s: Vec<&str> = line.split_whitespace().collect();

            if s.is_empty() {
                continue;
            }

            match nheader {
                0 => {
                    let v = parse_floats(&s, 3, i + 1)?;
                    scale.copy_from_slice(&v);
                }

                1..=3 => {
                    let v = parse_floats(&s, 3, i + 1)?;

                    for iv in 0..3 {
                        vecs[nheader - 1][iv] = v[iv] * scale[nheader - 1] * ANG_TO_BOHR;
                    }
                }

                // atoms
                _ => {
                    if s.len() < 4 {
                        return Err(CrystalError::Parse {
                            line: i + 1,
                            msg: "expected 'species x y z'".to_string(),
                        });
                    }

                    let v = parse_floats(&s[1..], 3, i + 1)?;

                    species.push(s[0].to_string());
                    positions.push(Vector3f64::new(v[0], v[1], v[2]));
                }
            }

            nheader += 1;
        }

        if nheader < 4 {
            return Err(CrystalError::Incomplete);
        }

        let latt = Lattice::new(&vecs[0], &vecs[1], &vecs[2]);

        Ok(Crystal::new(latt, species, positions))
    }

    pub fn display(&self) {
        info!("   {:-^88}", " crystal structure ");

        let names = ["a", "b", "c"];
        let vecs = [
            self.latt.get_vector_a(),
            self.latt.get_vector_b(),
            self.latt.get_vector_c(),
        ];

        for (name, v) in names.iter().zip(vecs.iter()) {
            info!(
                "   {} = {:20.12}  {:20.12}  {:20.12}",
                name,
                v.x * BOHR_TO_ANG,
                v.y * BOHR_TO_ANG,
                v.z * BOHR_TO_ANG
            );
        }

        info!("   volume = {:.6} A^3", self.latt.volume() * BOHR3_TO_ANG3);
        info!("   natoms = {}", self.get_n_atoms());

        for (i, atom) in self.atom_positions.iter().enumerate() {
            info!(
                "   {:<3} {:>4} : {:16.12}  {:16.12}  {:16.12}",
                i + 1,
                self.atom_species[i],
                atom.x,
                atom.y,
                atom.z
            );
        }
    }

    fn index_species(&mut self) {
        let unique_species = self.get_unique_species();

        self.atom_indices_by_specie = unique_species
            .iter()
            .map(|sp| {
                self.atom_species
                    .iter()
                    .positions(|at| at == sp)
                    .collect::<Vec<usize>>()
            })
            .collect();
    }
}

fn parse_floats(s: &[&str], n: usize, line: usize) -> Result<Vec<f64>, CrystalError> {
    if s.len() < n {
        return Err(CrystalError::Parse {
            line,
            msg: format!("expected {} numbers", n),
        });
    }

    s[..n]
        .iter()
        .map(|t| {
            t.parse::<f64>().map_err(|_| CrystalError::Parse {
                line,
                msg: format!("'{}' is not a number", t),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests;
