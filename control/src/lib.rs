use dwconsts::*;
use log::info;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

const OUT_WIDTH1: usize = 20;
const OUT_WIDTH2: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("cannot read control file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("in.ctrl line {line}: unknown parameter '{key}'")]
    UnknownKey { line: usize, key: String },

    #[error("in.ctrl line {line}: invalid value '{value}' for '{key}'")]
    InvalidValue { line: usize, key: String, value: String },

    #[error("in.ctrl: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone)]
pub struct Control {
    task: String,      // dos, density, all
    verbosity: String, // high, low

    dos_emin: f64,
    dos_emax: f64,
    dos_ne: usize,
    dos_delta: f64,
    shift: f64,

    density_grid: [usize; 3],
    basis_scheme: String, // pseudo, all_electron
    ecut_wfc: f64,
    spin_orbit: bool,

    out_dir: String,
    nworkers: usize,
}

impl Default for Control {
    fn default() -> Self {
        Control {
            task: "all".to_string(),
            verbosity: "high".to_string(),

            dos_emin: -10.0,
            dos_emax: 5.0,
            dos_ne: 500,
            dos_delta: 0.1,
            shift: 5.0,

            density_grid: [24, 24, 24],
            basis_scheme: "pseudo".to_string(),
            ecut_wfc: 400.0 * EV_TO_HA, // ev in in.ctrl, Ha internally
            spin_orbit: false,

            out_dir: ".".to_string(),
            nworkers: 1,
        }
    }
}

impl Control {
    pub fn new() -> Control {
        Control::default()
    }

    pub fn get_task(&self) -> &str {
        &self.task
    }

    pub fn run_dos(&self) -> bool {
        self.task == "dos" || self.task == "all"
    }

    pub fn run_density(&self) -> bool {
        self.task == "density" || self.task == "all"
    }

    pub fn get_verbosity(&self) -> &str {
        &self.verbosity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == "high"
    }

    pub fn get_dos_emin(&self) -> f64 {
        self.dos_emin
    }

    pub fn get_dos_emax(&self) -> f64 {
        self.dos_emax
    }

    pub fn get_dos_ne(&self) -> usize {
        self.dos_ne
    }

    pub fn get_dos_delta(&self) -> f64 {
        self.dos_delta
    }

    pub fn get_shift(&self) -> f64 {
        self.shift
    }

    pub fn get_density_grid(&self) -> [usize; 3] {
        self.density_grid
    }

    pub fn get_basis_scheme(&self) -> &str {
        &self.basis_scheme
    }

    /// Plane-wave cutoff in Hartree.
    pub fn get_ecut(&self) -> f64 {
        self.ecut_wfc
    }

    pub fn is_spin_orbit(&self) -> bool {
        self.spin_orbit
    }

    pub fn get_out_dir(&self) -> &str {
        &self.out_dir
    }

    pub fn get_nworkers(&self) -> usize {
        self.nworkers
    }

    pub fn set_task(&mut self, task: &str) -> Result<(), ControlError> {
        self.task = one_of(0, "task", task, &["dos", "density", "all"])?;
        Ok(())
    }

    pub fn set_out_dir(&mut self, out_dir: &str) {
        self.out_dir = out_dir.to_string();
    }

    pub fn set_nworkers(&mut self, nworkers: usize) {
        self.nworkers = nworkers;
    }

    pub fn read_file<P: AsRef<Path>>(inpfile: P) -> Result<Control, ControlError> {
        let path = inpfile.as_ref();

        let io_err = |source| ControlError::Io {
            path: path.display().to_string(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;

        let mut text = String::new();

        for line in BufReader::new(file).lines() {
            text.push_str(&line.map_err(io_err)?);
            text.push('\n');
        }

        Control::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Control, ControlError> {
        let mut ctrl = Control::default();

        for (i, line) in text.lines().enumerate() {
            let (key, value) = match utility::split_key_value(line) {
                Some(kv) => kv,
                None => continue,
            };

            let iline = i + 1;

            match key.as_str() {
                "task" => {
                    ctrl.task = one_of(iline, &key, &value, &["dos", "density", "all"])?;
                }

                "verbosity" => {
                    ctrl.verbosity = one_of(iline, &key, &value, &["high", "low"])?;
                }

                "dos_emin" => {
                    ctrl.dos_emin = parse_value(iline, &key, &value)?;
                }

                "dos_emax" => {
                    ctrl.dos_emax = parse_value(iline, &key, &value)?;
                }

                "dos_ne" => {
                    ctrl.dos_ne = parse_value(iline, &key, &value)?;
                }

                "dos_delta" => {
                    ctrl.dos_delta = parse_value(iline, &key, &value)?;
                }

                "shift" => {
                    ctrl.shift = parse_value(iline, &key, &value)?;
                }

                "density_grid" => {
                    let v: Vec<&str> = value.split_whitespace().collect();

                    if v.len() != 3 {
                        return Err(invalid(iline, &key, &value));
                    }

                    for (n, s) in ctrl.density_grid.iter_mut().zip(v.iter()) {
                        *n = parse_value(iline, &key, s)?;
                    }
                }

                "basis_scheme" => {
                    ctrl.basis_scheme = one_of(iline, &key, &value, &["pseudo", "all_electron"])?;
                }

                "ecut_wfc" => {
                    ctrl.ecut_wfc = parse_value::<f64>(iline, &key, &value)? * EV_TO_HA;
                }

                "spin_orbit" => {
                    ctrl.spin_orbit = parse_value(iline, &key, &value)?;
                }

                "out_dir" => {
                    ctrl.out_dir = value;
                }

                "nworkers" => {
                    ctrl.nworkers = parse_value(iline, &key, &value)?;
                }

                _ => {
                    return Err(ControlError::UnknownKey { line: iline, key });
                }
            }
        }

        ctrl.validate()?;

        Ok(ctrl)
    }

    fn validate(&self) -> Result<(), ControlError> {
        if self.dos_ne < 2 {
            return Err(ControlError::Inconsistent(format!(
                "dos_ne = {} but at least 2 energy points are needed",
                self.dos_ne
            )));
        }

        if self.dos_delta <= 0.0 {
            return Err(ControlError::Inconsistent(format!(
                "dos_delta = {} must be positive",
                self.dos_delta
            )));
        }

        if self.density_grid.iter().any(|&n| n == 0) {
            return Err(ControlError::Inconsistent(
                "density_grid dimensions must be positive".to_string(),
            ));
        }

        if self.ecut_wfc <= 0.0 {
            return Err(ControlError::Inconsistent("ecut_wfc must be positive".to_string()));
        }

        if self.nworkers == 0 {
            return Err(ControlError::Inconsistent("nworkers must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn display(&self) {
        info!("   {:-^88}", " control parameters ");

        info!(
            "   {:<width1$} = {:>width2$}",
            "task",
            self.get_task(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$}",
            "verbosity",
            self.get_verbosity(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        info!(
            "   {:<width1$} = {:>width2$.3} eV",
            "dos_emin",
            self.get_dos_emin(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$.3} eV",
            "dos_emax",
            self.get_dos_emax(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$}",
            "dos_ne",
            self.get_dos_ne(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$.3} eV",
            "dos_delta",
            self.get_dos_delta(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$.3} eV",
            "shift",
            self.get_shift(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        let [n1, n2, n3] = self.density_grid;
        info!(
            "   {:<width1$} = {:>width2$}",
            "density_grid",
            format!("{} {} {}", n1, n2, n3),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$}",
            "basis_scheme",
            self.get_basis_scheme(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$.3} eV",
            "ecut_wfc",
            self.get_ecut() * HA_TO_EV,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$}",
            "spin_orbit",
            self.is_spin_orbit(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        info!(
            "   {:<width1$} = {:>width2$}",
            "out_dir",
            self.get_out_dir(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
        info!(
            "   {:<width1$} = {:>width2$}",
            "nworkers",
            self.get_nworkers(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
    }
}

fn invalid(line: usize, key: &str, value: &str) -> ControlError {
    ControlError::InvalidValue {
        line,
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: FromStr>(line: usize, key: &str, value: &str) -> Result<T, ControlError> {
    value.parse().map_err(|_| invalid(line, key, value))
}

fn one_of(line: usize, key: &str, value: &str, choices: &[&str]) -> Result<String, ControlError> {
    let v = value.to_lowercase();

    if choices.contains(&v.as_str()) {
        Ok(v)
    } else {
        Err(invalid(line, key, value))
    }
}
