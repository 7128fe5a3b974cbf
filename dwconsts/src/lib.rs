use std::f64;
use types::c64;

// units : length

pub const BOHR_TO_ANG: f64 = 0.529177249;
pub const ANG_TO_BOHR: f64 = 1.0 / BOHR_TO_ANG;

// units : volume

pub const BOHR3_TO_ANG3: f64 = BOHR_TO_ANG * BOHR_TO_ANG * BOHR_TO_ANG;

// units : energy

pub const RY_TO_EV: f64 = 13.605698066;
pub const HA_TO_EV: f64 = 2.0 * RY_TO_EV;
pub const EV_TO_HA: f64 = 1.0 / HA_TO_EV;

//

pub const ZERO_C64: c64 = c64 { re: 0.0, im: 0.0 };
pub const ONE_C64: c64 = c64 { re: 1.0, im: 0.0 };
pub const I_C64: c64 = c64 { re: 0.0, im: 1.0 };

// pi

pub const PI: f64 = f64::consts::PI;
pub const TWOPI: f64 = 2.0 * f64::consts::PI;
pub const FOURPI: f64 = 4.0 * f64::consts::PI;
pub const SQRT_PI: f64 = 1.772_453_850_905_516;

// occupation

/// Bands with an eigenvalue at or below this value (Fermi level at zero) count as occupied.
pub const OCC_EPS: f64 = 1E-5;

/// Each occupied band carries two electrons in the density sum.
pub const BAND_OCCUPATION: f64 = 2.0;

// numerical

pub const EPS10: f64 = 1E-10;
pub const EPS12: f64 = 1E-12;
