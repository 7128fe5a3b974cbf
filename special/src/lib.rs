use dwconsts::{EPS12, PI};
use vector3::*;

/// Highest angular momentum the radial transforms and harmonics support.
pub const MAX_L: usize = 3;

const SERIES_X: f64 = 0.5;
const SERIES_TERMS: usize = 4;

// https://en.wikipedia.org/wiki/Bessel_function#Spherical_Bessel_functions:_jn,_yn
//
// Near the origin the closed forms for n > 0 cancel catastrophically, so the
// Taylor series is used below SERIES_X.
//
// # Panics
//
// n > MAX_L.
pub fn spherical_bessel_jn(n: usize, x: f64) -> f64 {
    assert!(n <= MAX_L, "spherical bessel function for n = {} is not implemented", n);

    if x < SERIES_X {
        return spherical_bessel_jn_series(n, x);
    }

    let (s, c) = x.sin_cos();

    match n {
        0 => s / x,

        1 => s / (x * x) - c / x,

        2 => (3.0 / (x * x) - 1.0) * s / x - 3.0 * c / (x * x),

        _ => {
            let x2 = x * x;
            (15.0 / (x2 * x2) - 6.0 / x2) * s - (15.0 / (x2 * x) - 1.0 / x) * c
        }
    }
}

// j_n(x) = x^n / (2n+1)!! * sum_k (-x^2/2)^k / (k! (2n+3)(2n+5)...(2n+2k+1))
fn spherical_bessel_jn_series(n: usize, x: f64) -> f64 {
    let t = x * x;

    let dfact: f64 = (1..=2 * n + 1).step_by(2).map(|k| k as f64).product();

    let mut inner = 1.0;

    for k in (1..=SERIES_TERMS).rev() {
        inner = 1.0 - t / (2 * k * (2 * n + 2 * k + 1)) as f64 * inner;
    }

    x.powi(n as i32) / dfact * inner
}

/// Real spherical harmonic Y_lm of the direction of `v`, m in -l..=l.
///
/// The direction of the zero vector is undefined; only the l = 0 term is
/// non-zero there.
///
/// # Panics
///
/// l > MAX_L or |m| > l.
pub fn real_spherical_harmonics(l: usize, m: i32, v: Vector3f64) -> f64 {
    let rnorm = v.norm2();

    if l == 0 {
        return 0.5 / PI.sqrt();
    }

    if rnorm < EPS12 {
        return 0.0;
    }

    let x = v.x / rnorm;
    let y = v.y / rnorm;
    let z = v.z / rnorm;

    match (l, m) {
        (1, -1) => -(3.0 / 4.0 / PI).sqrt() * y,

        (1, 0) => (3.0 / 4.0 / PI).sqrt() * z,

        (1, 1) => -(3.0 / 4.0 / PI).sqrt() * x,

        (2, -2) => 0.5 * (15.0 / PI).sqrt() * x * y,

        (2, -1) => 0.5 * (15.0 / PI).sqrt() * y * z,

        (2, 0) => 0.25 * (5.0 / PI).sqrt() * (2.0 * z * z - x * x - y * y),

        (2, 1) => 0.5 * (15.0 / PI).sqrt() * z * x,

        (2, 2) => 0.25 * (15.0 / PI).sqrt() * (x * x - y * y),

        (3, -3) => -0.25 * (35.0 / 2.0 / PI).sqrt() * (3.0 * x * x - y * y) * y,

        (3, -2) => 0.5 * (105.0 / PI).sqrt() * x * y * z,

        (3, -1) => -0.25 * (21.0 / 2.0 / PI).sqrt() * y * (4.0 * z * z - x * x - y * y),

        (3, 0) => 0.25 * (7.0 / PI).sqrt() * z * (2.0 * z * z - 3.0 * x * x - 3.0 * y * y),

        (3, 1) => -0.25 * (21.0 / 2.0 / PI).sqrt() * x * (4.0 * z * z - x * x - y * y),

        (3, 2) => 0.25 * (105.0 / PI).sqrt() * (x * x - y * y) * z,

        (3, 3) => -0.25 * (35.0 / 2.0 / PI).sqrt() * (x * x - 3.0 * y * y) * x,

        _ => panic!("real spherical harmonic (l = {}, m = {}) is not implemented", l, m),
    }
}
