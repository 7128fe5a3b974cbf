/// Simpson's rule on a non-uniform mesh given its Jacobian dr/di (`rab`).
///
/// An even number of points closes with the 3/8 rule on the last four.
pub fn simpson_rab(y: &[f64], rab: &[f64]) -> f64 {
    assert_eq!(y.len(), rab.len());

    let n = y.len();

    match n {
        0 | 1 => return 0.0,
        2 => return 0.5 * (y[0] * rab[0] + y[1] * rab[1]),
        _ => {}
    }

    let f = |i: usize| y[i] * rab[i];

    let nsimp = if n % 2 == 0 { n - 3 } else { n };

    let mut s = 0.0;

    for i in (0..nsimp.saturating_sub(2)).step_by(2) {
        s += f(i) + 4.0 * f(i + 1) + f(i + 2);
    }

    s /= 3.0;

    if n % 2 == 0 {
        s += 3.0 / 8.0 * (f(n - 4) + 3.0 * f(n - 3) + 3.0 * f(n - 2) + f(n - 1));
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simpson_uniform_polynomial() {
        // exact for cubics, odd and even point counts
        for n in [9usize, 10] {
            let dx = 1.0 / (n - 1) as f64;
            let y: Vec<f64> = (0..n).map(|i| (i as f64 * dx).powi(3)).collect();
            let rab = vec![dx; n];

            assert_relative_eq!(simpson_rab(&y, &rab), 0.25, epsilon = 1E-12);
        }
    }

    #[test]
    fn test_simpson_log_mesh() {
        // int_0^inf r^2 exp(-r) dr = 2
        let dx = 0.01;
        let r: Vec<f64> = (0..3001).map(|i| 1E-6 * (i as f64 * dx).exp()).collect();
        let rab: Vec<f64> = r.iter().map(|x| x * dx).collect();
        let y: Vec<f64> = r.iter().map(|x| x * x * (-x).exp()).collect();

        assert_relative_eq!(simpson_rab(&y, &rab), 2.0, epsilon = 1E-6);
    }
}
