use std::cmp::Ordering;

/// Indices that sort `v` ascending; incomparable values (NaN) keep their order.
pub fn argsort<T: PartialOrd>(v: &[T]) -> Vec<usize> {
    let mut idx = (0..v.len()).collect::<Vec<_>>();

    idx.sort_by(|&i, &j| v[i].partial_cmp(&v[j]).unwrap_or(Ordering::Equal));

    idx
}

/// N even, 8
///
/// n : 0 1 2 3 4 5 6 7
///
/// i : 0 1 2 3 4 -3 -2 -1
///
/// N Odd, 7
///
/// n : 0 1 2 3 4 5 6
///
/// i : 0 1 2 3 -3 -2 -1
pub fn fft_left_end(n: usize) -> i32 {
    -(fft_right_end(n) - if n % 2 == 0 { 1 } else { 0 })
}

pub fn fft_right_end(n: usize) -> i32 {
    (n / 2) as i32
}

pub fn fft_i2n(i: i32, ntot: usize) -> usize {
    if i < 0 {
        (i + ntot as i32) as usize
    } else {
        i as usize
    }
}

/// Lower-case tokens of a `key = value` line with `#` comments stripped.
/// Returns None for blank and comment lines.
pub fn split_key_value(line: &str) -> Option<(String, String)> {
    let content = line.split('#').next().unwrap_or("").trim();

    if content.is_empty() {
        return None;
    }

    let mut parts = content.splitn(2, '=');

    let key = parts.next()?.trim().to_lowercase();
    let value = parts.next().map(|v| v.trim().to_string()).unwrap_or_default();

    Some((key, value))
}
