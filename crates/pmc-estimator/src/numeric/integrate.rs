//! Trapezoidal integration over sampled curves.

/// Area under `ys` over `xs` by the trapezoid rule.
/// Mismatched lengths integrate over the common prefix.
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    (1..n)
        .map(|i| 0.5 * (ys[i] + ys[i - 1]) * (xs[i] - xs[i - 1]))
        .sum()
}

/// Running trapezoid integral, starting at 0.
pub fn cumulative_trapezoid(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    let mut out = Vec::with_capacity(n);
    let mut acc = 0.0;
    for i in 0..n {
        if i > 0 {
            acc += 0.5 * (ys[i] + ys[i - 1]) * (xs[i] - xs[i - 1]);
        }
        out.push(acc);
    }
    out
}

/// Scale `ys` in place so its trapezoid area is 1.
/// Returns `false` (leaving `ys` untouched) when the area is not positive.
pub fn normalize_area(xs: &[f64], ys: &mut [f64]) -> bool {
    let area = trapezoid(xs, ys);
    if !(area > 0.0 && area.is_finite()) {
        return false;
    }
    for y in ys.iter_mut() {
        *y /= area;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::linspace;

    #[test]
    fn test_trapezoid_linear_exact() {
        let xs = linspace(0.0, 2.0, 11);
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x).collect();
        assert!((trapezoid(&xs, &ys) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_ends_at_area() {
        let xs = linspace(0.0, 1.0, 101);
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        let cum = cumulative_trapezoid(&xs, &ys);
        assert_eq!(cum[0], 0.0);
        assert!((cum[100] - trapezoid(&xs, &ys)).abs() < 1e-15);
        assert!(cum.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_normalize_area() {
        let xs = linspace(0.0, 4.0, 5);
        let mut ys = vec![2.0; 5];
        assert!(normalize_area(&xs, &mut ys));
        assert!((trapezoid(&xs, &ys) - 1.0).abs() < 1e-12);

        let mut zeros = vec![0.0; 5];
        assert!(!normalize_area(&xs, &mut zeros));
    }
}
