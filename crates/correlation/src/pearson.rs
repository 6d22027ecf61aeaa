use crate::align::AlignedPair;

/// Pearson correlation coefficient of an aligned pair over the most recent
/// `lookback` rows.
///
/// When fewer rows than `lookback` exist, all of them are used. Returns
/// `None` when the coefficient is undefined: fewer than two rows in the
/// window, or a zero denominator because one side is constant over it. A
/// float division by zero must never leak into the published matrix as NaN.
pub fn pearson(pair: &AlignedPair, lookback: usize) -> Option<f64> {
    let rows = pair.rows();
    let window = &rows[rows.len().saturating_sub(lookback)..];
    if window.len() < 2 {
        return None;
    }

    let n = window.len() as f64;
    let mean_x = window.iter().map(|r| r.ret_a).sum::<f64>() / n;
    let mean_y = window.iter().map(|r| r.ret_b).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_dx2 = 0.0;
    let mut sum_dy2 = 0.0;
    for row in window {
        let dx = row.ret_a - mean_x;
        let dy = row.ret_b - mean_y;
        numerator += dx * dy;
        sum_dx2 += dx * dx;
        sum_dy2 += dy * dy;
    }

    let denominator = (sum_dx2 * sum_dy2).sqrt();
    if denominator == 0.0 {
        return None;
    }

    Some(numerator / denominator)
}
