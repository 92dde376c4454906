/// Result of a weighted least-squares line fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedFit {
    pub slope: f64,
    pub intercept: f64,
    /// Weighted coefficient of determination, 0..=1
    pub r_squared: f64,
}

/// Linear recency weights: 1 for the first sample up to `recent_weight` for
/// the last. All 1 when the samples span no time.
pub fn recency_weights(hours: &[f64], recent_weight: f64) -> Vec<f64> {
    let total = hours.last().copied().unwrap_or_default();
    if total <= 0.0 {
        return vec![1.0; hours.len()];
    }

    hours
        .iter()
        .map(|elapsed| 1.0 + (recent_weight - 1.0) * (elapsed / total))
        .collect()
}

/// Weighted least-squares fit of `ys` against `xs`.
///
/// Returns `None` when fewer than two points are given, the inputs are not
/// finite, or every `x` is identical. Identical `y`s give a flat line with
/// R² = 0.
pub fn weighted_least_squares(xs: &[f64], ys: &[f64], weights: &[f64]) -> Option<WeightedFit> {
    if xs.len() < 2 || xs.len() != ys.len() || xs.len() != weights.len() {
        return None;
    }

    let points = || xs.iter().zip(ys).zip(weights).map(|((x, y), w)| (*x, *y, *w));
    if points().any(|(x, y, w)| !x.is_finite() || !y.is_finite() || !w.is_finite() || w < 0.0) {
        return None;
    }

    let sum_w: f64 = weights.iter().sum();
    if sum_w <= 0.0 {
        return None;
    }
    let mean_x = points().map(|(x, _, w)| w * x).sum::<f64>() / sum_w;
    let mean_y = points().map(|(_, y, w)| w * y).sum::<f64>() / sum_w;

    // Centered sums, same quantities as ΣwXX − (ΣwX)²/Σw etc.
    let (mut s_xx, mut s_yy, mut s_xy) = (0.0, 0.0, 0.0);
    for (x, y, w) in points() {
        let (dx, dy) = (x - mean_x, y - mean_y);
        s_xx += w * dx * dx;
        s_yy += w * dy * dy;
        s_xy += w * dx * dy;
    }

    if !(s_xx.is_finite() && s_yy.is_finite() && s_xy.is_finite()) || s_xx <= 0.0 {
        return None;
    }

    let slope = s_xy / s_xx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if s_yy <= 0.0 {
        0.0
    } else {
        ((s_xy * s_xy) / (s_xx * s_yy)).clamp(0.0, 1.0)
    };

    (slope.is_finite() && intercept.is_finite()).then_some(WeightedFit {
        slope,
        intercept,
        r_squared,
    })
}
