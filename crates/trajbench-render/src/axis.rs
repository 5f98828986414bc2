//! Linear scales and "nice" tick generation.

/// Maps a data interval onto a pixel interval. Either interval may be reversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Ticks inside the domain, with labels formatted to the tick step.
    pub fn ticks(&self, count: usize) -> Vec<(f64, String)> {
        let (lo, hi) = ordered(self.domain);
        let values = d3_ticks(lo, hi, count);
        let step = if values.len() > 1 {
            values[1] - values[0]
        } else {
            (hi - lo).abs()
        };
        values
            .into_iter()
            .map(|v| (v, format_tick(v, step)))
            .collect()
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Pads `[lo, hi]` by `fraction` of its span on both sides. A zero-width interval is widened
/// around its value so it still has a visible extent.
pub fn padded_domain(lo: f64, hi: f64, fraction: f64) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 {
        return (lo - span * fraction, hi + span * fraction);
    }
    let half = if lo.abs() > 0.0 { lo.abs() * 0.1 } else { 0.5 };
    (lo - half, hi + half)
}

/// Formats a tick value with just enough decimals for `step`.
pub fn format_tick(v: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step.is_finite() {
        (-(step.log10() + 1e-9).floor()).max(0.0) as usize
    } else {
        2
    };
    let s = format!("{v:.decimals$}");
    // Avoid "-0" / "-0.00".
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// d3-array `ticks(start, stop, count)`: round values (1, 2 or 5 times a power of ten) covering
/// `[start, stop]`.
pub fn d3_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
        let step = (stop - start) / count.max(0.0);
        if !step.is_finite() || step == 0.0 {
            return None;
        }
        let power = step.log10().floor();
        let error = step / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        let (i1, i2, inc) = if power < 0.0 {
            let inc = 10f64.powf(-power) / factor;
            let mut i1 = (start * inc).round() as i64;
            let mut i2 = (stop * inc).round() as i64;
            if (i1 as f64) / inc < start {
                i1 += 1;
            }
            if (i2 as f64) / inc > stop {
                i2 -= 1;
            }
            (i1, i2, -inc)
        } else {
            let inc = 10f64.powf(power) * factor;
            let mut i1 = (start / inc).round() as i64;
            let mut i2 = (stop / inc).round() as i64;
            if (i1 as f64) * inc < start {
                i1 += 1;
            }
            if (i2 as f64) * inc > stop {
                i2 -= 1;
            }
            (i1, i2, inc)
        };

        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        if !inc.is_finite() || inc == 0.0 {
            return None;
        }
        Some((i1, i2, inc))
    }

    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (a, b) = if reverse { (stop, start) } else { (start, stop) };
    let Some((i1, i2, inc)) = tick_spec(a, b, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let n = (i2 - i1 + 1) as usize;
    let value = |i: i64| {
        if inc < 0.0 {
            i as f64 / -inc
        } else {
            i as f64 * inc
        }
    };
    if reverse {
        (0..n).map(|k| value(i2 - k as i64)).collect()
    } else {
        (0..n).map(|k| value(i1 + k as i64)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_round_numbers_inside_the_domain() {
        assert_eq!(d3_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(
            d3_ticks(-3.2, 11.7, 5),
            vec![-2.0, 0.0, 2.0, 4.0, 6.0, 8.0, 10.0]
        );
        assert_eq!(d3_ticks(1.0, 0.0, 2), vec![1.0, 0.5, 0.0]);
        assert_eq!(d3_ticks(2.0, 2.0, 5), vec![2.0]);
    }

    #[test]
    fn tick_labels_match_the_step() {
        let scale = LinearScale::new((0.0, 0.5), (100.0, 0.0));
        let labels: Vec<String> = scale.ticks(5).into_iter().map(|(_, s)| s).collect();
        assert_eq!(labels, vec!["0.0", "0.1", "0.2", "0.3", "0.4", "0.5"]);
        assert_eq!(format_tick(-0.0001, 0.1), "0.0");
        assert_eq!(format_tick(20.0, 5.0), "20");
    }

    #[test]
    fn scale_maps_reversed_ranges() {
        let scale = LinearScale::new((0.0, 10.0), (200.0, 0.0));
        assert_eq!(scale.map(0.0), 200.0);
        assert_eq!(scale.map(2.5), 150.0);
    }

    #[test]
    fn zero_width_domains_are_widened() {
        assert_eq!(padded_domain(0.0, 0.0, 0.05), (-0.5, 0.5));
        let (lo, hi) = padded_domain(2.0, 2.0, 0.05);
        assert!((lo - 1.8).abs() < 1e-12 && (hi - 2.2).abs() < 1e-12);
        assert_eq!(padded_domain(0.0, 10.0, 0.05), (-0.5, 10.5));
    }
}
