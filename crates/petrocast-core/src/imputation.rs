//! Missing-value filling for panel columns.

/// Gap-filling policy applied by the cleaning pipeline.
///
/// The source workflows disagreed on whether interpolation alone is enough
/// or a trailing forward fill should follow, so both are configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMethod {
    /// Linear interpolation of interior gaps only.
    Interpolate,
    /// Linear interpolation, then forward fill for trailing gaps.
    #[default]
    InterpolateThenForwardFill,
}

impl FillMethod {
    /// Apply this policy to one column.
    pub fn apply(self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        match self {
            FillMethod::Interpolate => fill_interpolate(values),
            FillMethod::InterpolateThenForwardFill => fill_forward(&fill_interpolate(values)),
        }
    }
}

/// Fill interior gaps with linear interpolation between the surrounding
/// observations.
///
/// Leading and trailing gaps are left missing; a column with no
/// observations at all is returned unchanged.
pub fn fill_interpolate(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut result = values.to_vec();

    let first = values.iter().position(|v| v.is_some());
    let last = values.iter().rposition(|v| v.is_some());
    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => return result,
    };

    let mut prev_idx = first;
    let mut prev_val = values[first].expect("position() guarantees values[first] is Some");

    for i in (first + 1)..=last {
        if let Some(v) = values[i] {
            let gap = i - prev_idx;
            if gap > 1 {
                let slope = (v - prev_val) / gap as f64;
                for j in 1..gap {
                    result[prev_idx + j] = Some(prev_val + slope * j as f64);
                }
            }
            prev_idx = i;
            prev_val = v;
        }
    }

    result
}

/// Fill gaps with the last observed value (forward fill / LOCF).
///
/// Leading gaps stay missing.
pub fn fill_forward(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());
    let mut last_value: Option<f64> = None;

    for v in values {
        match v {
            Some(x) => {
                last_value = Some(*x);
                result.push(Some(*x));
            }
            None => {
                result.push(last_value);
            }
        }
    }

    result
}
