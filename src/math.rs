/// `ln(2π)`
pub const LOG_2PI: f64 = 1.837_877_066_409_345_3;

/// Log density of a normal distribution.
///
/// Callers are expected to reject non-positive `std` beforehand.
#[inline]
pub fn log_normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let z = (x - mean) / std;
    -0.5 * (LOG_2PI + 2. * std.ln() + z * z)
}

/// Log density of the uniform distribution on `[low, high]`.
#[inline]
pub(crate) fn log_uniform_pdf(low: f64, high: f64) -> f64 {
    -(high - low).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn log_2pi_constant() {
        assert_abs_diff_eq!(LOG_2PI, (2. * PI).ln(), epsilon = 1e-15);
    }

    #[test]
    fn standard_normal_at_zero() {
        let expected = -0.5 * (2. * PI).ln();
        assert_abs_diff_eq!(log_normal_pdf(0., 0., 1.), expected, epsilon = 1e-12);
    }

    #[test]
    fn uniform_over_day() {
        assert_abs_diff_eq!(log_uniform_pdf(0., 24.), -(24f64).ln(), epsilon = 1e-15);
    }

    proptest! {
        #[test]
        fn matches_density(x in -50f64..50f64, mean in -50f64..50f64, std in 0.01f64..20f64) {
            let z = (x - mean) / std;
            let density = (-0.5 * z * z).exp() / (std * (2. * PI).sqrt());
            let logp = log_normal_pdf(x, mean, std);
            prop_assert!((logp - density.ln()).abs() < 1e-8 || density == 0.);
            prop_assert!(logp <= log_normal_pdf(mean, mean, std));
        }
    }
}
