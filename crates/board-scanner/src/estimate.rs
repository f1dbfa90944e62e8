use common::{Error, Result};
use tracing::info;

/// Packing-density and calibration allowance applied to the raw fill estimate.
pub const DEFAULT_CORRECTION_FACTOR: f64 = 0.98;

/// Estimate tickets left in a dispenser from its fill ratio.
///
/// Rounds half to even and clamps to `[0, total_tickets]`.
pub fn estimate_tickets(fill_ratio: f64, total_tickets: u64, correction_factor: f64) -> Result<u64> {
    if !(0.0..=1.0).contains(&fill_ratio) {
        return Err(Error::InvalidInput(
            "Fill ratio must be between 0 and 1.".into(),
        ));
    }
    if !correction_factor.is_finite() || correction_factor < 0.0 {
        return Err(Error::InvalidInput(format!(
            "correction factor must be finite and non-negative, got {}",
            correction_factor
        )));
    }

    let raw = (fill_ratio * total_tickets as f64 * correction_factor).round_ties_even();
    let estimated = raw.clamp(0.0, total_tickets as f64) as u64;

    info!(fill_ratio, total_tickets, estimated, "Estimated tickets from dispenser fill");
    Ok(estimated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_full_dispenser() {
        // 0.5 * 2500 * 0.98 = 1225
        assert_eq!(estimate_tickets(0.5, 2500, DEFAULT_CORRECTION_FACTOR).unwrap(), 1225);
    }

    #[test]
    fn test_empty_and_full() {
        assert_eq!(estimate_tickets(0.0, 2500, DEFAULT_CORRECTION_FACTOR).unwrap(), 0);
        assert_eq!(estimate_tickets(1.0, 2500, DEFAULT_CORRECTION_FACTOR).unwrap(), 2450);
        assert_eq!(estimate_tickets(1.0, 0, DEFAULT_CORRECTION_FACTOR).unwrap(), 0);
    }

    #[test]
    fn test_rounds_half_to_even() {
        // 0.5 * 5 * 1.0 = 2.5 -> 2; 0.5 * 7 = 3.5 -> 4
        assert_eq!(estimate_tickets(0.5, 5, 1.0).unwrap(), 2);
        assert_eq!(estimate_tickets(0.5, 7, 1.0).unwrap(), 4);
    }

    #[test]
    fn test_clamped_to_total() {
        assert_eq!(estimate_tickets(1.0, 100, 1.5).unwrap(), 100);
    }

    #[test]
    fn test_rejects_out_of_range_ratio() {
        for bad in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let err = estimate_tickets(bad, 100, DEFAULT_CORRECTION_FACTOR).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "ratio={} err={}", bad, err);
        }
    }

    #[test]
    fn test_rejects_bad_correction_factor() {
        assert!(estimate_tickets(0.5, 100, -1.0).is_err());
        assert!(estimate_tickets(0.5, 100, f64::NAN).is_err());
    }
}
