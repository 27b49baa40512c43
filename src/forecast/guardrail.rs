//! Forecast guardrails.
//!
//! Raw model output can go negative or explode on short noisy series. The
//! guardrail walk corrects each step against the *running previous value*,
//! which is itself the guarded output of the prior step — not the raw
//! forecast. Order within a step matters: clamp the negative first, then
//! check the growth cap against the clamped value.

use crate::math::round2;

/// A value above `prev * MAX_JUMP_RATIO` is considered explosive.
const MAX_JUMP_RATIO: f64 = 5.0;

/// Explosive values are replaced by `prev * GROWTH_CAP`.
const GROWTH_CAP: f64 = 1.5;

/// Guard one forecast track (mean, lower, or upper).
///
/// `prev` is seeded from the last actual observation and carried forward as
/// an explicit fold accumulator through the guarded values.
pub fn apply_guardrails(values: &[f64], last_actual: f64) -> Vec<f64> {
    values
        .iter()
        .fold(
            (Vec::with_capacity(values.len()), last_actual),
            |(mut guarded, prev), &raw| {
                let clamped = if raw < 0.0 { 0.0 } else { raw };
                let capped = if prev > 0.0 && clamped > prev * MAX_JUMP_RATIO {
                    prev * GROWTH_CAP
                } else {
                    clamped
                };
                let value = round2(capped);
                guarded.push(value);
                (guarded, value)
            },
        )
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_explosive_growth_then_chains_prev_through_guarded_values() {
        // prev=100: 700 > 500 caps to 150; prev becomes 150, so 50 passes;
        // prev becomes 50; -5 clamps to 0.
        let guarded = apply_guardrails(&[700.0, 50.0, -5.0], 100.0);
        assert_eq!(guarded, vec![150.0, 50.0, 0.0]);
    }

    #[test]
    fn clamps_negatives_to_exactly_zero() {
        let guarded = apply_guardrails(&[-1.0, -0.001], 10.0);
        assert_eq!(guarded, vec![0.0, 0.0]);
    }

    #[test]
    fn cap_check_is_skipped_once_prev_reaches_zero() {
        // After the clamp to 0, prev is 0 and the growth cap no longer
        // applies, so any later value passes through unchanged.
        let guarded = apply_guardrails(&[-5.0, 1000.0], 10.0);
        assert_eq!(guarded, vec![0.0, 1000.0]);
    }

    #[test]
    fn clamp_happens_before_the_cap_check() {
        // A negative never trips the cap, even with small positive prev.
        let guarded = apply_guardrails(&[-100.0], 0.001);
        assert_eq!(guarded, vec![0.0]);
    }

    #[test]
    fn benign_values_only_get_rounded() {
        let guarded = apply_guardrails(&[101.239, 102.001], 100.0);
        assert_eq!(guarded, vec![101.24, 102.0]);
    }

    #[test]
    fn boundary_five_times_prev_is_not_capped() {
        // Strictly greater than 5x trips the cap; exactly 5x does not.
        let guarded = apply_guardrails(&[500.0], 100.0);
        assert_eq!(guarded, vec![500.0]);
    }
}
