//! Consecutive oversold days.

/// Number of consecutive most-recent values strictly below `threshold`.
///
/// `rsi` is a causal RSI series, so the value at each day only reflects data
/// up to that day. Counting stops at the first value at or above the
/// threshold, or at warmup NaNs.
pub fn oversold_streak(rsi: &[f64], threshold: f64) -> u32 {
    let mut streak = 0u32;
    for &value in rsi.iter().rev() {
        if value.is_nan() || value >= threshold {
            break;
        }
        streak += 1;
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_trailing_run_only() {
        let rsi = [25.0, 45.0, 28.0, 22.0, 19.0];
        assert_eq!(oversold_streak(&rsi, 30.0), 3);
    }

    #[test]
    fn resets_when_latest_recovers() {
        let rsi = [20.0, 21.0, 22.0, 30.0];
        assert_eq!(oversold_streak(&rsi, 30.0), 0);
    }

    #[test]
    fn stops_at_warmup() {
        let rsi = [f64::NAN, f64::NAN, 10.0, 12.0];
        assert_eq!(oversold_streak(&rsi, 30.0), 2);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(oversold_streak(&[], 30.0), 0);
    }
}
