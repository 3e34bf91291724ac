//! Small numeric helpers shared by the analyzers

/// Round to two decimal places, the precision used for every reported
/// percentage and mean.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// `part / whole * 100`, rounded to two decimals; 0 when the whole is 0.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(50.0), 50.0);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 2), 50.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(0, 0), 0.0);
    }
}
