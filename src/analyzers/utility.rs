/// Divides a weighted sum by its total weight, rounding half up.
/// Returns `None` when the total weight is zero.
pub fn weighted_mean_rounded(weighted_sum: u128, total_weight: u128) -> Option<u64> {
    if total_weight == 0 {
        return None;
    }
    u64::try_from((weighted_sum + total_weight / 2) / total_weight).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_weight() {
        assert_eq!(weighted_mean_rounded(100, 0), None);
        assert_eq!(weighted_mean_rounded(0, 0), None);
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(weighted_mean_rounded(7000, 40), Some(175));
        assert_eq!(weighted_mean_rounded(5, 2), Some(3));
        assert_eq!(weighted_mean_rounded(7, 3), Some(2));
        assert_eq!(weighted_mean_rounded(8, 3), Some(3));
        assert_eq!(weighted_mean_rounded(0, 9), Some(0));
    }
}
