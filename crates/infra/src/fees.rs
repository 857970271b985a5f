/// Fee splits are expressed in basis points and must always sum to the full
/// denominator, so the two shares reassemble the exact total in cents.
pub const BPS_DENOMINATOR: i64 = 10_000;

/// Split applied when no commission config row exists yet: 10% platform,
/// 90% club.
pub const DEFAULT_PLATFORM_FEE_BPS: i32 = 1_000;
pub const DEFAULT_CLUB_FEE_BPS: i32 = 9_000;

pub fn valid_split(platform_fee_bps: i32, club_fee_bps: i32) -> bool {
    platform_fee_bps >= 0
        && club_fee_bps >= 0
        && platform_fee_bps as i64 + club_fee_bps as i64 == BPS_DENOMINATOR
}

/// Split a total into (platform, club) shares in cents.
///
/// The platform share rounds half up; the club share is the remainder, so
/// the two always sum to `total_cents` exactly.
pub fn split(total_cents: i64, platform_fee_bps: i32) -> (i64, i64) {
    let platform =
        (total_cents * platform_fee_bps as i64 + BPS_DENOMINATOR / 2) / BPS_DENOMINATOR;
    (platform, total_cents - platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_ninety_split() {
        let (platform, club) = split(50_000, 1_000);
        assert_eq!(platform, 5_000);
        assert_eq!(club, 45_000);
    }

    #[test]
    fn rounding_is_half_up() {
        // 12_345 * 10% = 1_234.5, platform takes the rounded-up cent
        let (platform, club) = split(12_345, 1_000);
        assert_eq!(platform, 1_235);
        assert_eq!(club, 11_110);
    }

    #[test]
    fn zero_total() {
        assert_eq!(split(0, 1_000), (0, 0));
    }

    #[test]
    fn full_platform_share() {
        assert_eq!(split(9_999, 10_000), (9_999, 0));
    }

    #[test]
    fn shares_always_reassemble_total() {
        for total in [0, 1, 99, 101, 12_345, 50_000, 123_457, 9_999_999] {
            for bps in [0, 1, 250, 1_000, 1_500, 3_333, 5_000, 9_999, 10_000] {
                let (platform, club) = split(total, bps);
                assert_eq!(platform + club, total, "total {total} bps {bps}");
                assert!(platform >= 0 && club >= 0, "total {total} bps {bps}");
            }
        }
    }

    #[test]
    fn split_validation() {
        assert!(valid_split(1_000, 9_000));
        assert!(valid_split(0, 10_000));
        assert!(!valid_split(1_000, 8_000));
        assert!(!valid_split(6_000, 6_000));
        assert!(!valid_split(-1, 10_001));
    }
}
