//! Refund policy
//!
//! Pure, deterministic tier functions. `now` is always an explicit
//! parameter so the policy never reads a wall clock.

const DAY_MS: i64 = 86_400_000;

/// Outcome of the refund policy for one payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RefundQuote {
    pub refund_amount: i64,
    pub refund_rate: u32,
}

/// Tiered refund schedule, measured in whole days remaining until the
/// event (rounded up):
/// - 2+ days out: full refund
/// - 1 day out: half refund (floored)
/// - day-of or past: no refund
pub fn calculate_refund(original_amount: i64, event_at_ms: i64, now_ms: i64) -> RefundQuote {
    let diff = event_at_ms - now_ms;
    let diff_days = if diff <= 0 {
        0
    } else {
        (diff + DAY_MS - 1) / DAY_MS
    };

    if diff_days >= 2 {
        RefundQuote {
            refund_amount: original_amount,
            refund_rate: 100,
        }
    } else if diff_days >= 1 {
        RefundQuote {
            refund_amount: original_amount / 2,
            refund_rate: 50,
        }
    } else {
        RefundQuote {
            refund_amount: 0,
            refund_rate: 0,
        }
    }
}

/// Platform fee: 5% of the amount, floored
pub fn platform_fee(amount: i64) -> i64 {
    amount * 5 / 100
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_full_refund_two_or_more_days_out() {
        let q = calculate_refund(100_000, NOW + 3 * DAY_MS, NOW);
        assert_eq!(q, RefundQuote { refund_amount: 100_000, refund_rate: 100 });

        let q = calculate_refund(100_000, NOW + 2 * DAY_MS, NOW);
        assert_eq!(q.refund_rate, 100);
    }

    #[test]
    fn test_half_refund_one_day_out() {
        let q = calculate_refund(100_000, NOW + DAY_MS, NOW);
        assert_eq!(q, RefundQuote { refund_amount: 50_000, refund_rate: 50 });
    }

    #[test]
    fn test_half_refund_floors_odd_amounts() {
        let q = calculate_refund(99_999, NOW + DAY_MS, NOW);
        assert_eq!(q.refund_amount, 49_999);
    }

    #[test]
    fn test_no_refund_on_event_day() {
        let q = calculate_refund(100_000, NOW, NOW);
        assert_eq!(q, RefundQuote { refund_amount: 0, refund_rate: 0 });
    }

    #[test]
    fn test_no_refund_after_event() {
        let q = calculate_refund(100_000, NOW - DAY_MS, NOW);
        assert_eq!(q.refund_rate, 0);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        // 25 hours out rounds up to 2 days → full refund
        let q = calculate_refund(100_000, NOW + DAY_MS + 3_600_000, NOW);
        assert_eq!(q.refund_rate, 100);

        // 1 millisecond out rounds up to 1 day → half refund
        let q = calculate_refund(100_000, NOW + 1, NOW);
        assert_eq!(q.refund_rate, 50);
    }

    #[test]
    fn test_platform_fee_floors() {
        assert_eq!(platform_fee(100_000), 5_000);
        assert_eq!(platform_fee(99), 4);
        assert_eq!(platform_fee(19), 0);
        assert_eq!(platform_fee(0), 0);
    }
}
