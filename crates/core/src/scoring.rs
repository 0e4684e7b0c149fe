//! Scoring module - time and move penalties
//!
//! `score = max(0, 10000 - floor(seconds * 15) - moves * 120)`
//!
//! Elapsed time is carried in whole milliseconds, so `floor(ms * 15 / 1000)` equals
//! the seconds form exactly and no float rounding can leak into a frozen score.

use crate::types::{SCORE_BASE, SCORE_PENALTY_PER_MOVE, SCORE_PENALTY_PER_SECOND};

/// Score for `elapsed_ms` of play and `moves` comparisons.
pub fn calculate_score(elapsed_ms: u64, moves: u32) -> u32 {
    let time_penalty = elapsed_ms.saturating_mul(SCORE_PENALTY_PER_SECOND) / 1000;
    let move_penalty = u64::from(moves) * u64::from(SCORE_PENALTY_PER_MOVE);
    u64::from(SCORE_BASE)
        .saturating_sub(time_penalty)
        .saturating_sub(move_penalty) as u32
}

/// Score from fractional elapsed seconds.
pub fn score_at(elapsed_secs: f64, moves: u32) -> u32 {
    let time_penalty = (elapsed_secs.max(0.0) * SCORE_PENALTY_PER_SECOND as f64).floor();
    let move_penalty = f64::from(moves) * f64::from(SCORE_PENALTY_PER_MOVE);
    (f64::from(SCORE_BASE) - time_penalty - move_penalty).max(0.0) as u32
}

/// Format elapsed milliseconds as `MM:SS`.
///
/// Minutes are zero-padded to two digits and are not capped at 59.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_score() {
        assert_eq!(calculate_score(0, 0), 10_000);
    }

    #[test]
    fn test_penalties() {
        // 1 second = 15 points, 1 move = 120 points.
        assert_eq!(calculate_score(1_000, 0), 9_985);
        assert_eq!(calculate_score(0, 1), 9_880);
        assert_eq!(calculate_score(60_000, 10), 10_000 - 900 - 1_200);
    }

    #[test]
    fn test_time_penalty_floors() {
        // 1.999s * 15 = 29.985 -> 29
        assert_eq!(calculate_score(1_999, 0), 9_971);
        // 66ms * 15 = 0.99 -> 0
        assert_eq!(calculate_score(66, 0), 10_000);
        assert_eq!(calculate_score(67, 0), 9_999);
    }

    #[test]
    fn test_never_negative() {
        assert_eq!(calculate_score(0, 84), 0);
        assert_eq!(calculate_score(u64::MAX, u32::MAX), 0);
        assert_eq!(score_at(1e12, 0), 0);
    }

    #[test]
    fn test_monotonic_in_time_and_moves() {
        let mut prev = calculate_score(0, 0);
        for ms in (0..800_000).step_by(333) {
            let s = calculate_score(ms, 3);
            assert!(s <= prev);
            prev = s;
        }

        let mut prev = u32::MAX;
        for moves in 0..100 {
            let s = calculate_score(12_345, moves);
            assert!(s <= prev);
            prev = s;
        }
    }

    #[test]
    fn test_seconds_form_agrees_with_ms_form() {
        for ms in [0u64, 1, 66, 67, 999, 1_000, 1_999, 45_678, 600_000] {
            for moves in [0u32, 1, 7, 30] {
                assert_eq!(
                    score_at(ms as f64 / 1000.0, moves),
                    calculate_score(ms, moves),
                    "ms={ms} moves={moves}"
                );
            }
        }
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(999), "00:00");
        assert_eq!(format_elapsed(61_000), "01:01");
        assert_eq!(format_elapsed(6_000_000), "100:00");
    }
}
