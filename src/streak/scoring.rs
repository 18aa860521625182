use crate::history::models::{EventKind, MatchEvent};

use super::models::StreakBankEntry;

/// Replays a day's events chronologically and computes the escalating
/// streak point total.
///
/// Each loss converts the current win streak into `streak * points_per_win`
/// points and permanently raises `points_per_win` by the amount gained, so
/// later streaks are worth strictly more than earlier ones. Replay stops
/// once `loss_quota` losses have been scored. A trailing win streak with no
/// terminating loss contributes nothing here; it is only realized through
/// the streak bank's day-end credit ([`banked_bonus`]).
///
/// Pure over the event slice: callers pass events ordered by `ended_at`
/// ascending, and every invocation recomputes from scratch.
pub fn score_events(events: &[MatchEvent], base_points_per_win: i64, loss_quota: u32) -> i64 {
    let mut streak: i64 = 0;
    let mut points_per_win = base_points_per_win;
    let mut points: i64 = 0;
    let mut losses: u32 = 0;

    for event in events {
        match event.kind {
            EventKind::Win => streak += 1,
            EventKind::Loss => {
                let gained = streak * points_per_win;
                points += gained;
                points_per_win += gained;
                streak = 0;
                losses += 1;
                if losses >= loss_quota {
                    break;
                }
            }
        }
    }

    points
}

/// Day-end credit for a banked trailing streak.
///
/// Policy: once a day is banked, its pending streak earns half of the value
/// it would have fetched at the base rate (`pending * base / divisor`,
/// integer division). Computed on read, never persisted; an unbanked day
/// earns nothing.
pub fn banked_bonus(
    entry: Option<&StreakBankEntry>,
    base_points_per_win: i64,
    divisor: i64,
) -> i64 {
    match entry {
        Some(entry) if entry.banked && entry.pending_streak > 0 => {
            entry.pending_streak * base_points_per_win / divisor
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn events(kinds: &[EventKind]) -> Vec<MatchEvent> {
        let start = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| MatchEvent {
                match_id: format!("m{}", i),
                player_key: "alice".to_string(),
                kind: *kind,
                ended_at: start + Duration::hours(i as i64),
            })
            .collect()
    }

    use EventKind::{Loss, Win};

    #[test]
    fn zero_events_score_zero() {
        assert_eq!(score_events(&[], 5, 5), 0);
    }

    #[test]
    fn loss_converts_streak_and_escalates_multiplier() {
        // 2 wins at base 5, then a loss: gained 10, multiplier becomes 15
        assert_eq!(score_events(&events(&[Win, Win, Loss]), 5, 5), 10);

        // A fresh day starts over at the base value
        assert_eq!(score_events(&events(&[Win, Loss]), 5, 5), 5);
    }

    #[test]
    fn later_streaks_are_worth_more() {
        // First loss: 3 * 5 = 15, multiplier 20; second loss: 1 * 20 = 20
        let total = score_events(&events(&[Win, Win, Win, Loss, Win, Loss]), 5, 5);
        assert_eq!(total, 35);
    }

    #[test]
    fn trailing_streak_is_not_scored_by_the_fold() {
        assert_eq!(score_events(&events(&[Win, Win, Win]), 5, 5), 0);
        assert_eq!(
            score_events(&events(&[Win, Loss, Win, Win]), 5, 5),
            score_events(&events(&[Win, Loss]), 5, 5),
        );
    }

    #[test]
    fn replay_stops_at_the_loss_quota() {
        // Quota 2: the third loss (and anything after it) is not scored
        let scored = score_events(&events(&[Win, Loss, Win, Loss, Win, Loss]), 5, 2);
        // First loss: 5, multiplier 10; second loss: 10 -> 15 total
        assert_eq!(scored, 15);
    }

    #[test]
    fn losses_with_no_streak_score_nothing_but_still_escalate_nothing() {
        assert_eq!(score_events(&events(&[Loss, Loss, Win, Loss]), 5, 5), 5);
    }

    fn entry(pending: i64, banked: bool) -> StreakBankEntry {
        StreakBankEntry {
            day: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            pending_streak: pending,
            banked,
        }
    }

    #[test]
    fn bonus_requires_a_banked_nonzero_streak() {
        assert_eq!(banked_bonus(None, 5, 2), 0);
        assert_eq!(banked_bonus(Some(&entry(3, false)), 5, 2), 0);
        assert_eq!(banked_bonus(Some(&entry(0, true)), 5, 2), 0);
        assert_eq!(banked_bonus(Some(&entry(3, true)), 5, 2), 7);
        assert_eq!(banked_bonus(Some(&entry(4, true)), 5, 2), 10);
    }
}
