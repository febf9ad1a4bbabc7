use super::clock::Clock;
use crate::domain::ActionKind;
use crate::infrastructure::db::entities::user;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use pairvote_errors::AppError;
use sea_orm::{entity::*, query::*, DatabaseTransaction};
use std::sync::Arc;

/// Per-day caps for the two write actions. `None` disables enforcement for
/// that action (the action is still counted).
#[derive(Debug, Clone, Copy)]
pub struct QuotaLimits {
    pub suggestions_per_day: Option<u32>,
    pub votes_per_day: Option<u32>,
}

impl QuotaLimits {
    fn for_action(&self, kind: ActionKind) -> Option<u32> {
        match kind {
            ActionKind::Suggestion => self.suggestions_per_day,
            ActionKind::Vote => self.votes_per_day,
        }
    }
}

/// Civil date (`YYYY-MM-DD`) of `now` in the given zone. The quota day rolls
/// over at local midnight, not at UTC midnight.
pub fn civil_date(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuotaDecision {
    allowed: bool,
    fresh_day: bool,
    next_count: i32,
}

/// Check-and-increment against a counter/date pair. Pure: the tracker
/// persists the outcome, this decides it.
fn assess(count: i32, last_date: Option<&str>, today: &str, limit: Option<u32>) -> QuotaDecision {
    let fresh_day = last_date != Some(today);
    let effective = if fresh_day { 0 } else { count };

    match limit {
        Some(l) if effective >= l as i32 => QuotaDecision {
            allowed: false,
            fresh_day,
            next_count: effective,
        },
        _ => QuotaDecision {
            allowed: true,
            fresh_day,
            next_count: effective + 1,
        },
    }
}

#[derive(Clone)]
pub struct QuotaTracker {
    tz: Tz,
    limits: QuotaLimits,
    clock: Arc<dyn Clock>,
}

impl QuotaTracker {
    pub fn new(tz: Tz, limits: QuotaLimits, clock: Arc<dyn Clock>) -> Self {
        Self { tz, limits, clock }
    }

    /// Today's civil date in the configured zone.
    pub fn today(&self) -> String {
        civil_date(self.clock.now(), self.tz)
    }

    /// Counters that would apply right now: stale counters read as zero.
    /// The persisted reset happens on the next consume.
    pub fn fresh_view(&self, mut u: crate::domain::User) -> crate::domain::User {
        let today = self.today();
        if u.last_suggestion_date.as_deref() != Some(today.as_str()) {
            u.suggestions_today = 0;
        }
        if u.last_vote_date.as_deref() != Some(today.as_str()) {
            u.votes_today = 0;
        }
        u
    }

    /// Atomic check-and-increment for one user and action kind.
    ///
    /// Takes the caller's transaction, not a bare connection: the user row
    /// is read under `FOR UPDATE`, and the lock must survive until the
    /// caller commits so two concurrent requests by the same user serialize
    /// here and cannot both pass with one slot remaining. Returns `false`
    /// (without incrementing) when the limit is already reached; a stale
    /// counter is reset and persisted even when the outcome is a denial.
    pub async fn check_and_consume(
        &self,
        txn: &DatabaseTransaction,
        user_id: &str,
        kind: ActionKind,
    ) -> Result<bool, AppError> {
        let row = user::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?;

        let today = self.today();
        let (count, last_date) = match kind {
            ActionKind::Suggestion => (row.suggestions_today, row.last_suggestion_date.clone()),
            ActionKind::Vote => (row.votes_today, row.last_vote_date.clone()),
        };

        let decision = assess(count, last_date.as_deref(), &today, self.limits.for_action(kind));

        if decision.allowed || decision.fresh_day {
            let mut active: user::ActiveModel = row.into();
            match kind {
                ActionKind::Suggestion => {
                    active.suggestions_today = Set(decision.next_count);
                    active.last_suggestion_date = Set(Some(today));
                }
                ActionKind::Vote => {
                    active.votes_today = Set(decision.next_count);
                    active.last_vote_date = Set(Some(today));
                }
            }
            active.updated_at = Set(Some(self.clock.now()));
            active.update(txn).await?;
        }

        if !decision.allowed {
            tracing::debug!(user_id, action = kind.as_str(), "daily quota reached");
        }

        Ok(decision.allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn civil_date_respects_zone_offset() {
        let tz: Tz = "America/Toronto".parse().unwrap();

        // 03:00 UTC in winter is 22:00 the previous day in Toronto (EST).
        let winter = Utc.with_ymd_and_hms(2025, 1, 2, 3, 0, 0).unwrap();
        assert_eq!(civil_date(winter, tz), "2025-01-01");

        // Same wall-clock instant in summer crosses too (EDT, UTC-4).
        let summer = Utc.with_ymd_and_hms(2025, 7, 1, 3, 0, 0).unwrap();
        assert_eq!(civil_date(summer, tz), "2025-06-30");

        let midday = Utc.with_ymd_and_hms(2025, 1, 2, 15, 0, 0).unwrap();
        assert_eq!(civil_date(midday, tz), "2025-01-02");
    }

    #[test]
    fn last_slot_allows_then_denies() {
        let today = "2025-03-10";
        let d = assess(4, Some(today), today, Some(5));
        assert!(d.allowed);
        assert_eq!(d.next_count, 5);

        let d = assess(5, Some(today), today, Some(5));
        assert!(!d.allowed);
        assert_eq!(d.next_count, 5);
    }

    #[test]
    fn new_day_resets_counter_to_one() {
        let d = assess(5, Some("2025-03-09"), "2025-03-10", Some(5));
        assert!(d.allowed);
        assert!(d.fresh_day);
        assert_eq!(d.next_count, 1);
    }

    #[test]
    fn absent_date_counts_as_fresh_day() {
        let d = assess(0, None, "2025-03-10", Some(5));
        assert!(d.allowed);
        assert!(d.fresh_day);
        assert_eq!(d.next_count, 1);
    }

    #[test]
    fn disabled_limit_always_allows() {
        let d = assess(10_000, Some("2025-03-10"), "2025-03-10", None);
        assert!(d.allowed);
        assert_eq!(d.next_count, 10_001);
    }

    #[test]
    fn zero_limit_denies_even_on_fresh_day() {
        let d = assess(3, Some("2025-03-09"), "2025-03-10", Some(0));
        assert!(!d.allowed);
        assert!(d.fresh_day);
        assert_eq!(d.next_count, 0);
    }

    #[test]
    fn fresh_view_zeroes_stale_counters() {
        struct Frozen(DateTime<Utc>);
        impl Clock for Frozen {
            fn now(&self) -> DateTime<Utc> {
                self.0
            }
        }

        let tz: Tz = "America/Toronto".parse().unwrap();
        let clock = Arc::new(Frozen(Utc.with_ymd_and_hms(2025, 3, 10, 15, 0, 0).unwrap()));
        let tracker = QuotaTracker::new(
            tz,
            QuotaLimits {
                suggestions_per_day: Some(5),
                votes_per_day: Some(10),
            },
            clock,
        );
        assert_eq!(tracker.today(), "2025-03-10");

        let user = crate::domain::User {
            id: "u1".into(),
            email: "u1@example.com".into(),
            name: "U1".into(),
            suggestions_today: 5,
            votes_today: 3,
            last_suggestion_date: Some("2025-03-09".into()),
            last_vote_date: Some("2025-03-10".into()),
            created_at: None,
            updated_at: None,
        };

        let view = tracker.fresh_view(user);
        assert_eq!(view.suggestions_today, 0);
        assert_eq!(view.votes_today, 3);
    }
}
