//! Property tests for cron evaluation.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use insight_scheduler::CronSchedule;
use proptest::prelude::*;

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 2020-01-01 .. 2030-01-01, to the second.
    (1_577_836_800i64..1_893_456_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn expression() -> impl Strategy<Value = String> {
    (1u32..=30, 0u32..24, prop::bool::ANY).prop_map(|(step, hour, pin_hour)| {
        if pin_hour {
            format!("*/{step} {hour} * * *")
        } else {
            format!("*/{step} * * * *")
        }
    })
}

proptest! {
    #[test]
    fn next_run_is_a_later_matching_minute(raw in expression(), now in instant()) {
        let cron = CronSchedule::parse(&raw).unwrap();
        let next = cron.next_after(now).unwrap();
        prop_assert!(next > now);
        prop_assert_eq!(next.second(), 0);
        prop_assert!(cron.matches(next));
    }

    #[test]
    fn no_tick_is_skipped(raw in expression(), now in instant()) {
        let cron = CronSchedule::parse(&raw).unwrap();
        let next = cron.next_after(now).unwrap();
        let mut t = next - Duration::minutes(1);
        while t > now {
            prop_assert!(!cron.matches(t));
            t -= Duration::minutes(1);
        }
    }
}
