//! Static daily schedule read from configuration.

use std::sync::Arc;

use chirp_core::schedule::{Clock, ScheduleProvider};
use chrono::NaiveTime;

/// Activity reported when the schedule is empty.
pub const IDLE_ACTIVITY: &str = "闲着没事";

/// A fixed list of `(start, activity)` slots repeated every day.
pub struct StaticSchedule {
    slots: Vec<(NaiveTime, String)>,
    clock: Arc<dyn Clock>,
}

impl StaticSchedule {
    /// Build from `("HH:MM", activity)` pairs. Unparseable times are dropped.
    pub fn new(entries: Vec<(String, String)>, clock: Arc<dyn Clock>) -> Self {
        let mut slots: Vec<(NaiveTime, String)> = entries
            .into_iter()
            .filter_map(|(start, activity)| {
                NaiveTime::parse_from_str(&start, "%H:%M")
                    .ok()
                    .map(|t| (t, activity))
            })
            .collect();
        slots.sort_by_key(|(t, _)| *t);
        Self { slots, clock }
    }
}

impl ScheduleProvider for StaticSchedule {
    fn current_task(&self) -> (String, String) {
        let now = self.clock.now().time();
        // Before the first slot the last slot of the previous day is still running.
        let slot = self
            .slots
            .iter()
            .rev()
            .find(|(start, _)| *start <= now)
            .or_else(|| self.slots.last());

        match slot {
            Some((start, activity)) => (start.format("%H:%M").to_string(), activity.clone()),
            None => (now.format("%H:%M").to_string(), IDLE_ACTIVITY.into()),
        }
    }

    fn today_schedule(&self) -> String {
        if self.slots.is_empty() {
            return "今天没有特别的安排".into();
        }
        self.slots
            .iter()
            .map(|(start, activity)| format!("{} {}", start.format("%H:%M"), activity))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn at(h: u32, m: u32) -> Arc<dyn Clock> {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap();
        Arc::new(FixedClock(dt))
    }

    fn entries() -> Vec<(String, String)> {
        vec![
            ("12:00".into(), "吃午饭".into()),
            ("08:00".into(), "上课".into()),
            ("23:00".into(), "睡觉".into()),
        ]
    }

    #[test]
    fn current_task_is_latest_started_slot() {
        let schedule = StaticSchedule::new(entries(), at(13, 30));
        assert_eq!(schedule.current_task(), ("12:00".into(), "吃午饭".into()));
    }

    #[test]
    fn before_first_slot_wraps_to_last() {
        let schedule = StaticSchedule::new(entries(), at(6, 0));
        assert_eq!(schedule.current_task().1, "睡觉");
    }

    #[test]
    fn today_schedule_is_sorted() {
        let schedule = StaticSchedule::new(entries(), at(9, 0));
        assert_eq!(schedule.today_schedule(), "08:00 上课\n12:00 吃午饭\n23:00 睡觉");
    }

    #[test]
    fn empty_schedule_is_idle() {
        let schedule = StaticSchedule::new(vec![], at(9, 15));
        assert_eq!(schedule.current_task(), ("09:15".into(), IDLE_ACTIVITY.into()));
        assert!(!schedule.today_schedule().is_empty());
    }

    #[test]
    fn bad_times_dropped() {
        let schedule = StaticSchedule::new(vec![("noon".into(), "x".into())], at(9, 0));
        assert_eq!(schedule.current_task().1, IDLE_ACTIVITY);
    }
}
