//! Schedule and clock traits.
//!
//! The agent keeps a daily schedule; prompts mention today's plan and what
//! the agent is doing right now. The clock is a trait so prompt text that
//! embeds the date and time can be reproduced in tests.

use chrono::{Local, NaiveDateTime};

/// Supplies the agent's daily schedule.
pub trait ScheduleProvider: Send + Sync {
    /// `(start_time, activity)` of the task in progress.
    fn current_task(&self) -> (String, String);

    /// Human-readable text of today's whole schedule.
    fn today_schedule(&self) -> String;
}

/// Source of the current local date and time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
