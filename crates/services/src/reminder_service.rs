use chrono::{DateTime, Duration, NaiveTime, Utc};
use reader_core::Clock;

/// A daily practice reminder time.
///
/// This only computes when the reminder should fire; delivering the
/// notification (and rescheduling after a reboot) is the platform shell's
/// concern, outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSchedule {
    minutes_from_midnight: u32,
}

impl ReminderSchedule {
    /// Daily reminder at `hour:minute` UTC. Returns `None` for an invalid
    /// wall-clock time.
    #[must_use]
    pub fn daily_at(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self {
            minutes_from_midnight: hour * 60 + minute,
        })
    }

    /// The next occurrence strictly after `now`.
    #[must_use]
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let today = midnight + Duration::minutes(i64::from(self.minutes_from_midnight));
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

/// Clock-aware wrapper used by the app layer.
pub struct ReminderService {
    clock: Clock,
    schedule: ReminderSchedule,
}

impl ReminderService {
    #[must_use]
    pub fn new(clock: Clock, schedule: ReminderSchedule) -> Self {
        Self { clock, schedule }
    }

    /// When the next reminder should fire, relative to the service clock.
    #[must_use]
    pub fn next_reminder(&self) -> DateTime<Utc> {
        self.schedule.next_after(self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use reader_core::time::{fixed_clock, fixed_now};

    #[test]
    fn rejects_invalid_wall_clock_times() {
        assert!(ReminderSchedule::daily_at(24, 0).is_none());
        assert!(ReminderSchedule::daily_at(9, 60).is_none());
        assert!(ReminderSchedule::daily_at(23, 59).is_some());
    }

    #[test]
    fn next_fire_is_later_today_when_still_ahead() {
        // fixed_now() is 22:13:20 UTC.
        let schedule = ReminderSchedule::daily_at(23, 0).unwrap();
        let next = schedule.next_after(fixed_now());
        assert_eq!(next.date_naive(), fixed_now().date_naive());
        assert_eq!((next.hour(), next.minute()), (23, 0));
    }

    #[test]
    fn next_fire_rolls_to_tomorrow_when_passed() {
        let schedule = ReminderSchedule::daily_at(9, 30).unwrap();
        let next = schedule.next_after(fixed_now());
        assert_eq!(
            next.date_naive(),
            fixed_now().date_naive() + Duration::days(1)
        );
        assert_eq!((next.hour(), next.minute()), (9, 30));
    }

    #[test]
    fn service_uses_its_clock() {
        let schedule = ReminderSchedule::daily_at(9, 30).unwrap();
        let service = ReminderService::new(fixed_clock(), schedule);
        assert!(service.next_reminder() > fixed_now());
    }
}
