use anyhow::{Context, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use std::future::Future;
use std::time::Duration;

/// Longest single sleep before the wall clock is read again
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// A fixed local wall-clock time at which a job runs every day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    /// Parses an `HH:MM` time of day
    pub fn parse(value: &str) -> Result<Self> {
        let at = NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .with_context(|| format!("Invalid daily time '{}': expected HH:MM", value))?;
        Ok(Self { at })
    }

    pub fn at(&self) -> NaiveTime {
        self.at
    }

    /// The first scheduled instant strictly after `now`, in `now`'s timezone.
    ///
    /// On a day where the scheduled time is repeated, the earlier instant is
    /// used. On a day where it is skipped, the run happens at the same
    /// distance past the start of the gap.
    pub fn next_run_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let mut date = now.date_naive();

        loop {
            if let Some(candidate) = resolve_local(&tz, date.and_time(self.at))
                && candidate > *now
            {
                return candidate;
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => return now.clone(),
            }
        }
    }

    /// Real time left from `now` until the next run
    pub fn delay_from<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        time_until(&self.next_run_after(now), now)
    }

    /// Runs `job` once a day at the scheduled local time, forever.
    pub async fn run_daily<F, Fut>(&self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        loop {
            let next = self.next_run_after(&Local::now());
            tracing::info!(next_run = %next, "Waiting for next scheduled audit");

            // Re-read the clock regularly so suspends and clock changes
            // cannot push the run off its wall-clock time
            loop {
                let remaining = time_until(&next, &Local::now());
                if remaining.is_zero() {
                    break;
                }
                tokio::time::sleep(remaining.min(POLL_INTERVAL)).await;
            }

            tracing::info!("Running scheduled audit");
            job().await;
        }
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            // Gaps are at most an hour in practice
            let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}

fn time_until<Tz: TimeZone>(target: &DateTime<Tz>, now: &DateTime<Tz>) -> Duration {
    (target.clone() - now.clone())
        .to_std()
        .unwrap_or(Duration::ZERO)
}
