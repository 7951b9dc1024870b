use crate::utils::parse_utc_offset;
use chrono::{FixedOffset, Local, NaiveDateTime, Utc};
use log::warn;
use std::env;
use std::time::Duration;

const DEFAULT_TICK_SECS: u64 = 60;
// Notification times have minute precision, so no minute may be skipped
const MAX_TICK_SECS: u64 = 60;

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Pause between two ticks
    pub tick_interval: Duration,

    /// Timezone of `notify_time`; server local time when unset
    pub utc_offset: Option<FixedOffset>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(DEFAULT_TICK_SECS),
            utc_offset: None,
        }
    }
}

impl AlertConfig {
    pub fn from_env() -> Self {
        let tick_interval = tick_interval_from(env::var("ALERT_TICK_SECS").ok().as_deref());

        let utc_offset = env::var("NOTIFY_UTC_OFFSET").ok().and_then(|value| {
            let offset = parse_utc_offset(&value);
            if offset.is_none() {
                warn!(
                    "NOTIFY_UTC_OFFSET={} is not a valid offset, using server local time",
                    value
                );
            }
            offset
        });

        Self {
            tick_interval,
            utc_offset,
        }
    }

    pub fn timezone_label(&self) -> String {
        match self.utc_offset {
            Some(offset) => format!("UTC{}", offset),
            None => "server time".to_string(),
        }
    }
}

// Parse ALERT_TICK_SECS, capped so every minute gets a tick
fn tick_interval_from(value: Option<&str>) -> Duration {
    let secs = match value {
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > MAX_TICK_SECS => {
                warn!(
                    "ALERT_TICK_SECS={} would skip notification minutes, using {}",
                    secs, MAX_TICK_SECS
                );
                MAX_TICK_SECS
            }
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "ALERT_TICK_SECS={} is not a positive number, using {}",
                    value, DEFAULT_TICK_SECS
                );
                DEFAULT_TICK_SECS
            }
        },
        None => DEFAULT_TICK_SECS,
    };

    Duration::from_secs(secs)
}

/// Source of the wall-clock time a tick is evaluated at
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock {
    utc_offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn new(utc_offset: Option<FixedOffset>) -> Self {
        Self { utc_offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.utc_offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}
