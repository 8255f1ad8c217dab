use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use tracing::warn;

use crate::error::StatsError;

const TIME_FORMAT: &str = "%H:%M:%S";
const NO_TIME: &str = "--:--:--";
const MAX_SECONDS: u64 = 24 * 60 * 60 - 1;

/// Win count and best completion time, kept between runs.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[derive(Debug)]
pub struct Stats {
    pub wins: u32,
    pub best_time: Option<Duration>,
}

impl Stats {
    /// Reads the stats file. A missing or garbled file just means a fresh start.
    pub fn load<P: AsRef<Path>>(path: P) -> Stats {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(ref err) if err.kind() == ErrorKind::NotFound => return Stats::default(),
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read stats file");
                return Stats::default();
            },
        };
        match Stats::parse(&text) {
            Ok(stats) => stats,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring stats file");
                Stats::default()
            },
        }
    }

    pub fn parse(text: &str) -> Result<Stats, StatsError> {
        let mut lines = text.lines();
        let wins = lines.next().unwrap_or("").trim();
        let wins = wins.parse::<u32>()
            .map_err(|_| StatsError::Malformed(format!("win count {:?}", wins)))?;
        let best_time = match lines.next().map(str::trim) {
            None | Some("") | Some(NO_TIME) => None,
            Some(time) => {
                let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
                    .map_err(|_| StatsError::Malformed(format!("best time {:?}", time)))?;
                Some(Duration::from_secs(u64::from(time.num_seconds_from_midnight())))
            },
        };
        Ok(Stats{wins, best_time})
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StatsError> {
        fs::write(path, self.render())?;
        Ok(())
    }

    pub fn render(&self) -> String {
        let time = self.best_time.map_or_else(|| NO_TIME.to_string(), format_time);
        format!("{}\n{}\n", self.wins, time)
    }

    /// Counts a win. Returns true if `elapsed` is a new best time.
    pub fn record_win(&mut self, elapsed: Duration) -> bool {
        let elapsed = Duration::from_secs(elapsed.as_secs().min(MAX_SECONDS));
        self.wins = self.wins.saturating_add(1);
        match self.best_time {
            Some(best) if best <= elapsed => false,
            _ => {
                self.best_time = Some(elapsed);
                true
            },
        }
    }
}

/// `HH:MM:SS`, saturating at one second short of a day.
pub fn format_time(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs().min(MAX_SECONDS) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
        .map(|time| time.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| NO_TIME.to_string())
}
