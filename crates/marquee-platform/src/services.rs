//! Platform service traits and desktop implementation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

use marquee_types::error::{MarqueeError, Result};

// ---------------------------------------------------------------------------
// Power service
// ---------------------------------------------------------------------------

/// Battery / power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryState {
    /// Running on battery.
    Discharging,
    /// Plugged in and charging.
    Charging,
    /// Fully charged, on external power.
    Full,
    /// No battery present (desktop / wall power).
    NoBattery,
}

/// Snapshot of power-related information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerInfo {
    /// Battery charge percentage (0-100), or `None` if no battery.
    pub battery_percent: Option<u8>,
    /// Current battery state.
    pub state: BatteryState,
}

impl PowerInfo {
    pub const NO_BATTERY: Self = Self {
        battery_percent: None,
        state: BatteryState::NoBattery,
    };
}

/// Abstraction over platform power management.
pub trait PowerService {
    /// Query current power information.
    fn power_info(&self) -> Result<PowerInfo>;
}

// ---------------------------------------------------------------------------
// Time service
// ---------------------------------------------------------------------------

/// A simple wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl SystemTime {
    /// Boards without a battery-backed RTC boot at the epoch; anything at or
    /// before 2000 is treated as "clock not set".
    pub fn is_plausible(&self) -> bool {
        self.year > 2000
    }

    /// `HH:MM` rendering used by the clock overlay.
    pub fn hour_minute(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::fmt::Display for SystemTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

/// Abstraction over platform time services.
pub trait TimeService {
    /// Current wall-clock time.
    fn now(&self) -> Result<SystemTime>;
}

// ---------------------------------------------------------------------------
// Desktop implementation
// ---------------------------------------------------------------------------

/// Default platform implementation for desktop/Pi using `std` facilities.
///
/// Battery information comes from the first `BAT*` entry under the power
/// supply class directory (`/sys/class/power_supply` by default).
#[derive(Debug, Clone)]
pub struct DesktopPlatform {
    power_supply_dir: PathBuf,
}

impl DesktopPlatform {
    pub fn new() -> Self {
        Self::with_power_supply_dir("/sys/class/power_supply")
    }

    /// Read batteries from a different directory (tests, containers).
    pub fn with_power_supply_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            power_supply_dir: dir.into(),
        }
    }

    fn find_battery(&self) -> Option<PathBuf> {
        let entries = match std::fs::read_dir(&self.power_supply_dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("{}: {e}", self.power_supply_dir.display());
                return None;
            },
        };
        let mut batteries: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("BAT"))
            })
            .collect();
        batteries.sort();
        batteries.into_iter().next()
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn read_trimmed(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?.trim().to_string())
}

impl PowerService for DesktopPlatform {
    fn power_info(&self) -> Result<PowerInfo> {
        let Some(bat) = self.find_battery() else {
            return Ok(PowerInfo::NO_BATTERY);
        };
        let capacity = read_trimmed(&bat.join("capacity"))?;
        let percent: u8 = capacity
            .parse::<u16>()
            .map(|v| v.min(100) as u8)
            .map_err(|e| MarqueeError::Backend(format!("battery capacity '{capacity}': {e}")))?;
        let status = read_trimmed(&bat.join("status")).unwrap_or_default();
        let state = match status.as_str() {
            "Charging" => BatteryState::Charging,
            "Full" => BatteryState::Full,
            _ => BatteryState::Discharging,
        };
        Ok(PowerInfo {
            battery_percent: Some(percent),
            state,
        })
    }
}

impl TimeService for DesktopPlatform {
    /// Local wall-clock time, in the system time zone.
    fn now(&self) -> Result<SystemTime> {
        Ok(system_time_from_datetime(&Local::now()))
    }
}

/// Wall-clock fields of a zoned timestamp, in that timestamp's own zone.
pub fn system_time_from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> SystemTime {
    SystemTime {
        year: u16::try_from(dt.year()).unwrap_or(0),
        month: dt.month() as u8,
        day: dt.day() as u8,
        hour: dt.hour() as u8,
        minute: dt.minute() as u8,
        second: dt.second() as u8,
    }
}

/// Break a Unix timestamp into a UTC [`SystemTime`].
pub fn system_time_from_unix(secs: u64) -> SystemTime {
    let days = secs / 86400;
    let time_of_day = secs % 86400;
    let (year, month, day) = days_to_ymd(days);
    SystemTime {
        year,
        month,
        day,
        hour: (time_of_day / 3600) as u8,
        minute: ((time_of_day % 3600) / 60) as u8,
        second: (time_of_day % 60) as u8,
    }
}

// ---------------------------------------------------------------------------
// Date helper
// ---------------------------------------------------------------------------

/// Convert days since Unix epoch to (year, month, day).
pub(crate) fn days_to_ymd(mut days: u64) -> (u16, u8, u8) {
    let mut year = 1970u16;
    loop {
        let year_days = if is_leap(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }
    let leap = is_leap(year);
    let month_days: [u64; 12] = [
        31,
        if leap { 29 } else { 28 },
        31,
        30,
        31,
        30,
        31,
        31,
        30,
        31,
        30,
        31,
    ];
    let mut month = 12u8;
    for (i, &md) in month_days.iter().enumerate() {
        if days < md {
            month = (i + 1) as u8;
            break;
        }
        days -= md;
    }
    (year, month, (days + 1) as u8)
}

pub(crate) fn is_leap(y: u16) -> bool {
    (y.is_multiple_of(4) && !y.is_multiple_of(100)) || y.is_multiple_of(400)
}
