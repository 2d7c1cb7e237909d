//! Open/closed decision for a single terminal.
//!
//! The evaluator resolves the terminal's timezone (from its coordinates,
//! or by geocoding `address_struct.city_name`), converts "now" into that
//! zone and checks the working-hours entry for the local weekday.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::WeekStart;
use crate::error::TerminalError;
use crate::models::{Availability, Coordinates, TerminalId, TerminalRecord, WorkingHoursEntry};
use crate::services::{Geocoder, TimezoneLookup};

const CLOCK_FORMAT: &str = "%H:%M";

/// Coordinates and timezone used to compute a terminal's local time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub timezone: Tz,
}

/// Result of [`AvailabilityEvaluator::evaluate`].
///
/// `location` is `None` when no schedule was published or when the
/// terminal could not be located and the caller's offset was used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub availability: Availability,
    pub location: Option<ResolvedLocation>,
}

pub struct AvailabilityEvaluator<G, T> {
    geocoder: G,
    timezones: T,
    week_start: WeekStart,
    /// Geocoded coordinates keyed by terminal id, together with the city
    /// name they were geocoded from. A different city name for the same id
    /// is geocoded again.
    geocoded: HashMap<TerminalId, (String, Coordinates)>,
}

impl<G, T> AvailabilityEvaluator<G, T>
where
    G: Geocoder,
    T: TimezoneLookup,
{
    pub fn new(geocoder: G, timezones: T) -> Self {
        Self {
            geocoder,
            timezones,
            week_start: WeekStart::default(),
            geocoded: HashMap::new(),
        }
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Coordinates previously geocoded for `id`, if any
    pub fn cached_coordinates(&self, id: &TerminalId) -> Option<Coordinates> {
        self.geocoded.get(id).map(|(_, coordinates)| *coordinates)
    }

    /// Decide whether `record` is open at `now`.
    ///
    /// Geocoding and timezone-service failures are returned as errors.
    /// Only the "nothing to locate the terminal with" case falls back to
    /// the offset carried by `now`.
    pub async fn evaluate(
        &mut self,
        record: &TerminalRecord,
        now: DateTime<FixedOffset>,
    ) -> Result<Evaluation, TerminalError> {
        let Some(schedule) = record.schedule() else {
            debug!(terminal = %record.id(), "no working hours published");
            return Ok(Evaluation {
                availability: Availability::Unknown,
                location: None,
            });
        };
        let schedule = schedule?;

        let location = self.resolve_location(record).await?;
        let local_now = match &location {
            Some(resolved) => now.with_timezone(&resolved.timezone).naive_local(),
            None => now.naive_local(),
        };

        let availability = availability_at(&schedule, local_now, self.week_start)?;
        debug!(terminal = %record.id(), %local_now, %availability, "evaluated");

        Ok(Evaluation {
            availability,
            location,
        })
    }

    async fn resolve_location(
        &mut self,
        record: &TerminalRecord,
    ) -> Result<Option<ResolvedLocation>, TerminalError> {
        let coordinates = if let Some(coordinates) = record.coordinates() {
            coordinates
        } else if let Some(city_name) = record.city_name() {
            let cached = self
                .geocoded
                .get(record.id())
                .filter(|(cached_city, _)| cached_city == city_name)
                .map(|(_, coordinates)| *coordinates);
            match cached {
                Some(coordinates) => coordinates,
                None => {
                    let coordinates = self.geocoder.geocode(city_name).await?;
                    self.geocoded
                        .insert(record.id().clone(), (city_name.to_string(), coordinates));
                    coordinates
                }
            }
        } else {
            warn!(
                terminal = %record.id(),
                "coordinates and city name not found, assuming local time"
            );
            return Ok(None);
        };

        let timezone = self.timezones.timezone_at(coordinates).await?;
        Ok(Some(ResolvedLocation {
            coordinates,
            timezone,
        }))
    }
}

/// Check `schedule` against a wall-clock time already in the terminal's zone.
///
/// The first entry whose `dow` matches wins. The window is
/// `[time_open, time_close)`; windows crossing midnight are not supported.
pub fn availability_at(
    schedule: &[WorkingHoursEntry],
    local_now: NaiveDateTime,
    week_start: WeekStart,
) -> Result<Availability, TerminalError> {
    let today = day_of_week(local_now.weekday(), week_start);

    let mut todays_entry = None;
    for entry in schedule {
        if entry.dow.is_none() {
            return Err(TerminalError::MalformedSchedule(
                "entry without `dow`".to_string(),
            ));
        }
        if entry.is_day(today) {
            todays_entry = Some(entry);
            break;
        }
    }

    let Some(entry) = todays_entry else {
        return Ok(Availability::Closed);
    };

    let open = parse_clock(entry.time_open.as_ref(), "time_open")?;
    let close = parse_clock(entry.time_close.as_ref(), "time_close")?;
    let time = local_now.time();

    if open <= time && time < close {
        Ok(Availability::Open)
    } else {
        Ok(Availability::Closed)
    }
}

fn day_of_week(weekday: Weekday, week_start: WeekStart) -> u8 {
    let index = match week_start {
        WeekStart::Monday => weekday.num_days_from_monday(),
        WeekStart::Sunday => weekday.num_days_from_sunday(),
    };
    // always 0..=6
    index as u8
}

fn parse_clock(value: Option<&Value>, field: &str) -> Result<NaiveTime, TerminalError> {
    let value =
        value.ok_or_else(|| TerminalError::MalformedSchedule(format!("entry without `{field}`")))?;
    let value = value
        .as_str()
        .ok_or_else(|| TerminalError::MalformedSchedule(format!("{field} {value} is not text")))?;
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT)
        .map_err(|err| TerminalError::MalformedSchedule(format!("{field} {value:?}: {err}")))
}
