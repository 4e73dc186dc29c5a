//! iCalendar (`.ics`) rendering for appointments.
//!
//! # Invariants
//! - Events are rendered with a fixed one-hour duration.
//! - Timestamps use the basic format `YYYYMMDDTHHMMSS` with punctuation and
//!   fractional seconds stripped.

use crate::model::appointment::{Appointment, AppointmentId};
use crate::store::record_store::RecordStore;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Placeholder used when the referenced pet is no longer resolvable.
const UNKNOWN_PET_NAME: &str = "Pet";

pub type ExportResult<T> = Result<T, ExportError>;

/// Errors from calendar export.
#[derive(Debug)]
pub enum ExportError {
    /// The appointment `time` field is not a `HH:MM` wall-clock value.
    InvalidStart {
        appointment: AppointmentId,
        value: String,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStart { appointment, value } => write!(
                f,
                "appointment {appointment} has unusable start time `{value}`"
            ),
        }
    }
}

impl Error for ExportError {}

/// Renders one appointment as a `VCALENDAR`/`VEVENT` text payload.
///
/// The store is consulted for the pet and its owner; a missing pet falls
/// back to a placeholder name so stale exports still produce a valid event.
pub fn appointment_ics(store: &RecordStore<'_>, appointment: &Appointment) -> ExportResult<String> {
    let pet = store.pet(appointment.pet_id);
    let client = pet.and_then(|pet| store.client(pet.client_id));

    let start = event_start(appointment)?;
    let end = start + Duration::hours(1);

    let pet_name = pet.map_or(UNKNOWN_PET_NAME, |pet| pet.name.as_str());
    let description = match client {
        Some(client) => format!(
            "Appointment scheduled for {pet_name} - owner {}",
            client.name
        ),
        None => format!("Appointment scheduled for {pet_name}"),
    };

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("DTSTART:{}", basic_format(start)),
        format!("DTEND:{}", basic_format(end)),
        format!(
            "SUMMARY:{}",
            escape_text(&format!("Appointment for {pet_name} - {}", appointment.kind))
        ),
        format!("DESCRIPTION:{}", escape_text(&description)),
        "STATUS:CONFIRMED".to_string(),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    Ok(lines.join("\r\n"))
}

/// Suggested download file name for one exported appointment.
pub fn ics_file_name(store: &RecordStore<'_>, appointment: &Appointment) -> String {
    let pet_name = store
        .pet(appointment.pet_id)
        .map_or(UNKNOWN_PET_NAME, |pet| pet.name.as_str());
    format!("Appointment_{pet_name}_{}.ics", appointment.date)
}

fn event_start(appointment: &Appointment) -> ExportResult<NaiveDateTime> {
    let time = NaiveTime::parse_from_str(&appointment.time, "%H:%M").map_err(|_| {
        ExportError::InvalidStart {
            appointment: appointment.id,
            value: appointment.time.clone(),
        }
    })?;
    Ok(NaiveDateTime::new(appointment.date, time))
}

fn basic_format(stamp: NaiveDateTime) -> String {
    stamp.format("%Y%m%dT%H%M%S").to_string()
}

/// Escapes the characters RFC 5545 reserves inside TEXT property values.
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}
