//! Appointment domain model.
//!
//! # Invariants
//! - `time` is a fixed-width `HH:MM` wall-clock string, so lexicographic
//!   ordering equals chronological ordering within one day.

use crate::model::pet::PetId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an appointment record.
pub type AppointmentId = Uuid;

/// Status assigned to every newly created appointment.
pub const STATUS_SCHEDULED: &str = "scheduled";

/// Scheduled visit for one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub pet_id: PetId,
    pub date: NaiveDate,
    /// `HH:MM` wall-clock time.
    pub time: String,
    /// Free-text visit category, e.g. "checkup" or "vaccination".
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: Option<String>,
    /// Free-text lifecycle label; new records start as [`STATUS_SCHEDULED`].
    pub status: String,
}

/// Input shape for creating an appointment; the store assigns the identifier
/// and the initial status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub pet_id: PetId,
    pub date: NaiveDate,
    pub time: String,
    pub kind: String,
    pub notes: Option<String>,
}

/// Field-level merge patch for an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentPatch {
    pub pet_id: Option<PetId>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub kind: Option<String>,
    pub notes: Option<Option<String>>,
    pub status: Option<String>,
}

impl Appointment {
    /// Creates an appointment record with a freshly generated stable ID.
    pub fn create(draft: NewAppointment) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id: draft.pet_id,
            date: draft.date,
            time: draft.time,
            kind: draft.kind,
            notes: draft.notes,
            status: STATUS_SCHEDULED.to_string(),
        }
    }

    /// Shallow-merges set patch fields over this record.
    pub fn apply(&mut self, patch: AppointmentPatch) {
        if let Some(pet_id) = patch.pet_id {
            self.pet_id = pet_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}
