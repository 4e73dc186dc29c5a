//! Vaccine record domain model.
//!
//! # Invariants
//! - Status is derived from `next_due`, never stored: a set booster date
//!   means the course is still pending.

use crate::model::pet::PetId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a vaccine record.
pub type VaccineId = Uuid;

/// Derived lifecycle state of a vaccine course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaccineStatus {
    /// A booster date is set; the course is not finished.
    Pending,
    /// No booster date; the course is complete.
    Completed,
}

/// Administered vaccine dose for one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccine {
    pub id: VaccineId,
    pub pet_id: PetId,
    /// Free-text vaccine name, e.g. "rabies".
    #[serde(rename = "type")]
    pub kind: String,
    pub administered: NaiveDate,
    /// Next booster date, when one is scheduled.
    pub next_due: Option<NaiveDate>,
    /// Manufacturer lot code.
    pub lot: Option<String>,
}

/// Input shape for creating a vaccine record; the store assigns the
/// identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVaccine {
    pub pet_id: PetId,
    pub kind: String,
    pub administered: NaiveDate,
    pub next_due: Option<NaiveDate>,
    pub lot: Option<String>,
}

/// Field-level merge patch for a vaccine record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaccinePatch {
    pub pet_id: Option<PetId>,
    pub kind: Option<String>,
    pub administered: Option<NaiveDate>,
    pub next_due: Option<Option<NaiveDate>>,
    pub lot: Option<Option<String>>,
}

impl Vaccine {
    /// Creates a vaccine record with a freshly generated stable ID.
    pub fn create(draft: NewVaccine) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id: draft.pet_id,
            kind: draft.kind,
            administered: draft.administered,
            next_due: draft.next_due,
            lot: draft.lot,
        }
    }

    /// Shallow-merges set patch fields over this record.
    pub fn apply(&mut self, patch: VaccinePatch) {
        if let Some(pet_id) = patch.pet_id {
            self.pet_id = pet_id;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(administered) = patch.administered {
            self.administered = administered;
        }
        if let Some(next_due) = patch.next_due {
            self.next_due = next_due;
        }
        if let Some(lot) = patch.lot {
            self.lot = lot;
        }
    }

    /// Derived status from the booster date.
    pub fn status(&self) -> VaccineStatus {
        if self.next_due.is_some() {
            VaccineStatus::Pending
        } else {
            VaccineStatus::Completed
        }
    }

    /// Whether the booster is due on or before `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        matches!(self.next_due, Some(next_due) if next_due <= today)
    }
}

#[cfg(test)]
mod tests {
    use super::{NewVaccine, Vaccine, VaccineStatus};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn vaccine(next_due: Option<NaiveDate>) -> Vaccine {
        Vaccine::create(NewVaccine {
            pet_id: Uuid::new_v4(),
            kind: "rabies".to_string(),
            administered: NaiveDate::from_ymd_opt(2023, 3, 15).expect("valid date"),
            next_due,
            lot: None,
        })
    }

    #[test]
    fn status_pending_only_while_booster_is_scheduled() {
        let open = vaccine(NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(open.status(), VaccineStatus::Pending);

        let closed = vaccine(None);
        assert_eq!(closed.status(), VaccineStatus::Completed);
    }

    #[test]
    fn due_comparison_is_inclusive_of_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date");
        assert!(vaccine(Some(today)).is_due(today));
        assert!(vaccine(today.pred_opt()).is_due(today));
        assert!(!vaccine(today.succ_opt()).is_due(today));
        assert!(!vaccine(None).is_due(today));
    }
}
