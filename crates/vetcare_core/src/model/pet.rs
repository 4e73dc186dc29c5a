//! Pet domain model.
//!
//! # Invariants
//! - `client_id` names the owning client; the store checks the reference at
//!   creation and on patches that change it.

use crate::model::client::ClientId;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a pet record.
pub type PetId = Uuid;

/// Animal record owned by one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birthdate: Option<NaiveDate>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub client_id: ClientId,
    pub notes: Option<String>,
}

/// Input shape for creating a pet; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub client_id: ClientId,
    pub notes: Option<String>,
}

/// Field-level merge patch for a pet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetPatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<Option<String>>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub weight: Option<Option<f64>>,
    pub client_id: Option<ClientId>,
    pub notes: Option<Option<String>>,
}

impl Pet {
    /// Creates a pet record with a freshly generated stable ID.
    pub fn create(draft: NewPet) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            species: draft.species,
            breed: draft.breed,
            birthdate: draft.birthdate,
            weight: draft.weight,
            client_id: draft.client_id,
            notes: draft.notes,
        }
    }

    /// Shallow-merges set patch fields over this record.
    pub fn apply(&mut self, patch: PetPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(species) = patch.species {
            self.species = species;
        }
        if let Some(breed) = patch.breed {
            self.breed = breed;
        }
        if let Some(birthdate) = patch.birthdate {
            self.birthdate = birthdate;
        }
        if let Some(weight) = patch.weight {
            self.weight = weight;
        }
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

/// Whole completed years between `birthdate` and `today`.
///
/// Returns 0 when the birthday has not yet occurred or `today` precedes the
/// birthdate.
pub fn age_in_years(birthdate: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birthdate.year();
    if (today.month(), today.day()) < (birthdate.month(), birthdate.day()) {
        age -= 1;
    }
    age.max(0) as u32
}
