//! In-memory record store with slot-snapshot persistence.
//!
//! # Responsibility
//! - Load the four entity collections from their persistence slots.
//! - Apply CRUD mutations and persist the full snapshot on every change.
//! - Keep SQL and JSON details inside the store boundary.
//!
//! # Invariants
//! - Collection order is insertion order; identifiers are never reused.
//! - A client with pets, and a pet with appointments or vaccines, cannot
//!   be deleted.
//! - Pets reference a live client at creation; appointments and vaccines
//!   reference a live pet at creation. Patches that move a reference are
//!   re-checked the same way.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::appointment::{Appointment, AppointmentId, AppointmentPatch, NewAppointment};
use crate::model::client::{Client, ClientId, ClientPatch, NewClient};
use crate::model::pet::{NewPet, Pet, PetId, PetPatch};
use crate::model::vaccine::{NewVaccine, Vaccine, VaccineId, VaccinePatch};
use chrono::{Days, Local, NaiveDate};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Persistence slot key for the client collection.
pub const SLOT_CLIENTS: &str = "vet_clients";
/// Persistence slot key for the pet collection.
pub const SLOT_PETS: &str = "vet_pets";
/// Persistence slot key for the appointment collection.
pub const SLOT_APPOINTMENTS: &str = "vet_appointments";
/// Persistence slot key for the vaccine collection.
pub const SLOT_VACCINES: &str = "vet_vaccines";

/// Window used by dashboards that do not pick their own horizon.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: u64 = 7;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error distinguishing missing targets from blocked rules.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Snapshot serialization failure.
    Encode(serde_json::Error),
    /// No record with the given identifier exists in the target collection.
    NotFound(Uuid),
    /// Client delete blocked: at least one pet still names this owner.
    ClientHasPets(ClientId),
    /// Pet delete blocked: at least one appointment or vaccine names it.
    PetHasRecords(PetId),
    /// Referenced owner does not exist.
    UnknownClient(ClientId),
    /// Referenced pet does not exist.
    UnknownPet(PetId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Slot table is missing from the connected database.
    MissingSlotsTable,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::ClientHasPets(id) => {
                write!(f, "client {id} still owns pets and cannot be deleted")
            }
            Self::PetHasRecords(id) => write!(
                f,
                "pet {id} still has appointments or vaccines and cannot be deleted"
            ),
            Self::UnknownClient(id) => write!(f, "referenced client does not exist: {id}"),
            Self::UnknownPet(id) => write!(f, "referenced pet does not exist: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "record store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingSlotsTable => write!(f, "record store requires table `slots`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Repository of the four clinic collections backed by slot snapshots.
pub struct RecordStore<'conn> {
    conn: &'conn Connection,
    clients: Vec<Client>,
    pets: Vec<Pet>,
    appointments: Vec<Appointment>,
    vaccines: Vec<Vaccine>,
}

impl<'conn> RecordStore<'conn> {
    /// Loads all collections from a migrated connection.
    ///
    /// An absent or unparsable slot yields an empty collection; a parse
    /// failure is logged and the stale payload is replaced on the next
    /// successful mutation.
    pub fn load(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_slots_ready(conn)?;

        let clients = load_slot(conn, SLOT_CLIENTS)?;
        let pets = load_slot(conn, SLOT_PETS)?;
        let appointments = load_slot(conn, SLOT_APPOINTMENTS)?;
        let vaccines = load_slot(conn, SLOT_VACCINES)?;

        info!(
            "event=store_load module=store status=ok clients={} pets={} appointments={} vaccines={}",
            clients.len(),
            pets.len(),
            appointments.len(),
            vaccines.len()
        );

        Ok(Self {
            conn,
            clients,
            pets,
            appointments,
            vaccines,
        })
    }

    // Clients

    /// Adds a client and returns the stored record with its new ID.
    pub fn add_client(&mut self, draft: NewClient) -> StoreResult<Client> {
        let client = Client::create(draft);
        self.clients.push(client.clone());
        self.persist()?;
        Ok(client)
    }

    /// Merges set patch fields into one client.
    pub fn update_client(&mut self, id: ClientId, patch: ClientPatch) -> StoreResult<()> {
        let index = self.client_index(id)?;
        self.clients[index].apply(patch);
        self.persist()
    }

    /// Deletes one client unless a pet still references it.
    pub fn delete_client(&mut self, id: ClientId) -> StoreResult<()> {
        let index = self.client_index(id)?;
        if self.pets.iter().any(|pet| pet.client_id == id) {
            return Err(StoreError::ClientHasPets(id));
        }
        self.clients.remove(index);
        self.persist()
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    /// All clients in creation order.
    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    // Pets

    /// Adds a pet after checking that its owner exists.
    pub fn add_pet(&mut self, draft: NewPet) -> StoreResult<Pet> {
        self.ensure_client_exists(draft.client_id)?;
        let pet = Pet::create(draft);
        self.pets.push(pet.clone());
        self.persist()?;
        Ok(pet)
    }

    /// Merges set patch fields into one pet; an owner change is re-checked.
    pub fn update_pet(&mut self, id: PetId, patch: PetPatch) -> StoreResult<()> {
        let index = self.pet_index(id)?;
        if let Some(client_id) = patch.client_id {
            self.ensure_client_exists(client_id)?;
        }
        self.pets[index].apply(patch);
        self.persist()
    }

    /// Deletes one pet unless an appointment or vaccine still references it.
    pub fn delete_pet(&mut self, id: PetId) -> StoreResult<()> {
        let index = self.pet_index(id)?;
        let referenced = self
            .appointments
            .iter()
            .any(|appointment| appointment.pet_id == id)
            || self.vaccines.iter().any(|vaccine| vaccine.pet_id == id);
        if referenced {
            return Err(StoreError::PetHasRecords(id));
        }
        self.pets.remove(index);
        self.persist()
    }

    pub fn pet(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }

    /// All pets in creation order.
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    /// Pets owned by one client, in collection order.
    pub fn pets_by_client(&self, client_id: ClientId) -> Vec<&Pet> {
        self.pets
            .iter()
            .filter(|pet| pet.client_id == client_id)
            .collect()
    }

    /// Case-insensitive substring search over pet name, species, and breed.
    /// An empty term matches everything.
    pub fn search_pets(&self, term: &str) -> Vec<&Pet> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.pets.iter().collect();
        }
        self.pets
            .iter()
            .filter(|pet| {
                pet.name.to_lowercase().contains(&needle)
                    || pet.species.to_lowercase().contains(&needle)
                    || pet
                        .breed
                        .as_deref()
                        .is_some_and(|breed| breed.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Case-insensitive substring search over client name, phone, and email.
    /// An empty term matches everything.
    pub fn search_clients(&self, term: &str) -> Vec<&Client> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.clients.iter().collect();
        }
        self.clients
            .iter()
            .filter(|client| {
                client.name.to_lowercase().contains(&needle)
                    || client.phone.to_lowercase().contains(&needle)
                    || client
                        .email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&needle))
            })
            .collect()
    }

    // Appointments

    /// Adds an appointment after checking that its pet exists.
    pub fn add_appointment(&mut self, draft: NewAppointment) -> StoreResult<Appointment> {
        self.ensure_pet_exists(draft.pet_id)?;
        let appointment = Appointment::create(draft);
        self.appointments.push(appointment.clone());
        self.persist()?;
        Ok(appointment)
    }

    /// Merges set patch fields into one appointment; a pet change is
    /// re-checked.
    pub fn update_appointment(
        &mut self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> StoreResult<()> {
        let index = self.appointment_index(id)?;
        if let Some(pet_id) = patch.pet_id {
            self.ensure_pet_exists(pet_id)?;
        }
        self.appointments[index].apply(patch);
        self.persist()
    }

    /// Deletes one appointment. Appointments are leaf records and carry no
    /// delete guard.
    pub fn delete_appointment(&mut self, id: AppointmentId) -> StoreResult<()> {
        let index = self.appointment_index(id)?;
        self.appointments.remove(index);
        self.persist()
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments
            .iter()
            .find(|appointment| appointment.id == id)
    }

    /// All appointments in creation order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Appointments on exactly `date`, in collection order.
    pub fn appointments_by_date(&self, date: NaiveDate) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| appointment.date == date)
            .collect()
    }

    /// Appointments dated within `[today, today + window_days]` inclusive,
    /// sorted ascending by date, then by time.
    pub fn upcoming_appointments(&self, window_days: u64) -> Vec<&Appointment> {
        let today = today();
        let end = today
            .checked_add_days(Days::new(window_days))
            .unwrap_or(NaiveDate::MAX);

        let mut upcoming: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|appointment| appointment.date >= today && appointment.date <= end)
            .collect();
        upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
        upcoming
    }

    // Vaccines

    /// Adds a vaccine record after checking that its pet exists.
    pub fn add_vaccine(&mut self, draft: NewVaccine) -> StoreResult<Vaccine> {
        self.ensure_pet_exists(draft.pet_id)?;
        let vaccine = Vaccine::create(draft);
        self.vaccines.push(vaccine.clone());
        self.persist()?;
        Ok(vaccine)
    }

    /// Merges set patch fields into one vaccine record; a pet change is
    /// re-checked.
    pub fn update_vaccine(&mut self, id: VaccineId, patch: VaccinePatch) -> StoreResult<()> {
        let index = self.vaccine_index(id)?;
        if let Some(pet_id) = patch.pet_id {
            self.ensure_pet_exists(pet_id)?;
        }
        self.vaccines[index].apply(patch);
        self.persist()
    }

    /// Deletes one vaccine record. Vaccines are leaf records and carry no
    /// delete guard.
    pub fn delete_vaccine(&mut self, id: VaccineId) -> StoreResult<()> {
        let index = self.vaccine_index(id)?;
        self.vaccines.remove(index);
        self.persist()
    }

    pub fn vaccine(&self, id: VaccineId) -> Option<&Vaccine> {
        self.vaccines.iter().find(|vaccine| vaccine.id == id)
    }

    /// All vaccine records in creation order.
    pub fn vaccines(&self) -> &[Vaccine] {
        &self.vaccines
    }

    /// Vaccine records for one pet, in collection order.
    pub fn vaccines_by_pet(&self, pet_id: PetId) -> Vec<&Vaccine> {
        self.vaccines
            .iter()
            .filter(|vaccine| vaccine.pet_id == pet_id)
            .collect()
    }

    /// Vaccine records whose booster is due on or before today.
    pub fn pending_vaccines(&self) -> Vec<&Vaccine> {
        let today = today();
        self.vaccines
            .iter()
            .filter(|vaccine| vaccine.is_due(today))
            .collect()
    }

    // Lookup and persistence internals

    fn client_index(&self, id: ClientId) -> StoreResult<usize> {
        self.clients
            .iter()
            .position(|client| client.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn pet_index(&self, id: PetId) -> StoreResult<usize> {
        self.pets
            .iter()
            .position(|pet| pet.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn appointment_index(&self, id: AppointmentId) -> StoreResult<usize> {
        self.appointments
            .iter()
            .position(|appointment| appointment.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn vaccine_index(&self, id: VaccineId) -> StoreResult<usize> {
        self.vaccines
            .iter()
            .position(|vaccine| vaccine.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn ensure_client_exists(&self, id: ClientId) -> StoreResult<()> {
        if self.client(id).is_none() {
            return Err(StoreError::UnknownClient(id));
        }
        Ok(())
    }

    fn ensure_pet_exists(&self, id: PetId) -> StoreResult<()> {
        if self.pet(id).is_none() {
            return Err(StoreError::UnknownPet(id));
        }
        Ok(())
    }

    /// Writes all four collections into their slots in one transaction, so
    /// a crash can never leave the slots mutually inconsistent.
    fn persist(&self) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        write_slot(&tx, SLOT_CLIENTS, &self.clients)?;
        write_slot(&tx, SLOT_PETS, &self.pets)?;
        write_slot(&tx, SLOT_APPOINTMENTS, &self.appointments)?;
        write_slot(&tx, SLOT_VACCINES, &self.vaccines)?;
        tx.commit()?;
        Ok(())
    }
}

/// Today's local calendar date.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load_slot<T: DeserializeOwned>(conn: &Connection, key: &str) -> StoreResult<Vec<T>> {
    let payload: Option<String> = conn
        .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
            row.get(0)
        })
        .optional()?;

    let Some(payload) = payload else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&payload) {
        Ok(records) => Ok(records),
        Err(err) => {
            warn!(
                "event=slot_load module=store status=error slot={key} error={err} action=reset_empty"
            );
            Ok(Vec::new())
        }
    }
}

fn write_slot<T: Serialize>(tx: &Transaction<'_>, key: &str, records: &[T]) -> StoreResult<()> {
    let payload = serde_json::to_string(records)?;
    tx.execute(
        "INSERT INTO slots (key, value)
         VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, payload],
    )?;
    Ok(())
}

fn ensure_slots_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'slots'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StoreError::MissingSlotsTable);
    }

    Ok(())
}
