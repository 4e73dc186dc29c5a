//! Core domain logic for VetCare.
//! This crate is the single source of truth for clinic record invariants.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod report;
pub mod store;

pub use export::ics::{appointment_ics, ics_file_name, ExportError};
pub use logging::{default_log_level, init_logging};
pub use model::appointment::{Appointment, AppointmentId, AppointmentPatch, NewAppointment};
pub use model::client::{Client, ClientId, ClientPatch, NewClient};
pub use model::pet::{age_in_years, NewPet, Pet, PetId, PetPatch};
pub use model::vaccine::{NewVaccine, Vaccine, VaccineId, VaccinePatch, VaccineStatus};
pub use report::aggregates::{
    appointments_by_month, dashboard_summary, pets_by_species, vaccines_by_kind, DashboardSummary,
};
pub use store::record_store::{RecordStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
