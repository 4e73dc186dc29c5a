//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `vetcare_core` wiring.
//! - Seed a demo clinic into an in-memory database and print the dashboard.

use chrono::{Days, Local};
use std::error::Error;
use vetcare_core::db::open_db_in_memory;
use vetcare_core::store::record_store::DEFAULT_UPCOMING_WINDOW_DAYS;
use vetcare_core::{
    dashboard_summary, default_log_level, init_logging, NewAppointment, NewClient, NewPet,
    NewVaccine, RecordStore,
};

fn main() -> Result<(), Box<dyn Error>> {
    println!("vetcare_core version={}", vetcare_core::core_version());

    let log_dir = std::env::temp_dir().join("vetcare-cli-logs");
    if let Some(log_dir) = log_dir.to_str() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = open_db_in_memory()?;
    let mut store = RecordStore::load(&conn)?;
    seed_demo_clinic(&mut store)?;

    let summary = dashboard_summary(&store);
    println!(
        "clients={} pets={} appointments_today={} pending_vaccines={}",
        summary.total_clients, summary.total_pets, summary.appointments_today,
        summary.pending_vaccines
    );

    for appointment in store.upcoming_appointments(DEFAULT_UPCOMING_WINDOW_DAYS) {
        let pet_name = store
            .pet(appointment.pet_id)
            .map_or("?", |pet| pet.name.as_str());
        println!(
            "upcoming {} {} {} ({})",
            appointment.date, appointment.time, pet_name, appointment.kind
        );
    }

    Ok(())
}

/// Inserts the demo records used for manual smoke runs.
fn seed_demo_clinic(store: &mut RecordStore<'_>) -> Result<(), Box<dyn Error>> {
    let today = Local::now().date_naive();
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .ok_or("date overflow computing tomorrow")?;

    let alice = store.add_client(NewClient {
        name: "Alice Santos".to_string(),
        phone: "(11) 99999-9999".to_string(),
        email: Some("alice@example.com".to_string()),
        address: Some("123 Example St".to_string()),
    })?;
    let bruno = store.add_client(NewClient {
        name: "Bruno Lima".to_string(),
        phone: "(11) 98888-8888".to_string(),
        email: Some("bruno@example.com".to_string()),
        address: None,
    })?;

    let rex = store.add_pet(NewPet {
        name: "Rex".to_string(),
        species: "dog".to_string(),
        breed: Some("Labrador".to_string()),
        birthdate: chrono::NaiveDate::from_ymd_opt(2018, 5, 15),
        weight: Some(25.0),
        client_id: alice.id,
        notes: Some("food allergies".to_string()),
    })?;
    let mimi = store.add_pet(NewPet {
        name: "Mimi".to_string(),
        species: "cat".to_string(),
        breed: Some("Siamese".to_string()),
        birthdate: chrono::NaiveDate::from_ymd_opt(2020, 11, 20),
        weight: Some(4.5),
        client_id: bruno.id,
        notes: None,
    })?;

    store.add_appointment(NewAppointment {
        pet_id: rex.id,
        date: today,
        time: "14:30".to_string(),
        kind: "checkup".to_string(),
        notes: Some("annual checkup".to_string()),
    })?;
    store.add_appointment(NewAppointment {
        pet_id: mimi.id,
        date: tomorrow,
        time: "10:00".to_string(),
        kind: "vaccination".to_string(),
        notes: None,
    })?;

    store.add_vaccine(NewVaccine {
        pet_id: rex.id,
        kind: "V8".to_string(),
        administered: today
            .checked_sub_days(Days::new(365))
            .ok_or("date overflow computing last year")?,
        next_due: Some(today),
        lot: Some("VAC-123".to_string()),
    })?;
    store.add_vaccine(NewVaccine {
        pet_id: mimi.id,
        kind: "rabies".to_string(),
        administered: today,
        next_due: tomorrow.checked_add_days(Days::new(364)),
        lot: Some("RAB-456".to_string()),
    })?;

    Ok(())
}
