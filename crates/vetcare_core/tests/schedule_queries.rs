use chrono::{Days, Local, NaiveDate};
use uuid::Uuid;
use vetcare_core::db::open_db_in_memory;
use vetcare_core::{NewAppointment, NewClient, NewPet, NewVaccine, RecordStore};

fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        phone: "555-0100".to_string(),
        email: None,
        address: None,
    }
}

fn new_pet(name: &str, species: &str, breed: Option<&str>, client_id: Uuid) -> NewPet {
    NewPet {
        name: name.to_string(),
        species: species.to_string(),
        breed: breed.map(str::to_string),
        birthdate: None,
        weight: None,
        client_id,
        notes: None,
    }
}

fn new_appointment(pet_id: Uuid, date: NaiveDate, time: &str) -> NewAppointment {
    NewAppointment {
        pet_id,
        date,
        time: time.to_string(),
        kind: "checkup".to_string(),
        notes: None,
    }
}

fn new_vaccine(pet_id: Uuid, next_due: Option<NaiveDate>) -> NewVaccine {
    NewVaccine {
        pet_id,
        kind: "rabies".to_string(),
        administered: "2023-03-15".parse().expect("valid test date"),
        next_due,
        lot: None,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn days_from_today(days: u64) -> NaiveDate {
    today()
        .checked_add_days(Days::new(days))
        .expect("date within calendar range")
}

fn days_before_today(days: u64) -> NaiveDate {
    today()
        .checked_sub_days(Days::new(days))
        .expect("date within calendar range")
}

#[test]
fn appointments_by_date_matches_the_exact_day_only() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let client = store.add_client(new_client("Alice")).unwrap();
    let pet = store
        .add_pet(new_pet("Rex", "dog", None, client.id))
        .unwrap();

    let day: NaiveDate = "2024-01-10".parse().unwrap();
    let matching = store
        .add_appointment(new_appointment(pet.id, day, "09:00"))
        .unwrap();
    store
        .add_appointment(new_appointment(pet.id, "2024-01-11".parse().unwrap(), "09:00"))
        .unwrap();

    let on_day = store.appointments_by_date(day);
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].id, matching.id);
}

#[test]
fn upcoming_window_is_inclusive_of_both_ends() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let client = store.add_client(new_client("Alice")).unwrap();
    let pet = store
        .add_pet(new_pet("Rex", "dog", None, client.id))
        .unwrap();

    let on_today = store
        .add_appointment(new_appointment(pet.id, today(), "09:00"))
        .unwrap();
    let in_three = store
        .add_appointment(new_appointment(pet.id, days_from_today(3), "10:00"))
        .unwrap();
    store
        .add_appointment(new_appointment(pet.id, days_from_today(10), "11:00"))
        .unwrap();
    store
        .add_appointment(new_appointment(pet.id, days_before_today(1), "08:00"))
        .unwrap();

    let upcoming = store.upcoming_appointments(7);
    let ids: Vec<_> = upcoming.iter().map(|appointment| appointment.id).collect();
    assert_eq!(ids, vec![on_today.id, in_three.id]);

    let boundary = store
        .add_appointment(new_appointment(pet.id, days_from_today(7), "12:00"))
        .unwrap();
    let ids: Vec<_> = store
        .upcoming_appointments(7)
        .iter()
        .map(|appointment| appointment.id)
        .collect();
    assert_eq!(ids, vec![on_today.id, in_three.id, boundary.id]);
}

#[test]
fn upcoming_appointments_sort_by_date_then_time() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let client = store.add_client(new_client("Alice")).unwrap();
    let pet = store
        .add_pet(new_pet("Rex", "dog", None, client.id))
        .unwrap();

    let tomorrow_early = store
        .add_appointment(new_appointment(pet.id, days_from_today(1), "08:15"))
        .unwrap();
    let today_late = store
        .add_appointment(new_appointment(pet.id, today(), "15:00"))
        .unwrap();
    let today_early = store
        .add_appointment(new_appointment(pet.id, today(), "09:30"))
        .unwrap();

    let ids: Vec<_> = store
        .upcoming_appointments(7)
        .iter()
        .map(|appointment| appointment.id)
        .collect();
    assert_eq!(ids, vec![today_early.id, today_late.id, tomorrow_early.id]);
}

#[test]
fn pending_vaccines_cover_due_and_overdue_boosters_only() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let client = store.add_client(new_client("Alice")).unwrap();
    let pet = store
        .add_pet(new_pet("Rex", "dog", None, client.id))
        .unwrap();

    let overdue = store
        .add_vaccine(new_vaccine(pet.id, Some(days_before_today(30))))
        .unwrap();
    let due_today = store
        .add_vaccine(new_vaccine(pet.id, Some(today())))
        .unwrap();
    store
        .add_vaccine(new_vaccine(pet.id, Some(days_from_today(30))))
        .unwrap();
    store.add_vaccine(new_vaccine(pet.id, None)).unwrap();

    let pending: Vec<_> = store
        .pending_vaccines()
        .iter()
        .map(|vaccine| vaccine.id)
        .collect();
    assert_eq!(pending, vec![overdue.id, due_today.id]);
}

#[test]
fn pets_and_vaccines_filter_by_their_reference() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let alice = store.add_client(new_client("Alice")).unwrap();
    let bruno = store.add_client(new_client("Bruno")).unwrap();
    let rex = store
        .add_pet(new_pet("Rex", "dog", None, alice.id))
        .unwrap();
    let mimi = store
        .add_pet(new_pet("Mimi", "cat", None, bruno.id))
        .unwrap();

    let alices: Vec<_> = store
        .pets_by_client(alice.id)
        .iter()
        .map(|pet| pet.id)
        .collect();
    assert_eq!(alices, vec![rex.id]);

    let rex_vaccine = store.add_vaccine(new_vaccine(rex.id, None)).unwrap();
    store.add_vaccine(new_vaccine(mimi.id, None)).unwrap();

    let rex_vaccines: Vec<_> = store
        .vaccines_by_pet(rex.id)
        .iter()
        .map(|vaccine| vaccine.id)
        .collect();
    assert_eq!(rex_vaccines, vec![rex_vaccine.id]);
}

#[test]
fn pet_search_is_case_insensitive_over_name_species_and_breed() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let client = store.add_client(new_client("Alice")).unwrap();
    let rex = store
        .add_pet(new_pet("Rex", "dog", Some("Labrador"), client.id))
        .unwrap();
    let mimi = store
        .add_pet(new_pet("Mimi", "cat", Some("Siamese"), client.id))
        .unwrap();

    let by_name: Vec<_> = store.search_pets("REX").iter().map(|p| p.id).collect();
    assert_eq!(by_name, vec![rex.id]);

    let by_breed: Vec<_> = store.search_pets("siam").iter().map(|p| p.id).collect();
    assert_eq!(by_breed, vec![mimi.id]);

    let by_species: Vec<_> = store.search_pets("cat").iter().map(|p| p.id).collect();
    assert_eq!(by_species, vec![mimi.id]);

    assert_eq!(store.search_pets("").len(), 2);
    assert!(store.search_pets("parrot").is_empty());
}

#[test]
fn client_search_is_case_insensitive_over_name_phone_and_email() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let alice = store
        .add_client(NewClient {
            name: "Alice Santos".to_string(),
            phone: "555-0100".to_string(),
            email: Some("alice@example.com".to_string()),
            address: None,
        })
        .unwrap();
    let bruno = store
        .add_client(NewClient {
            name: "Bruno Lima".to_string(),
            phone: "555-0177".to_string(),
            email: None,
            address: None,
        })
        .unwrap();

    let by_name: Vec<_> = store.search_clients("santos").iter().map(|c| c.id).collect();
    assert_eq!(by_name, vec![alice.id]);

    let by_phone: Vec<_> = store.search_clients("0177").iter().map(|c| c.id).collect();
    assert_eq!(by_phone, vec![bruno.id]);

    let by_email: Vec<_> = store
        .search_clients("ALICE@EXAMPLE")
        .iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(by_email, vec![alice.id]);

    assert_eq!(store.search_clients(" ").len(), 2);
}
