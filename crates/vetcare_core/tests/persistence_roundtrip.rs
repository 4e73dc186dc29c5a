use rusqlite::Connection;
use uuid::Uuid;
use vetcare_core::db::{open_db, open_db_in_memory};
use vetcare_core::{NewAppointment, NewClient, NewPet, NewVaccine, RecordStore, StoreError};

fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        phone: "555-0100".to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        address: None,
    }
}

fn new_pet(name: &str, client_id: Uuid) -> NewPet {
    NewPet {
        name: name.to_string(),
        species: "dog".to_string(),
        breed: Some("Labrador".to_string()),
        birthdate: "2018-05-15".parse().ok(),
        weight: Some(25.0),
        client_id,
        notes: None,
    }
}

fn slot_value(conn: &Connection, key: &str) -> String {
    conn.query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn reload_reproduces_all_collections_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");

    let conn = open_db(&path).unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    let alice = store.add_client(new_client("Alice")).unwrap();
    let bruno = store.add_client(new_client("Bruno")).unwrap();
    let rex = store.add_pet(new_pet("Rex", alice.id)).unwrap();
    let appointment = store
        .add_appointment(NewAppointment {
            pet_id: rex.id,
            date: "2024-01-10".parse().unwrap(),
            time: "09:00".to_string(),
            kind: "checkup".to_string(),
            notes: Some("bring records".to_string()),
        })
        .unwrap();
    let vaccine = store
        .add_vaccine(NewVaccine {
            pet_id: rex.id,
            kind: "rabies".to_string(),
            administered: "2023-03-15".parse().unwrap(),
            next_due: "2024-03-15".parse().ok(),
            lot: Some("RAB-456".to_string()),
        })
        .unwrap();

    let clients = store.clients().to_vec();
    let pets = store.pets().to_vec();
    drop(store);
    drop(conn);

    let conn = open_db(&path).unwrap();
    let reloaded = RecordStore::load(&conn).unwrap();

    assert_eq!(reloaded.clients(), clients.as_slice());
    assert_eq!(reloaded.pets(), pets.as_slice());
    assert_eq!(reloaded.appointments(), std::slice::from_ref(&appointment));
    assert_eq!(reloaded.vaccines(), std::slice::from_ref(&vaccine));

    let ids: Vec<_> = reloaded.clients().iter().map(|client| client.id).collect();
    assert_eq!(ids, vec![alice.id, bruno.id]);
}

#[test]
fn every_mutation_writes_all_four_slots_together() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();

    store.add_client(new_client("Alice")).unwrap();

    let slot_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(slot_count, 4);
    assert_eq!(slot_value(&conn, "vet_pets"), "[]");
    assert_eq!(slot_value(&conn, "vet_appointments"), "[]");
    assert_eq!(slot_value(&conn, "vet_vaccines"), "[]");
}

#[test]
fn corrupted_slot_resets_to_empty_without_touching_others() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");

    let conn = open_db(&path).unwrap();
    let mut store = RecordStore::load(&conn).unwrap();
    let client = store.add_client(new_client("Alice")).unwrap();
    store.add_pet(new_pet("Rex", client.id)).unwrap();
    drop(store);

    conn.execute(
        "UPDATE slots SET value = 'not a json payload' WHERE key = 'vet_pets';",
        [],
    )
    .unwrap();

    let reloaded = RecordStore::load(&conn).unwrap();
    assert!(reloaded.pets().is_empty());
    assert_eq!(reloaded.clients().len(), 1);
    assert_eq!(reloaded.clients()[0].id, client.id);
}

#[test]
fn failed_update_leaves_persisted_state_byte_identical() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();
    store.add_client(new_client("Alice")).unwrap();

    let before = slot_value(&conn, "vet_clients");

    let err = store
        .update_client(Uuid::new_v4(), Default::default())
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    assert_eq!(slot_value(&conn, "vet_clients"), before);
}

#[test]
fn blocked_delete_leaves_persisted_state_byte_identical() {
    let conn = open_db_in_memory().unwrap();
    let mut store = RecordStore::load(&conn).unwrap();
    let client = store.add_client(new_client("Alice")).unwrap();
    store.add_pet(new_pet("Rex", client.id)).unwrap();

    let before = slot_value(&conn, "vet_clients");

    let err = store.delete_client(client.id).unwrap_err();
    assert!(matches!(err, StoreError::ClientHasPets(_)));

    assert_eq!(slot_value(&conn, "vet_clients"), before);
}

#[test]
fn load_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match RecordStore::load(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn load_rejects_connection_without_slots_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        vetcare_core::db::migrations::latest_version()
    ))
    .unwrap();

    assert!(matches!(
        RecordStore::load(&conn),
        Err(StoreError::MissingSlotsTable)
    ));
}
