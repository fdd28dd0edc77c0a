//! Store file round trips through the console.

use roster_types::{AttrValue, RecordClass, RecordId, StoreKey};
use serde_json::Value;

use crate::common::Session;

#[test]
fn every_mutation_reaches_the_file() {
    let mut session = Session::new();
    let id = session.create("Place");
    let key = StoreKey::new(RecordClass::Place, RecordId::new(id.clone()));
    assert!(session.reopen().contains(&key));

    session.line(&format!("update Place {id} number_rooms 3"));
    let reloaded = session.reopen();
    assert_eq!(
        reloaded.get(&key).unwrap().get("number_rooms"),
        Some(&AttrValue::Int(3))
    );

    session.line(&format!("destroy Place {id}"));
    assert!(!session.reopen().contains(&key));
}

#[test]
fn file_layout_uses_class_dot_id_keys() {
    let mut session = Session::new();
    let id = session.create("State");
    session.line(&format!("update State {id} name \"New Mexico\""));

    let raw = std::fs::read_to_string(session.store_path()).unwrap();
    let doc: Value = serde_json::from_str(&raw).unwrap();
    let entry = &doc[format!("State.{id}")];

    assert_eq!(entry["__class__"], "State");
    assert_eq!(entry["id"], id.as_str());
    assert_eq!(entry["name"], "New Mexico");
    assert!(entry["created_at"].is_string());
    assert!(entry["updated_at"].is_string());
}

#[test]
fn reload_preserves_rendering() {
    let mut session = Session::new();
    let id = session.create("Place");
    session.line(&format!(
        "Place.update(\"{id}\", {{\"name\": \"Cabin\", \"latitude\": 45.5, \"amenity_ids\": [\"a\", \"b\"]}})"
    ));
    let before = session.print(&format!("show Place {id}"));

    let mut reloaded = session.reopen();
    let mut interp = roster_engine::Interpreter::new(&mut reloaded);
    let after = interp.execute(&format!("show Place {id}")).unwrap();

    assert_eq!(after, roster_engine::Outcome::Message(before));
}

#[test]
fn missing_file_starts_empty() {
    let session = Session::new();
    let storage = session.reopen();
    assert!(storage.is_empty());
}

#[test]
fn corrupt_file_fails_to_load() {
    let session = Session::new();
    std::fs::write(session.store_path(), "{not json").unwrap();
    assert!(roster_store::FileStorage::open(session.store_path()).is_err());
}
