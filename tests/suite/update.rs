//! Update semantics: value extraction, type preservation, dictionaries.

use roster_types::{AttrValue, RecordClass, RecordId, StoreKey};

use crate::common::Session;

fn attr(session: &Session, class: RecordClass, id: &str, name: &str) -> Option<AttrValue> {
    let key = StoreKey::new(class, RecordId::new(id));
    session.storage.get(&key).and_then(|r| r.get(name)).cloned()
}

#[test]
fn quoted_values_keep_spaces() {
    let mut session = Session::new();
    let id = session.create("User");

    session.line(&format!("update User {id} first_name \"Betty Holberton\" extra"));
    assert_eq!(
        attr(&session, RecordClass::User, &id, "first_name"),
        Some(AttrValue::Str("Betty Holberton".into()))
    );

    session.line(&format!(
        "User.update(\"{id}\", \"last_name\", \"Von Neumann\")"
    ));
    assert_eq!(
        attr(&session, RecordClass::User, &id, "last_name"),
        Some(AttrValue::Str("Von Neumann".into()))
    );
}

#[test]
fn unquoted_value_takes_first_token() {
    let mut session = Session::new();
    let id = session.create("User");

    session.line(&format!("update User {id} email a@b.c trailing words"));
    assert_eq!(
        attr(&session, RecordClass::User, &id, "email"),
        Some(AttrValue::Str("a@b.c".into()))
    );
}

#[test]
fn new_attributes_are_strings() {
    let mut session = Session::new();
    let id = session.create("BaseModel");

    session.line(&format!("update BaseModel {id} age 89"));
    assert_eq!(
        attr(&session, RecordClass::BaseModel, &id, "age"),
        Some(AttrValue::Str("89".into()))
    );
}

#[test]
fn class_defaults_drive_coercion() {
    let mut session = Session::new();
    let id = session.create("Place");

    session.line(&format!("update Place {id} price_by_night 120"));
    session.line(&format!("update Place {id} longitude -122"));
    assert_eq!(
        attr(&session, RecordClass::Place, &id, "price_by_night"),
        Some(AttrValue::Int(120))
    );
    assert_eq!(
        attr(&session, RecordClass::Place, &id, "longitude"),
        Some(AttrValue::Float(-122.0))
    );
}

#[test]
fn dictionary_update_sets_every_pair() {
    let mut session = Session::new();
    let id = session.create("User");

    session.line(&format!(
        "User.update(\"{id}\", {{\"first_name\": \"John\", \"age\": 89}})"
    ));
    assert_eq!(
        attr(&session, RecordClass::User, &id, "first_name"),
        Some(AttrValue::Str("John".into()))
    );
    assert_eq!(
        attr(&session, RecordClass::User, &id, "age"),
        Some(AttrValue::Str("89".into()))
    );
}

#[test]
fn failed_coercion_leaves_record_untouched() {
    let mut session = Session::new();
    let id = session.create("Place");
    let before = session.print(&format!("show Place {id}"));

    let (out, err) = session.script(&format!(
        "Place.update(\"{id}\", {{\"name\": \"Hut\", \"max_guest\": \"many\"}})\n"
    ));
    assert_eq!(out, "\n");
    assert!(err.contains("max_guest"), "{err}");
    assert_eq!(session.print(&format!("show Place {id}")), before);
}

#[test]
fn malformed_dictionary_reports_missing_attribute_name() {
    let mut session = Session::new();
    let id = session.create("User");
    let before = session.print(&format!("show User {id}"));

    assert_eq!(
        session.print(&format!(
            "User.update(\"{id}\", {{first_name: \"John\"}}, \"x\")"
        )),
        "** attribute name missing **"
    );
    assert_eq!(session.print(&format!("show User {id}")), before);
}

#[test]
fn update_validation_order() {
    let mut session = Session::new();
    let id = session.create("City");

    assert_eq!(session.print("City.update()"), "** instance id missing **");
    assert_eq!(
        session.print("City.update(\"nope\", \"name\", \"x\")"),
        "** no instance found **"
    );
    assert_eq!(
        session.print(&format!("City.update(\"{id}\")")),
        "** attribute name missing **"
    );
    assert_eq!(
        session.print(&format!("City.update(\"{id}\", \"name\")")),
        "** value missing **"
    );
    assert_eq!(
        session.print(&format!("update City {id} name")),
        "** value missing **"
    );
}
