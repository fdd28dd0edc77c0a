//! Console behavior: both grammars, validation messages, shell loop.

use crate::common::Session;

#[test]
fn method_call_and_canonical_forms_print_the_same() {
    let mut session = Session::new();
    let id = session.create("User");
    session.create("User");
    session.create("Amenity");

    let pairs = [
        (format!("show User {id}"), format!("User.show(\"{id}\")")),
        ("all User".to_string(), "User.all()".to_string()),
        ("count User".to_string(), "User.count()".to_string()),
        ("show User".to_string(), "User.show()".to_string()),
        ("show User missing".to_string(), "User.show(\"missing\")".to_string()),
        ("all Nope".to_string(), "Nope.all()".to_string()),
        ("count Nope".to_string(), "Nope.count()".to_string()),
    ];
    for (canonical, method) in pairs {
        assert_eq!(
            session.line(&canonical),
            session.line(&method),
            "{canonical} vs {method}"
        );
    }
}

#[test]
fn count_matches_all_for_every_class() {
    let mut session = Session::new();
    for class in ["User", "User", "State", "Place", "Place", "Place", "Review"] {
        session.create(class);
    }

    for class in [
        "BaseModel", "User", "State", "City", "Amenity", "Place", "Review",
    ] {
        let count: usize = session.print(&format!("count {class}")).parse().unwrap();
        let listed = session.print(&format!("all {class}"));
        assert_eq!(
            listed.matches(&format!("[{class}] (")).count(),
            count,
            "{class}"
        );
    }
}

#[test]
fn method_call_destroy_removes_record() {
    let mut session = Session::new();
    let id = session.create("Review");

    assert_eq!(session.line(&format!("Review.destroy(\"{id}\")")), None);
    assert_eq!(
        session.print(&format!("show Review {id}")),
        "** no instance found **"
    );
    assert_eq!(
        session.print(&format!("Review.destroy(\"{id}\")")),
        "** no instance found **"
    );
}

#[test]
fn create_is_not_a_method_call() {
    let mut session = Session::new();
    assert_eq!(session.line("User.create()"), None);
    assert_eq!(session.print("count User"), "0");
}

#[test]
fn scripted_session_runs_to_quit() {
    let mut session = Session::new();
    let (out, err) = session.script(
        "create BaseModel\n\
         count BaseModel\n\
         \n\
         show BaseModel\n\
         bogus line\n\
         quit\n\
         count BaseModel\n",
    );

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3, "{out}");
    assert_eq!(lines[1], "1");
    assert_eq!(lines[2], "** instance id missing **");
    assert!(err.is_empty());
}

#[test]
fn scripted_session_ends_with_newline_on_eof() {
    let mut session = Session::new();
    let (out, _) = session.script("count City\n");
    assert_eq!(out, "0\n\n");

    let (out, _) = session.script("count City\nEOF\ncount City\n");
    assert_eq!(out, "0\n\n");
}

#[test]
fn help_lists_commands_and_rejects_unknown_topics() {
    let mut session = Session::new();
    let summary = session.print("help");
    for name in [
        "EOF", "all", "count", "create", "destroy", "help", "quit", "show", "update",
    ] {
        assert!(summary.contains(name), "{name}");
    }
    assert_eq!(session.print("help nothing"), "*** No help on nothing");
}
