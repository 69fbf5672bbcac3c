//! Integration tests for object-level (cross-field) constraints.

use inquest::{predicate, Config, ConstraintResult, Message, Schema, ValidatorExt};

#[derive(Debug)]
struct Line {
    quantity: i64,
    unit_price: i64,
    total: i64,
}

#[derive(Debug)]
struct Registration {
    password: String,
    confirm: String,
}

fn line_schema() -> inquest::ObjectSchema<Line> {
    Schema::object::<Line>()
        .field("quantity", |l| &l.quantity, Schema::integer().positive())
        .field("unit_price", |l| &l.unit_price, Schema::integer().non_negative())
        .field("total", |l| &l.total, Schema::integer().non_negative())
        .custom("total_matches", |l| {
            ConstraintResult::check(l.quantity * l.unit_price == l.total, || {
                Message::text("total must equal quantity * unit_price")
            })
        })
}

#[test]
fn test_custom_validator_success() {
    let line = Line {
        quantity: 5,
        unit_price: 10,
        total: 50,
    };
    assert!(line_schema().validate(&line, &Config::default()).is_success());
}

#[test]
fn test_custom_validator_failure() {
    let line = Line {
        quantity: 5,
        unit_price: 10,
        total: 40,
    };
    let errors = line_schema()
        .validate(&line, &Config::default())
        .into_result()
        .unwrap_err();

    assert_eq!(errors.len(), 1);
    let message = errors.first();
    assert_eq!(message.constraint_id, "total_matches");
    assert_eq!(message.path, "");
    assert_eq!(message.root, "Line");
    assert!(message.input.as_deref().unwrap().starts_with("Line {"));
}

#[test]
fn test_collect_all_runs_object_check_after_field_failure() {
    let line = Line {
        quantity: -1,
        unit_price: 10,
        total: 40,
    };
    let errors = line_schema()
        .validate(&line, &Config::collect_all())
        .into_result()
        .unwrap_err();
    let ids: Vec<_> = errors.iter().map(|m| m.constraint_id.as_str()).collect();
    assert_eq!(ids, vec!["positive", "total_matches"]);
}

#[test]
fn test_fail_fast_skips_object_check_after_field_failure() {
    let line = Line {
        quantity: -1,
        unit_price: 10,
        total: 40,
    };
    let errors = line_schema()
        .validate(&line, &Config::fail_fast())
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().constraint_id, "positive");
}

#[test]
fn test_check_at_reports_under_field() {
    let schema = Schema::object::<Registration>()
        .field("password", |r| &r.password, Schema::string().min_len(8))
        .check_at(
            "confirm",
            predicate("matches_password", |r: &Registration| {
                ConstraintResult::check(r.password == r.confirm, || {
                    Message::text("passwords do not match")
                })
            }),
        );

    let registration = Registration {
        password: "correct horse".into(),
        confirm: "correct house".into(),
    };
    let errors = schema
        .validate(&registration, &Config::default())
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path, "confirm");
    assert_eq!(
        errors.first().resolved_text(&inquest::DefaultCatalog),
        "passwords do not match"
    );
}

#[test]
fn test_ensure_shorthand() {
    let schema = Schema::object::<Registration>().ensure(
        "not_empty",
        |r| !r.password.is_empty(),
        "password required",
    );
    let registration = Registration {
        password: String::new(),
        confirm: String::new(),
    };
    let errors = schema
        .validate(&registration, &Config::default())
        .into_result()
        .unwrap_err();
    assert_eq!(errors.first().constraint_id, "not_empty");
}

#[derive(Debug)]
struct Contact {
    email: String,
    phone: String,
}

#[derive(Debug)]
struct Account {
    contact: Contact,
    handle: String,
}

fn account_schema() -> inquest::ObjectSchema<Account> {
    let contact = Schema::object::<Contact>()
        .field("email", |c| &c.email, Schema::string().min_len(3))
        .field("phone", |c| &c.phone, Schema::string().min_len(7));

    Schema::object::<Account>()
        .nested("contact", |a| &a.contact, contact)
        .field("handle", |a| &a.handle, Schema::string().not_blank())
        .ensure("handle_not_email", |a| a.handle != a.contact.email, "handle must differ from email")
}

fn broken_account() -> Account {
    Account {
        contact: Contact {
            email: "x".into(),
            phone: "1".into(),
        },
        handle: "x".into(),
    }
}

#[test]
fn test_fail_fast_parent_stops_after_failing_child() {
    let errors = account_schema()
        .validate(&broken_account(), &Config::fail_fast())
        .into_result()
        .unwrap_err();

    // the child stops at its first field and the parent stops at the child
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path, "contact.email");
    assert_eq!(errors.first().root, "Account");
}

#[test]
fn test_collect_all_parent_continues_after_failing_child() {
    let errors = account_schema()
        .validate(&broken_account(), &Config::collect_all())
        .into_result()
        .unwrap_err();

    let paths: Vec<_> = errors.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["contact.email", "contact.phone", ""]);
    assert_eq!(errors.with_constraint("handle_not_email").len(), 1);
}
