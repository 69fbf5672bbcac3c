//! Integration tests for validated construction through factories.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inquest::{
    param, Config, ConstructionError, DefaultCatalog, Factory, Schema, ValidatorExt,
};

#[derive(Debug, PartialEq)]
struct Address {
    city: String,
    zip: String,
}

#[derive(Debug, PartialEq)]
struct Person {
    name: String,
    age: i64,
    address: Address,
}

fn address_factory() -> Factory<
    (
        inquest::Param<inquest::StringSchema>,
        inquest::Param<inquest::StringSchema>,
    ),
    Address,
> {
    Factory::new(
        "Address",
        (
            param("city", Schema::string().not_blank()),
            param("zip", Schema::string().exact_len(5)),
        ),
        |(city, zip)| Address { city, zip },
    )
}

#[test]
fn test_builds_when_all_arguments_pass() {
    let people = Factory::new(
        "Person",
        (
            param("name", Schema::string().min_len(1)),
            param("age", Schema::parse_int().then(Schema::integer().range(0, 150))),
            param("address", address_factory()),
        ),
        |(name, age, address)| Person { name, age, address },
    );

    let person = people
        .build(
            &(
                "Ada".to_string(),
                "36".to_string(),
                ("London".to_string(), "12345".to_string()),
            ),
            &Config::default(),
        )
        .into_result()
        .unwrap();

    assert_eq!(person.age, 36);
    assert_eq!(person.address.city, "London");
}

#[test]
fn test_collect_all_reports_every_argument() {
    let people = Factory::new(
        "Person",
        (
            param("name", Schema::string().min_len(1)),
            param("age", Schema::parse_int().then(Schema::integer().range(0, 150))),
            param("address", address_factory()),
        ),
        |(name, age, address)| Person { name, age, address },
    );

    let errors = people
        .build(
            &(
                String::new(),
                "abc".to_string(),
                (" ".to_string(), "1".to_string()),
            ),
            &Config::collect_all(),
        )
        .into_result()
        .unwrap_err();

    let paths: Vec<_> = errors.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, vec!["name", "age", "address.city", "address.zip"]);
    // the outermost factory owns the root label
    assert!(errors.iter().all(|m| m.root == "Person"));
    assert_eq!(errors.with_constraint("parse_int").len(), 1);
}

#[test]
fn test_fail_fast_never_calls_constructor() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let factory = Factory::new(
        "Address",
        (
            param("city", Schema::string().not_blank()),
            param("zip", Schema::string().exact_len(5)),
        ),
        move |(city, zip)| {
            counter.fetch_add(1, Ordering::SeqCst);
            Address { city, zip }
        },
    );

    let errors = factory
        .build(&(" ".to_string(), "1".to_string()), &Config::fail_fast())
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path, "city");

    let _ = factory.build(&(" ".to_string(), "1".to_string()), &Config::collect_all());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(factory
        .build(&("Oslo".to_string(), "01234".to_string()), &Config::fail_fast())
        .is_success());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[derive(Debug)]
struct Overbooked {
    seats: i64,
}

impl fmt::Display for Overbooked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "only {} seats left", self.seats)
    }
}

impl std::error::Error for Overbooked {}

#[derive(Debug)]
struct Booking {
    seats: i64,
}

#[test]
fn test_constructor_error_becomes_message() {
    let bookings = Factory::try_new(
        "Booking",
        (param("seats", Schema::integer().positive()),),
        |(seats,)| {
            if seats > 4 {
                Err(Overbooked { seats: 4 })
            } else {
                Ok(Booking { seats })
            }
        },
    );

    assert_eq!(
        bookings
            .build(&(2,), &Config::default())
            .into_result()
            .unwrap()
            .seats,
        2
    );

    let errors = bookings
        .build(&(9,), &Config::default())
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 1);

    let message = errors.first();
    assert_eq!(message.constraint_id, "construct");
    assert_eq!(message.root, "Booking");
    assert_eq!(message.path, "");
    assert_eq!(message.input.as_deref(), Some("(9,)"));
    assert_eq!(
        message.resolved_text(&DefaultCatalog),
        "could not construct Booking: only 4 seats left"
    );

    let cause = message
        .cause()
        .and_then(|cause| cause.downcast_ref::<ConstructionError>())
        .unwrap();
    assert_eq!(cause.label, "Booking");
    assert!(cause.source.downcast_ref::<Overbooked>().is_some());
}

#[test]
fn test_factory_as_object_field() {
    #[derive(Debug)]
    struct Form {
        address: (String, String),
    }

    let schema = Schema::object::<Form>().field("address", |f| &f.address, address_factory());
    let form = Form {
        address: ("Rome".to_string(), "123".to_string()),
    };

    let errors = schema
        .validate(&form, &Config::default())
        .into_result()
        .unwrap_err();
    assert_eq!(errors.first().path, "address.zip");
    assert_eq!(errors.first().root, "Form");
}

#[test]
fn test_validate_or_raise() {
    let factory = address_factory();
    let failed = factory
        .validate_or_raise(&("".to_string(), "00000".to_string()), &Config::default())
        .unwrap_err();
    assert_eq!(failed.messages.len(), 1);
    assert!(failed.to_string().contains("must not be blank"));
}

#[test]
#[should_panic(expected = "constructor bug")]
fn test_constructor_panic_is_not_caught() {
    let factory = Factory::new("Count", (param("n", Schema::integer()),), |(n,)| -> i64 {
        if n > 0 {
            panic!("constructor bug");
        }
        n
    });
    let _ = factory.build(&(1,), &Config::default());
}
