//! Integration tests for Message, Messages, and catalogs.

use inquest::{
    Catalog, Config, DefaultCatalog, Message, MessageCatalog, Messages, Schema, ValidationFailed,
    ValidationResult, ValidatorExt,
};
use stillwater::prelude::*;
use stillwater::Validation;

#[test]
fn test_message_full_provenance() {
    let errors = Schema::string()
        .min_len(5)
        .validate("abc", &Config::default())
        .into_result()
        .unwrap_err();
    let message = errors.first();

    assert_eq!(message.constraint_id, "min_length");
    assert_eq!(message.root, "");
    assert_eq!(message.path, "");
    assert_eq!(message.input.as_deref(), Some("\"abc\""));
    assert_eq!(message.key(), Some("string.min_length"));
    assert_eq!(message.args().len(), 2);
}

#[test]
fn test_messages_never_empty() {
    let messages = Messages::single(Message::text("test error"));

    // is_empty always returns false (guarantees at least one message)
    assert!(!messages.is_empty());
    assert_eq!(messages.len(), 1);
    assert!(Messages::try_from_vec(Vec::new()).is_none());
}

#[test]
fn test_messages_combine_preserves_order() {
    let first = Messages::single(Message::text("first"));
    let second = Messages::from_vec(vec![Message::text("second"), Message::text("third")]);

    let combined = first.combine(second);
    let texts: Vec<_> = combined
        .iter()
        .map(|m| m.resolved_text(&DefaultCatalog))
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[test]
fn test_validation_accumulates_messages() {
    let v1: ValidationResult<i32> = Validation::Failure(Messages::single(Message::text("a")));
    let v2: ValidationResult<i32> = Validation::Failure(Messages::single(Message::text("b")));

    let combined = v1.and(v2);
    match combined {
        Validation::Failure(messages) => assert_eq!(messages.len(), 2),
        Validation::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn test_catalog_renders_templates() {
    let catalog = MessageCatalog::new().with("integer.min", "au moins {0} (reçu {1})");

    let errors = Schema::integer()
        .min(18)
        .validate(&16, &Config::default())
        .into_result()
        .unwrap_err();
    let message = errors.first();

    assert_eq!(message.resolved_text(&catalog), "au moins 18 (reçu 16)");
    assert_eq!(message.resolved_text(&DefaultCatalog), "must be at least 18, got 16");
}

#[test]
fn test_unknown_key_renders_key_and_args() {
    let message = Message::template("custom.thing").with_arg(3_i64);
    assert_eq!(message.resolved_text(&DefaultCatalog), "custom.thing(3)");
    assert!(DefaultCatalog.pattern("custom.thing").is_none());
}

#[test]
fn test_message_args_can_nest_messages() {
    let inner = Message::template("string.not_blank");
    let outer = Message::template("factory.construction_failed")
        .with_arg("Person")
        .with_arg(inner);

    assert_eq!(
        outer.resolved_text(&DefaultCatalog),
        "could not construct Person: must not be blank"
    );
}

#[test]
fn test_filters_by_path_and_constraint() {
    #[derive(Debug)]
    struct Form {
        a: String,
        b: String,
    }

    let schema = Schema::object::<Form>()
        .field("a", |f| &f.a, Schema::string().min_len(2).not_blank())
        .field("b", |f| &f.b, Schema::string().min_len(2));

    let errors = schema
        .validate(
            &Form {
                a: " ".into(),
                b: "x".into(),
            },
            &Config::default(),
        )
        .into_result()
        .unwrap_err();

    assert_eq!(errors.at_path("a").len(), 2);
    assert_eq!(errors.with_constraint("min_length").len(), 2);
    assert_eq!(errors.with_constraint("not_blank").len(), 1);
}

#[test]
fn test_validation_failed_wraps_messages() {
    let err: ValidationFailed = Schema::integer()
        .positive()
        .validate_or_raise(&0, &Config::default())
        .unwrap_err();

    assert_eq!(err.messages.len(), 1);
    assert!(err.to_string().contains("must be positive, got 0"));
}

#[test]
fn test_messages_display_lists_each() {
    let messages = Messages::from_vec(vec![Message::text("one"), Message::text("two")]);
    let rendered = messages.to_string();
    assert!(rendered.starts_with("Validation failed with 2"));
    assert!(rendered.contains("(root): one"));
    assert!(rendered.contains("(root): two"));
}
