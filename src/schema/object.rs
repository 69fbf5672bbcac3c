//! Object validation.
//!
//! This module provides [`ObjectSchema`] for validating the fields of a Rust
//! value through accessor closures, with cycle-safe descent into nested and
//! self-referencing objects and object-level (cross-field) constraints.

use std::borrow::Borrow;
use std::fmt::Debug;

use indexmap::IndexMap;

use crate::constraint::{apply, predicate, Constraint, ConstraintResult};
use crate::error::Message;
use crate::outcome::Outcome;
use crate::path::Identity;
use crate::scope::{accumulate, settle};
use crate::validation::Env;

use super::traits::Validator;

type FieldCheck<T> = Box<dyn Fn(&T, &Env<'_>) -> Outcome<()> + Send + Sync>;

/// How a field is reached and checked.
enum FieldDef<T> {
    /// A field with its own validator.
    Value(FieldCheck<T>),
    /// An optional child of the same type, checked with this schema.
    Recursive(Box<dyn Fn(&T) -> Option<&T> + Send + Sync>),
    /// A list of children of the same type, checked with this schema.
    RecursiveEach(Box<dyn Fn(&T) -> &[T] + Send + Sync>),
}

/// An object-level constraint, optionally reported under a field.
struct ObjectCheck<T> {
    field: Option<String>,
    constraint: Box<dyn Constraint<Input = T> + Send + Sync>,
}

/// A validator for the fields of a `T`.
///
/// Fields are checked in the order they were added, then object-level
/// constraints run. Everything happens in one scope, so collect-all mode
/// reports every violation and fail-fast mode stops at the first. In
/// collect-all mode object-level constraints run even when fields failed.
///
/// The first object schema (or factory) to run in a validation call sets the
/// root label stamped on every message. It defaults to the short type name
/// of `T`.
///
/// # Cycles
///
/// The schema binds the identity of the object it validates to the current
/// path node, replacing whatever the node inherited (an item of a list
/// carries the list's identity until then). Before descending into a
/// [`nested`](ObjectSchema::nested) or [`recursive`](ObjectSchema::recursive)
/// field it checks whether the child is already bound on the way down; if
/// so, the child counts as validated and is skipped. Shared but acyclic children are validated once per
/// occurrence.
///
/// # Example
///
/// ```rust
/// use inquest::{Config, Schema, ValidatorExt};
///
/// #[derive(Debug)]
/// struct User {
///     name: String,
///     age: i64,
///     email: Option<String>,
/// }
///
/// let schema = Schema::object::<User>()
///     .field("name", |u| &u.name, Schema::string().min_len(1))
///     .field("age", |u| &u.age, Schema::integer().range(0, 150))
///     .optional("email", |u| u.email.as_ref(), Schema::string().pattern("@").unwrap());
///
/// let user = User { name: String::new(), age: 200, email: None };
/// let errors = schema.validate(&user, &Config::default()).into_result().unwrap_err();
///
/// let paths: Vec<_> = errors.iter().map(|m| m.path.as_str()).collect();
/// assert_eq!(paths, vec!["name", "age"]);
/// assert_eq!(errors.first().root, "User");
/// ```
pub struct ObjectSchema<T> {
    label: String,
    fields: IndexMap<String, FieldDef<T>>,
    checks: Vec<ObjectCheck<T>>,
}

impl<T: 'static> ObjectSchema<T> {
    /// Creates an object schema with no fields, labelled with the type name.
    pub fn new() -> Self {
        Self {
            label: short_type_name::<T>().to_string(),
            fields: IndexMap::new(),
            checks: Vec::new(),
        }
    }

    /// Replaces the root label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the root label.
    pub fn root_label(&self) -> &str {
        &self.label
    }

    /// Returns the field names in check order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Adds a field checked by `validator`.
    ///
    /// Adding a field under an existing name replaces it in place.
    pub fn field<F, V, A>(mut self, name: impl Into<String>, accessor: A, validator: V) -> Self
    where
        A: Fn(&T) -> &F + Send + Sync + 'static,
        F: Borrow<V::Input> + ?Sized + 'static,
        V: Validator + Send + Sync + 'static,
    {
        let name = name.into();
        let segment = name.clone();
        let check = field_check(move |object: &T, env: &Env<'_>| {
            let value: &V::Input = accessor(object).borrow();
            validator
                .validate_with(value, &env.push_field(segment.as_str()))
                .map_value(drop)
        });
        self.fields.insert(name, FieldDef::Value(check));
        self
    }

    /// Adds a field that may be absent; `None` passes.
    pub fn optional<F, V, A>(mut self, name: impl Into<String>, accessor: A, validator: V) -> Self
    where
        A: Fn(&T) -> Option<&F> + Send + Sync + 'static,
        F: Borrow<V::Input> + ?Sized + 'static,
        V: Validator + Send + Sync + 'static,
    {
        let name = name.into();
        let segment = name.clone();
        let check = field_check(move |object: &T, env: &Env<'_>| match accessor(object) {
            None => Outcome::Success(()),
            Some(value) => {
                let value: &V::Input = value.borrow();
                validator
                    .validate_with(value, &env.push_field(segment.as_str()))
                    .map_value(drop)
            }
        });
        self.fields.insert(name, FieldDef::Value(check));
        self
    }

    /// Adds a field holding another object, checked with cycle detection.
    pub fn nested<F, V, A>(mut self, name: impl Into<String>, accessor: A, validator: V) -> Self
    where
        A: Fn(&T) -> &F + Send + Sync + 'static,
        F: Borrow<V::Input> + ?Sized + 'static,
        V: Validator + Send + Sync + 'static,
    {
        let name = name.into();
        let segment = name.clone();
        let check = field_check(move |object: &T, env: &Env<'_>| {
            let value: &V::Input = accessor(object).borrow();
            descend(&validator, value, &segment, env)
        });
        self.fields.insert(name, FieldDef::Value(check));
        self
    }

    /// Adds an optional field holding another object, checked with cycle
    /// detection; `None` passes.
    pub fn nested_optional<F, V, A>(
        mut self,
        name: impl Into<String>,
        accessor: A,
        validator: V,
    ) -> Self
    where
        A: Fn(&T) -> Option<&F> + Send + Sync + 'static,
        F: Borrow<V::Input> + ?Sized + 'static,
        V: Validator + Send + Sync + 'static,
    {
        let name = name.into();
        let segment = name.clone();
        let check = field_check(move |object: &T, env: &Env<'_>| match accessor(object) {
            None => Outcome::Success(()),
            Some(value) => {
                let value: &V::Input = value.borrow();
                descend(&validator, value, &segment, env)
            }
        });
        self.fields.insert(name, FieldDef::Value(check));
        self
    }

    /// Adds an optional child of the same type, checked with this schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Config, Schema, ValidatorExt};
    ///
    /// #[derive(Debug)]
    /// struct Category {
    ///     name: String,
    ///     parent: Option<Box<Category>>,
    /// }
    ///
    /// let schema = Schema::object::<Category>()
    ///     .field("name", |c| &c.name, Schema::string().not_blank())
    ///     .recursive("parent", |c| c.parent.as_deref());
    ///
    /// let leaf = Category {
    ///     name: "shoes".into(),
    ///     parent: Some(Box::new(Category { name: " ".into(), parent: None })),
    /// };
    /// let errors = schema.validate(&leaf, &Config::default()).into_result().unwrap_err();
    /// assert_eq!(errors.first().path, "parent.name");
    /// ```
    pub fn recursive<A>(mut self, name: impl Into<String>, accessor: A) -> Self
    where
        A: Fn(&T) -> Option<&T> + Send + Sync + 'static,
    {
        self.fields
            .insert(name.into(), FieldDef::Recursive(Box::new(accessor)));
        self
    }

    /// Adds a list of children of the same type, checked with this schema.
    ///
    /// Children are reported at `name[index]`.
    pub fn recursive_each<A>(mut self, name: impl Into<String>, accessor: A) -> Self
    where
        A: Fn(&T) -> &[T] + Send + Sync + 'static,
    {
        self.fields
            .insert(name.into(), FieldDef::RecursiveEach(Box::new(accessor)));
        self
    }

    /// Adds an object-level constraint, reported at the object's path.
    pub fn check<C>(mut self, constraint: C) -> Self
    where
        C: Constraint<Input = T> + Send + Sync + 'static,
    {
        self.checks.push(ObjectCheck {
            field: None,
            constraint: Box::new(constraint),
        });
        self
    }

    /// Adds an object-level constraint, reported under `field`.
    ///
    /// Use this for cross-field rules that are best explained at one field,
    /// such as a confirmation that must match.
    pub fn check_at<C>(mut self, field: impl Into<String>, constraint: C) -> Self
    where
        C: Constraint<Input = T> + Send + Sync + 'static,
    {
        self.checks.push(ObjectCheck {
            field: Some(field.into()),
            constraint: Box::new(constraint),
        });
        self
    }

    /// Adds an object-level constraint from a closure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{Config, ConstraintResult, Message, Schema, ValidatorExt};
    ///
    /// #[derive(Debug)]
    /// struct Line {
    ///     quantity: i64,
    ///     unit_price: i64,
    ///     total: i64,
    /// }
    ///
    /// let schema = Schema::object::<Line>()
    ///     .field("quantity", |l| &l.quantity, Schema::integer().positive())
    ///     .custom("total_matches", |l| {
    ///         ConstraintResult::check(l.quantity * l.unit_price == l.total, || {
    ///             Message::text("total must equal quantity * unit_price")
    ///         })
    ///     });
    ///
    /// let line = Line { quantity: 2, unit_price: 5, total: 11 };
    /// assert!(schema.validate(&line, &Config::default()).is_failure());
    /// ```
    pub fn custom<F>(self, id: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T) -> ConstraintResult + Send + Sync + 'static,
    {
        self.check(predicate(id, check))
    }

    /// Adds an object-level rule from a boolean predicate and message text.
    pub fn ensure<P>(self, id: impl Into<String>, ok: P, message: impl Into<String>) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.custom(id, move |object: &T| {
            ConstraintResult::check(ok(object), || Message::text(message.clone()))
        })
    }

    fn validate_recursive(&self, child: &T, name: &str, env: &Env<'_>) -> Outcome<()>
    where
        T: Debug,
    {
        let identity = Identity::of(child);
        if env.path().contains_identity(identity) {
            tracing::debug!(
                target: "inquest",
                field = name,
                path = %env.path(),
                "cycle detected; treating revisited object as valid"
            );
            return Outcome::Success(());
        }
        self.validate_with(child, &env.push_bound(name, identity))
    }
}

impl<T: 'static> Default for ObjectSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug + 'static> Validator for ObjectSchema<T> {
    type Input = T;
    type Output = ();

    fn validate_with(&self, input: &T, env: &Env<'_>) -> Outcome<()> {
        env.register_root(&self.label);
        let identity = Identity::of(input);
        let env = match env.path().identity() {
            Some(bound) if bound == identity => env.clone(),
            _ => env.anchored(identity),
        };

        settle(accumulate(&env, |env| {
            for (name, field) in &self.fields {
                match field {
                    FieldDef::Value(check) => {
                        env.absorb(check(input, env))?;
                    }
                    FieldDef::Recursive(accessor) => {
                        if let Some(child) = accessor(input) {
                            env.absorb(self.validate_recursive(child, name, env))?;
                        }
                    }
                    FieldDef::RecursiveEach(accessor) => {
                        for (index, child) in accessor(input).iter().enumerate() {
                            let segment = format!("{}[{}]", name, index);
                            env.absorb(self.validate_recursive(child, &segment, env))?;
                        }
                    }
                }
            }

            for check in &self.checks {
                let constraint = check.constraint.as_ref();
                match &check.field {
                    Some(field) => apply(constraint, input, &env.push_field(field.as_str()))?,
                    None => apply(constraint, input, env)?,
                }
            }
            Ok(())
        }))
    }
}

fn field_check<T, F>(check: F) -> FieldCheck<T>
where
    F: Fn(&T, &Env<'_>) -> Outcome<()> + Send + Sync + 'static,
{
    Box::new(check)
}

/// Validates a nested object value unless it is already on the path.
fn descend<V>(validator: &V, value: &V::Input, name: &str, env: &Env<'_>) -> Outcome<()>
where
    V: Validator,
{
    let identity = Identity::of(value);
    if env.path().contains_identity(identity) {
        tracing::debug!(
            target: "inquest",
            field = name,
            path = %env.path(),
            "cycle detected; treating revisited object as valid"
        );
        return Outcome::Success(());
    }
    validator
        .validate_with(value, &env.push_bound(name, identity))
        .map_value(drop)
}

/// Returns the last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schema::numeric::IntegerSchema;
    use crate::schema::string::StringSchema;
    use crate::schema::traits::ValidatorExt;

    #[derive(Debug)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[test]
    fn test_label_defaults_to_type_name() {
        assert_eq!(ObjectSchema::<Point>::new().root_label(), "Point");
        assert_eq!(ObjectSchema::<Vec<Point>>::new().root_label(), "Vec");
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let schema = ObjectSchema::<Point>::new()
            .field("y", |p| &p.y, IntegerSchema::new())
            .field("x", |p| &p.x, IntegerSchema::new());
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(names, vec!["y", "x"]);
    }

    #[test]
    fn test_field_failures_carry_paths() {
        let schema = ObjectSchema::<Point>::new()
            .field("x", |p| &p.x, IntegerSchema::new().positive())
            .field("y", |p| &p.y, IntegerSchema::new().positive());
        let errors = schema
            .validate(&Point { x: -1, y: -1 }, &Config::default())
            .into_result()
            .unwrap_err();
        let paths: Vec<_> = errors.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["x", "y"]);
        assert!(errors.iter().all(|m| m.root == "Point"));
    }

    #[test]
    fn test_fail_fast_skips_object_checks() {
        let schema = ObjectSchema::<Point>::new()
            .field("x", |p| &p.x, IntegerSchema::new().positive())
            .ensure("diagonal", |p| p.x == p.y, "must lie on the diagonal");
        let errors = schema
            .validate(&Point { x: -1, y: 2 }, &Config::fail_fast())
            .into_result()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().constraint_id, "positive");
    }

    #[test]
    fn test_collect_all_runs_object_checks() {
        let schema = ObjectSchema::<Point>::new()
            .field("x", |p| &p.x, IntegerSchema::new().positive())
            .check_at(
                "y",
                predicate("diagonal", |p: &Point| {
                    ConstraintResult::check(p.x == p.y, || Message::text("must match x"))
                }),
            );
        let errors = schema
            .validate(&Point { x: -1, y: 2 }, &Config::default())
            .into_result()
            .unwrap_err();
        let paths: Vec<_> = errors.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["x", "y"]);
    }

    #[test]
    fn test_string_field_borrows_as_str() {
        #[derive(Debug)]
        struct Named {
            name: String,
        }
        let schema =
            ObjectSchema::<Named>::new().field("name", |n| &n.name, StringSchema::new().min_len(2));
        assert!(schema
            .validate(&Named { name: "ok".into() }, &Config::default())
            .is_success());
    }
}
