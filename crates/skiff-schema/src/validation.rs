//! Structural validation driven by per-type rule tables.
//!
//! Each schema struct implements [`Validate`] with a static table of
//! [`FieldRule`]s in field declaration order. The [`Validator`] walks the
//! table, then recurses into nested structs. The first violation aborts the
//! walk.
//!
//! Rules:
//!
//! - [`Rule::Required`]: the field must not hold its zero value.
//! - [`Rule::OneOf`]: among the fields of one struct sharing a group name,
//!   at most one may be set.
//! - [`Rule::SkipTrim`]: checked like `Required`, and additionally reported by
//!   [`skip_trim_keys`] so path-trimming passes leave the field alone.

use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// A validation directive attached to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    OneOf(&'static str),
    SkipTrim,
}

/// One row of a type's rule table.
pub struct FieldRule<T: 'static> {
    /// External (document) key of the field.
    pub key: &'static str,
    pub rule: Rule,
    /// Whether the field holds a non-zero value.
    pub is_set: fn(&T) -> bool,
}

/// Types that carry validation rules.
pub trait Validate: Sized + 'static {
    const TYPE_NAME: &'static str;

    const RULES: &'static [FieldRule<Self>] = &[];

    /// Validate nested structs. Called after this type's own rules pass.
    fn validate_children(&self, _validator: &mut Validator) -> Result<()> {
        Ok(())
    }
}

/// Build a rule table: `rules![Self; "key" => Rule, field; ...]`.
#[macro_export]
macro_rules! rules {
    ($ty:ty; $($key:literal => $rule:expr, $field:ident;)*) => {
        &[$(
            $crate::validation::FieldRule {
                key: $key,
                rule: $rule,
                is_set: |s: &$ty| $crate::validation::is_set(&s.$field),
            },
        )*]
    };
}

/// Zero-value check used by the rule tables.
pub trait IsZero {
    fn is_zero(&self) -> bool;
}

impl IsZero for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for bool {
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl IsZero for i32 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl IsZero for i64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl<T> IsZero for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T> IsZero for Vec<T> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> IsZero for BTreeMap<K, V> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl IsZero for crate::IntOrString {
    fn is_zero(&self) -> bool {
        match self {
            Self::Int(value) => *value == 0,
            Self::String(value) => value.is_empty(),
        }
    }
}

pub fn is_set<Z: IsZero + ?Sized>(value: &Z) -> bool {
    !value.is_zero()
}

/// Walks values and applies their rule tables.
///
/// The oneOf group registry belongs to the validator, so each validation
/// run starts from a clean slate and validators can be used from several
/// threads independently.
#[derive(Debug, Default)]
pub struct Validator {
    one_of_groups: HashMap<&'static str, BTreeMap<&'static str, Vec<&'static str>>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate<T: Validate>(&mut self, value: &T) -> Result<()> {
        let mut chosen: HashMap<&'static str, &'static str> = HashMap::new();

        for field in T::RULES {
            match field.rule {
                Rule::Required | Rule::SkipTrim => {
                    if !(field.is_set)(value) {
                        return Err(Error::Required {
                            type_name: T::TYPE_NAME,
                            field: field.key,
                        });
                    }
                }
                Rule::OneOf(set) => {
                    self.register(T::TYPE_NAME, set, field.key);
                    if (field.is_set)(value) {
                        if let Some(first) = chosen.insert(set, field.key) {
                            return Err(Error::OneOf {
                                type_name: T::TYPE_NAME,
                                set,
                                fields: vec![first, field.key],
                            });
                        }
                    }
                }
            }
        }

        value.validate_children(self)
    }

    pub fn validate_each<T: Validate>(&mut self, values: &[T]) -> Result<()> {
        values.iter().try_for_each(|value| self.validate(value))
    }

    pub fn validate_opt<T: Validate>(&mut self, value: Option<&T>) -> Result<()> {
        value.map_or(Ok(()), |value| self.validate(value))
    }

    /// Members of a oneOf group seen so far for a type, in table order.
    pub fn one_of_members(&self, type_name: &str, set: &str) -> Option<&[&'static str]> {
        self.one_of_groups
            .get(type_name)
            .and_then(|sets| sets.get(set))
            .map(Vec::as_slice)
    }

    fn register(&mut self, type_name: &'static str, set: &'static str, key: &'static str) {
        let members = self
            .one_of_groups
            .entry(type_name)
            .or_default()
            .entry(set)
            .or_default();
        if !members.contains(&key) {
            members.push(key);
        }
    }
}

/// Validate a value with a fresh [`Validator`].
pub fn validate<T: Validate>(value: &T) -> Result<()> {
    Validator::new().validate(value)
}

/// Keys of a type marked [`Rule::SkipTrim`].
pub fn skip_trim_keys<T: Validate>() -> Vec<&'static str> {
    T::RULES
        .iter()
        .filter(|field| field.rule == Rule::SkipTrim)
        .map(|field| field.key)
        .collect()
}

/// The oneOf groups declared by a type, each as its member keys.
pub fn one_of_groups<T: Validate>() -> Vec<Vec<&'static str>> {
    let mut groups: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
    for field in T::RULES {
        if let Rule::OneOf(set) = field.rule {
            groups.entry(set).or_default().push(field.key);
        }
    }
    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Source {
        git: String,
        url: String,
        name: String,
        paths: Vec<String>,
        child: Option<Child>,
    }

    #[derive(Debug, Default)]
    struct Child {
        id: String,
    }

    impl Validate for Source {
        const TYPE_NAME: &'static str = "Source";
        const RULES: &'static [FieldRule<Self>] = rules![Source;
            "name" => Rule::Required, name;
            "git" => Rule::OneOf("origin"), git;
            "url" => Rule::OneOf("origin"), url;
            "paths" => Rule::SkipTrim, paths;
        ];

        fn validate_children(&self, validator: &mut Validator) -> Result<()> {
            validator.validate_opt(self.child.as_ref())
        }
    }

    impl Validate for Child {
        const TYPE_NAME: &'static str = "Child";
        const RULES: &'static [FieldRule<Self>] = rules![Child;
            "id" => Rule::Required, id;
        ];
    }

    fn valid() -> Source {
        Source {
            name: "src".into(),
            paths: vec!["a".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_one_of_both_set_fails() {
        let source = Source {
            git: "g".into(),
            url: "u".into(),
            ..valid()
        };
        match validate(&source).unwrap_err() {
            Error::OneOf { type_name, set, fields } => {
                assert_eq!(type_name, "Source");
                assert_eq!(set, "origin");
                assert_eq!(fields, vec!["git", "url"]);
            }
            other => panic!("expected OneOf, got {other:?}"),
        }
    }

    #[test]
    fn test_one_of_exactly_one_set_passes() {
        let source = Source {
            url: "u".into(),
            ..valid()
        };
        validate(&source).unwrap();
    }

    #[test]
    fn test_one_of_none_set_passes() {
        validate(&valid()).unwrap();
    }

    #[test]
    fn test_required_zero_value_names_key() {
        let source = Source {
            name: String::new(),
            ..valid()
        };
        let err = validate(&source).unwrap_err();
        assert!(matches!(
            err,
            Error::Required {
                type_name: "Source",
                field: "name"
            }
        ));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_skip_trim_is_checked_like_required() {
        let source = Source {
            paths: vec![],
            ..valid()
        };
        assert!(matches!(
            validate(&source),
            Err(Error::Required { field: "paths", .. })
        ));
        assert_eq!(skip_trim_keys::<Source>(), vec!["paths"]);
    }

    #[test]
    fn test_first_violation_wins() {
        let source = Source {
            name: String::new(),
            git: "g".into(),
            url: "u".into(),
            ..valid()
        };
        assert!(matches!(validate(&source), Err(Error::Required { .. })));
    }

    #[test]
    fn test_nested_structs_are_walked() {
        let source = Source {
            child: Some(Child::default()),
            ..valid()
        };
        assert!(matches!(
            validate(&source),
            Err(Error::Required {
                type_name: "Child",
                field: "id"
            })
        ));
    }

    #[test]
    fn test_registry_is_per_validator() {
        let mut validator = Validator::new();
        validator.validate(&valid()).unwrap();
        assert_eq!(
            validator.one_of_members("Source", "origin"),
            Some(&["git", "url"][..])
        );
        assert!(Validator::new().one_of_members("Source", "origin").is_none());
    }

    #[test]
    fn test_groups_are_listed_from_table() {
        assert_eq!(one_of_groups::<Source>(), vec![vec!["git", "url"]]);
    }
}
