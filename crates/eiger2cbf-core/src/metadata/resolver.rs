use std::fmt::Debug;

use tracing::{debug, info, warn};

use crate::io::container::ContainerReader;

/// A value type that can be read from a container path.
pub trait FieldValue: Sized + Clone + Debug {
    fn read(reader: &dyn ContainerReader, path: &str) -> Option<Self>;
}

impl FieldValue for i64 {
    fn read(reader: &dyn ContainerReader, path: &str) -> Option<Self> {
        reader.read_int(path)
    }
}

impl FieldValue for f64 {
    fn read(reader: &dyn ContainerReader, path: &str) -> Option<Self> {
        reader.read_float(path)
    }
}

impl FieldValue for String {
    fn read(reader: &dyn ContainerReader, path: &str) -> Option<Self> {
        reader.read_text(path)
    }
}

/// One possible location of a field.
#[derive(Clone, Debug)]
pub struct Candidate<T> {
    pub path: &'static str,
    /// Applied to a valid stored value before it is returned.
    pub transform: fn(T) -> T,
    /// Log a deprecation warning when this location is the one that resolves.
    pub deprecated: bool,
}

fn unchanged<T>(value: T) -> T {
    value
}

impl<T> Candidate<T> {
    pub fn at(path: &'static str) -> Self {
        Self {
            path,
            transform: unchanged,
            deprecated: false,
        }
    }

    pub fn with_transform(mut self, transform: fn(T) -> T) -> Self {
        self.transform = transform;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// Ordered candidate locations for a field plus its validity rule.
///
/// Adding support for a new firmware layout means adding a candidate, not a branch.
#[derive(Clone, Debug)]
pub struct FieldSpec<T> {
    pub name: &'static str,
    pub candidates: Vec<Candidate<T>>,
    pub is_valid: fn(&T) -> bool,
    /// Logged when every candidate is exhausted.
    pub fallback_note: &'static str,
}

/// Outcome of resolving a field.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    /// Path the value came from; `None` when the default was used.
    pub source: Option<&'static str>,
}

impl<T> Resolved<T> {
    pub fn is_fallback(&self) -> bool {
        self.source.is_none()
    }
}

impl<T: FieldValue> FieldSpec<T> {
    pub fn new(name: &'static str, is_valid: fn(&T) -> bool) -> Self {
        Self {
            name,
            candidates: Vec::new(),
            is_valid,
            fallback_note: "not present; using default",
        }
    }

    pub fn candidate(mut self, candidate: Candidate<T>) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn at(self, path: &'static str) -> Self {
        self.candidate(Candidate::at(path))
    }

    pub fn on_fallback(mut self, note: &'static str) -> Self {
        self.fallback_note = note;
        self
    }

    /// Try each candidate in order and return the first valid value, or `default`.
    pub fn resolve(&self, reader: &dyn ContainerReader, default: T) -> Resolved<T> {
        for candidate in &self.candidates {
            match T::read(reader, candidate.path) {
                Some(stored) if (self.is_valid)(&stored) => {
                    info!(path = candidate.path, value = ?stored, "{} resolved", self.name);
                    if candidate.deprecated {
                        warn!(
                            path = candidate.path,
                            "Use of this field is deprecated; you might want to change the \
                             OVERLOAD setting in subsequent processing"
                        );
                    }
                    return Resolved {
                        value: (candidate.transform)(stored),
                        source: Some(candidate.path),
                    };
                }
                Some(stored) => {
                    debug!(path = candidate.path, value = ?stored, "{} invalid here, trying next location", self.name);
                }
                None => {
                    debug!(path = candidate.path, "{} not present, trying next location", self.name);
                }
            }
        }
        warn!(field = self.name, default = ?default, "{}", self.fallback_note);
        Resolved {
            value: default,
            source: None,
        }
    }
}

pub(crate) fn positive_int(v: &i64) -> bool {
    *v > 0
}

pub(crate) fn positive_float(v: &f64) -> bool {
    *v > 0.0
}

pub(crate) fn non_empty(v: &String) -> bool {
    !v.trim().is_empty()
}

pub(crate) fn any_int(_: &i64) -> bool {
    true
}

pub(crate) fn any_float(_: &f64) -> bool {
    true
}
