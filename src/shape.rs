//! Shape declarations.
//!
//! A shape is a typed target for payload mapping. Its exposure metadata is
//! declared once, in [`Shape::expose`], and its constraints in
//! [`Shape::constrain`]; both are collected by the
//! [`ShapeRegistry`](crate::ShapeRegistry) at startup.

use std::any::TypeId;

use serde::de::DeserializeOwned;

use crate::coerce::Coercion;
use crate::constraint::RuleSet;
use crate::expose::GroupSet;

/// A typed object the pipeline can produce from a payload.
///
/// Every field the declaration exposes should be an `Option<_>` (or carry
/// `#[serde(default)]`) so that omitted properties deserialize cleanly.
///
/// # Examples
///
/// ```
/// use case_pipeline::{default_exposure, Coercion, GroupSet, Shape, ShapeDecl};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct ContactPreferences {
///     phone: Option<String>,
///     sms_allowed: Option<bool>,
/// }
///
/// impl Shape for ContactPreferences {
///     const NAME: &'static str = "ContactPreferences";
///
///     fn expose(decl: &mut ShapeDecl) {
///         decl.property("phone").expose(GroupSet::default_only()).text();
///         decl.property("smsAllowed")
///             .expose(default_exposure(["contact"]))
///             .coerce(Coercion::Boolean)
///             .boolean();
///     }
/// }
/// ```
pub trait Shape: DeserializeOwned + Send + Sync + 'static {
    /// Name used in errors and logs.
    const NAME: &'static str;

    /// Declares the exposed properties.
    fn expose(decl: &mut ShapeDecl);

    /// Declares constraints. Shapes without rules keep the default.
    fn constrain(_rules: &mut RuleSet<Self>) {}
}

/// Reference to a registered nested shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedShape {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

impl NestedShape {
    fn of<S: Shape>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: S::NAME,
        }
    }

    /// Name of the nested shape.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Accepted JSON type of a property after coercion.
///
/// Values of any other type are dropped during mapping, as if absent.
/// `null` is always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any JSON value; pair with `Option<serde_json::Value>`.
    Any,
    /// JSON string.
    Text,
    /// Any JSON number; pair with a float.
    Number,
    /// JSON integer.
    Integer,
    /// JSON boolean.
    Bool,
    /// A single nested object.
    Nested(NestedShape),
    /// An array of nested objects, mapped element by element.
    NestedList(NestedShape),
}

impl FieldKind {
    pub(crate) fn nested(&self) -> Option<NestedShape> {
        match self {
            FieldKind::Nested(n) | FieldKind::NestedList(n) => Some(*n),
            _ => None,
        }
    }
}

/// Declared metadata for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub(crate) name: &'static str,
    pub(crate) groups: GroupSet,
    pub(crate) kind: FieldKind,
    pub(crate) coercion: Option<Coercion>,
}

impl PropertyDecl {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            groups: GroupSet::new(),
            kind: FieldKind::Any,
            coercion: None,
        }
    }

    /// Payload key and output field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Groups the property is exposed under; empty means never mapped.
    pub fn groups(&self) -> &GroupSet {
        &self.groups
    }

    /// Declared kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Declared coercion, if any.
    pub fn coercion(&self) -> Option<Coercion> {
        self.coercion
    }
}

/// Collects property declarations for one shape.
#[derive(Debug, Default)]
pub struct ShapeDecl {
    properties: Vec<PropertyDecl>,
}

impl ShapeDecl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Declares a property. It stays hidden until given exposure groups.
    pub fn property(&mut self, name: &'static str) -> PropertyBuilder<'_> {
        self.properties.push(PropertyDecl::new(name));
        let index = self.properties.len() - 1;
        PropertyBuilder {
            decl: &mut self.properties[index],
        }
    }

    pub(crate) fn into_properties(self) -> Vec<PropertyDecl> {
        self.properties
    }
}

/// Builder for a single property declaration.
#[derive(Debug)]
pub struct PropertyBuilder<'a> {
    decl: &'a mut PropertyDecl,
}

impl PropertyBuilder<'_> {
    /// Exposes the property under `groups`.
    pub fn expose(self, groups: GroupSet) -> Self {
        self.decl.groups = groups;
        self
    }

    /// Applies `coercion` before the kind check.
    pub fn coerce(self, coercion: Coercion) -> Self {
        self.decl.coercion = Some(coercion);
        self
    }

    /// Accepts strings.
    pub fn text(self) -> Self {
        self.kind(FieldKind::Text)
    }

    /// Accepts any number.
    pub fn number(self) -> Self {
        self.kind(FieldKind::Number)
    }

    /// Accepts integers.
    pub fn integer(self) -> Self {
        self.kind(FieldKind::Integer)
    }

    /// Accepts booleans.
    pub fn boolean(self) -> Self {
        self.kind(FieldKind::Bool)
    }

    /// Maps a nested object as shape `S`.
    pub fn nested<S: Shape>(self) -> Self {
        self.kind(FieldKind::Nested(NestedShape::of::<S>()))
    }

    /// Maps an array of objects as shape `S`.
    pub fn nested_list<S: Shape>(self) -> Self {
        self.kind(FieldKind::NestedList(NestedShape::of::<S>()))
    }

    fn kind(self, kind: FieldKind) -> Self {
        self.decl.kind = kind;
        self
    }
}
