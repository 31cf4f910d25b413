//! Process-lifetime shape metadata and the mapping/validation entry points.
//!
//! Shapes are registered once, before the first request, through
//! [`ShapeRegistryBuilder`]. [`ShapeRegistryBuilder::build`] checks the
//! declarations and returns a frozen [`ShapeRegistry`]; nothing can change
//! its metadata afterwards, so a single instance is shared by every request.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::OnceCell;
use serde_json::{Map, Value};

use crate::constraint::{RuleSet, ValidationContext};
use crate::error::Error;
use crate::expose::GroupSet;
use crate::payload::Payload;
use crate::shape::{FieldKind, PropertyDecl, Shape, ShapeDecl};
use crate::validated::Validated;

static GLOBAL: OnceCell<ShapeRegistry> = OnceCell::new();

struct Entry {
    name: &'static str,
    properties: Vec<PropertyDecl>,
    // RuleSet<T> for the shape registered under this entry's TypeId.
    rules: Box<dyn Any + Send + Sync>,
}

/// Collects shape registrations before the registry is frozen.
#[derive(Default)]
pub struct ShapeRegistryBuilder {
    entries: HashMap<TypeId, Entry>,
}

impl ShapeRegistryBuilder {
    /// Registers shape `T`, reading its exposure and constraint declarations.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyRegistered`] if `T` was registered before
    /// - [`Error::DuplicateProperty`] if `T` declares a property twice
    pub fn register<T: Shape>(mut self) -> Result<Self, Error> {
        let id = TypeId::of::<T>();
        if self.entries.contains_key(&id) {
            return Err(Error::AlreadyRegistered(T::NAME));
        }

        let mut decl = ShapeDecl::new();
        T::expose(&mut decl);
        let properties = decl.into_properties();

        let mut seen = HashSet::new();
        if let Some(duplicate) = properties.iter().find(|p| !seen.insert(p.name)) {
            return Err(Error::DuplicateProperty {
                shape: T::NAME,
                property: duplicate.name,
            });
        }

        let mut rules = RuleSet::<T>::new();
        T::constrain(&mut rules);

        tracing::debug!(
            shape = T::NAME,
            properties = properties.len(),
            rules = rules.len(),
            "registered shape"
        );

        self.entries.insert(
            id,
            Entry {
                name: T::NAME,
                properties,
                rules: Box::new(rules),
            },
        );
        Ok(self)
    }

    /// Freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingNestedShape`] if a property nests a shape that
    /// was not registered.
    pub fn build(self) -> Result<ShapeRegistry, Error> {
        for entry in self.entries.values() {
            for property in &entry.properties {
                let Some(nested) = property.kind.nested() else {
                    continue;
                };
                if !self.entries.contains_key(&nested.id) {
                    return Err(Error::MissingNestedShape {
                        shape: entry.name,
                        property: property.name,
                    });
                }
            }
        }

        Ok(ShapeRegistry {
            entries: self.entries,
        })
    }
}

impl fmt::Debug for ShapeRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistryBuilder")
            .field("shapes", &shape_names(&self.entries))
            .finish()
    }
}

/// Frozen, read-only shape metadata.
///
/// # Examples
///
/// ```
/// use case_pipeline::{GroupSet, Payload, Shape, ShapeDecl, ShapeRegistry};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Debug, Deserialize)]
/// struct Pair {
///     a: Option<i64>,
///     b: Option<i64>,
/// }
///
/// impl Shape for Pair {
///     const NAME: &'static str = "Pair";
///
///     fn expose(decl: &mut ShapeDecl) {
///         decl.property("a").expose(GroupSet::default_only()).integer();
///     }
/// }
///
/// let registry = ShapeRegistry::builder().register::<Pair>()?.build()?;
/// let payload = Payload::new(json!({ "a": 1, "b": 2 }));
/// let pair: Pair = registry.map_to_typed(&payload, &GroupSet::new())?;
///
/// assert_eq!(pair.a, Some(1));
/// assert_eq!(pair.b, None);
/// # Ok::<(), case_pipeline::Error>(())
/// ```
pub struct ShapeRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl ShapeRegistry {
    /// Starts a new registration.
    pub fn builder() -> ShapeRegistryBuilder {
        ShapeRegistryBuilder::default()
    }

    /// Makes this registry the process-wide one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryInstalled`] if a registry was already installed.
    pub fn install(self) -> Result<&'static ShapeRegistry, Error> {
        GLOBAL.set(self).map_err(|_| Error::RegistryInstalled)?;
        GLOBAL.get().ok_or(Error::RegistryInstalled)
    }

    /// Returns the process-wide registry, if one was installed.
    pub fn global() -> Option<&'static ShapeRegistry> {
        GLOBAL.get()
    }

    /// Returns true if `T` is registered.
    pub fn contains<T: Shape>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Returns the declared properties of `T`.
    pub fn properties<T: Shape>(&self) -> Option<&[PropertyDecl]> {
        self.entries
            .get(&TypeId::of::<T>())
            .map(|e| e.properties.as_slice())
    }

    /// Maps `payload` onto `T` under `groups` (the default group when empty).
    ///
    /// Only properties exposed for the active groups are read. Undeclared
    /// fields are dropped, values of the wrong JSON type are dropped, and
    /// declared coercions are applied. Bad payload data never produces an
    /// error.
    ///
    /// # Errors
    ///
    /// - [`Error::UnregisteredShape`] if `T` is not registered
    /// - [`Error::ShapeMismatch`] if `T`'s struct disagrees with its declaration
    pub fn map_to_typed<T: Shape>(&self, payload: &Payload, groups: &GroupSet) -> Result<T, Error> {
        let entry = self.entry::<T>()?;
        let groups = groups.or_default();
        let projected = self.project(entry, payload.fields(), &groups);

        serde_json::from_value(Value::Object(projected)).map_err(|source| Error::ShapeMismatch {
            shape: T::NAME,
            source,
        })
    }

    /// Runs `T`'s constraints against `object`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with every failure, or
    /// [`Error::UnregisteredShape`] if `T` is not registered.
    pub fn validate<T: Shape>(&self, object: &T, ctx: &ValidationContext<'_>) -> Result<(), Error> {
        let rules = self
            .entry::<T>()?
            .rules
            .downcast_ref::<RuleSet<T>>()
            .ok_or(Error::UnregisteredShape(T::NAME))?;

        rules.evaluate(object, ctx).into_result().map_err(Error::from)
    }

    /// Maps then validates, yielding a [`Validated`] object.
    ///
    /// # Errors
    ///
    /// Any error from [`map_to_typed`](Self::map_to_typed) or
    /// [`validate`](Self::validate).
    pub fn transform<T: Shape>(
        &self,
        payload: &Payload,
        groups: &GroupSet,
        ctx: &ValidationContext<'_>,
    ) -> Result<Validated<T>, Error> {
        let object = self.map_to_typed::<T>(payload, groups)?;
        self.validate(&object, ctx)?;
        Ok(Validated::new_unchecked(object))
    }

    fn entry<T: Shape>(&self) -> Result<&Entry, Error> {
        self.entries
            .get(&TypeId::of::<T>())
            .ok_or(Error::UnregisteredShape(T::NAME))
    }

    fn project(
        &self,
        entry: &Entry,
        source: &Map<String, Value>,
        groups: &GroupSet,
    ) -> Map<String, Value> {
        let mut out = Map::new();

        for property in entry.properties.iter().filter(|p| p.groups.intersects(groups)) {
            let Some(raw) = source.get(property.name) else {
                continue;
            };
            match self.project_value(property, raw, groups) {
                Some(value) => {
                    out.insert(property.name.to_string(), value);
                }
                None => tracing::trace!(
                    shape = entry.name,
                    property = property.name,
                    "dropped value of unexpected type"
                ),
            }
        }

        tracing::trace!(
            shape = entry.name,
            received = source.len(),
            mapped = out.len(),
            "projected payload"
        );
        out
    }

    fn project_value(
        &self,
        property: &PropertyDecl,
        raw: &Value,
        groups: &GroupSet,
    ) -> Option<Value> {
        let value = match property.coercion {
            Some(coercion) => coercion.apply(raw),
            None => raw.clone(),
        };

        match (property.kind, value) {
            (_, Value::Null) => Some(Value::Null),
            (FieldKind::Nested(nested), Value::Object(map)) => {
                let entry = self.entries.get(&nested.id)?;
                Some(Value::Object(self.project(entry, &map, groups)))
            }
            (FieldKind::NestedList(nested), Value::Array(items)) => {
                let entry = self.entries.get(&nested.id)?;
                Some(Value::Array(
                    items
                        .iter()
                        .filter_map(Value::as_object)
                        .map(|map| Value::Object(self.project(entry, map, groups)))
                        .collect(),
                ))
            }
            (kind, value) => accepts(kind, &value).then_some(value),
        }
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("shapes", &shape_names(&self.entries))
            .finish()
    }
}

fn accepts(kind: FieldKind, value: &Value) -> bool {
    match (kind, value) {
        (FieldKind::Any, _) => true,
        (FieldKind::Text, Value::String(_)) => true,
        (FieldKind::Number, Value::Number(_)) => true,
        (FieldKind::Integer, Value::Number(n)) => n.is_i64(),
        (FieldKind::Bool, Value::Bool(_)) => true,
        _ => false,
    }
}

fn shape_names(entries: &HashMap<TypeId, Entry>) -> Vec<&'static str> {
    let mut names: Vec<_> = entries.values().map(|e| e.name).collect();
    names.sort_unstable();
    names
}
