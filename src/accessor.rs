//! Accessor discovery for target types.
//!
//! A [`RowModel`] publishes a registration table of named methods. Resolution
//! walks that table on every call, keeps methods whose name starts with the
//! access-kind prefix (`get` / `set`), and matches the rest of the name against
//! requested attributes through [`normalize`](crate::naming::normalize).
//! Most models get their table from `#[derive(RowModel)]`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use log::trace;

use crate::core::{BridgeError, Representation, Result, Value};
use crate::naming::normalize;

pub type Getter<T> = fn(&T) -> Value;
pub type Setter<T> = fn(&mut T, Value) -> std::result::Result<(), String>;
pub type Constructor<T> = fn() -> T;

/// Type whose attributes can be read and written by name.
pub trait RowModel: Sized {
    /// Name used in error messages.
    fn type_name() -> &'static str;

    /// Every accessor the type exposes, in registration order.
    fn methods() -> Vec<Method<Self>>;

    /// Zero-argument constructor, if the type has one.
    fn constructor() -> Option<Constructor<Self>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Get,
    Set,
}

impl AccessKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
        }
    }
}

pub enum MethodKind<T> {
    Getter(Getter<T>),
    Setter {
        parameter: Representation,
        apply: Setter<T>,
    },
}

impl<T> Clone for MethodKind<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Getter(get) => Self::Getter(*get),
            Self::Setter { parameter, apply } => Self::Setter {
                parameter: *parameter,
                apply: *apply,
            },
        }
    }
}

/// A named getter or setter registered by a [`RowModel`].
pub struct Method<T> {
    name: Cow<'static, str>,
    kind: MethodKind<T>,
}

impl<T> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<T> fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("kind", &self.access_kind())
            .field("parameter", &self.parameter())
            .finish()
    }
}

impl<T> Method<T> {
    pub fn getter(name: impl Into<Cow<'static, str>>, get: Getter<T>) -> Self {
        Self {
            name: name.into(),
            kind: MethodKind::Getter(get),
        }
    }

    pub fn setter(
        name: impl Into<Cow<'static, str>>,
        parameter: Representation,
        apply: Setter<T>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MethodKind::Setter { parameter, apply },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn access_kind(&self) -> AccessKind {
        match self.kind {
            MethodKind::Getter(_) => AccessKind::Get,
            MethodKind::Setter { .. } => AccessKind::Set,
        }
    }

    /// Declared parameter representation; `None` for getters.
    pub fn parameter(&self) -> Option<Representation> {
        match self.kind {
            MethodKind::Getter(_) => None,
            MethodKind::Setter { parameter, .. } => Some(parameter),
        }
    }

    pub fn get(&self, target: &T) -> Result<Value> {
        match self.kind {
            MethodKind::Getter(get) => Ok(get(target)),
            MethodKind::Setter { .. } => Err(self.invocation_error("method is a setter")),
        }
    }

    /// Hands `value` to the setter as-is; callers coerce beforehand.
    pub fn set(&self, target: &mut T, value: Value) -> Result<()> {
        match self.kind {
            MethodKind::Setter { apply, .. } => {
                apply(target, value).map_err(|message| self.invocation_error(message))
            }
            MethodKind::Getter(_) => Err(self.invocation_error("method is a getter")),
        }
    }

    fn invocation_error(&self, message: impl Into<String>) -> BridgeError {
        BridgeError::Invocation {
            method: self.name.to_string(),
            message: message.into(),
        }
    }
}

/// Resolves one accessor per attribute, in request order.
///
/// Later registrations with the same normalized name replace earlier ones.
/// A single unresolved attribute fails the whole batch.
pub fn resolve_accessors<T, S>(kind: AccessKind, attributes: &[S]) -> Result<Vec<Method<T>>>
where
    T: RowModel,
    S: AsRef<str>,
{
    let prefix = kind.prefix();
    let mut by_name: HashMap<String, Method<T>> = HashMap::new();

    for method in T::methods() {
        let name = method.name();
        if name.len() > prefix.len() && name.starts_with(prefix) && method.access_kind() == kind {
            by_name.insert(normalize(&name[prefix.len()..]), method);
        }
    }

    trace!(
        "Resolving {} {:?} accessor(s) on {} from {} candidate(s)",
        attributes.len(),
        kind,
        T::type_name(),
        by_name.len()
    );

    attributes
        .iter()
        .map(|attribute| {
            let attribute = attribute.as_ref();
            by_name
                .get(&normalize(attribute))
                .cloned()
                .ok_or_else(|| BridgeError::AccessorNotFound {
                    attribute: attribute.to_string(),
                    type_name: T::type_name().to_string(),
                })
        })
        .collect()
}

pub fn getters_for<T: RowModel, S: AsRef<str>>(attributes: &[S]) -> Result<Vec<Method<T>>> {
    resolve_accessors(AccessKind::Get, attributes)
}

pub fn setters_for<T: RowModel, S: AsRef<str>>(attributes: &[S]) -> Result<Vec<Method<T>>> {
    resolve_accessors(AccessKind::Set, attributes)
}
