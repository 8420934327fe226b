//! Input value model.
//!
//! `Value` is the closed set of shapes the sanitizer accepts. Containers and
//! objects are shared handles so callers can hand over graphs with shared or
//! self-referencing nodes; the sanitizer tracks them by allocation identity.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// A value destined for a log line.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(ArrayRef),
    Object(ObjectRef),
}

impl Value {
    /// Short name of the shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Identity of a shared node: the address of its allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Ordered container contents.
#[derive(Debug, Clone)]
pub enum Container {
    /// Positional entries.
    List(Vec<Value>),
    /// Keyed entries in insertion order.
    Map(Vec<(String, Value)>),
}

impl Container {
    pub fn len(&self) -> usize {
        match self {
            Container::List(items) => items.len(),
            Container::Map(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared handle to a container.
#[derive(Clone)]
pub struct ArrayRef(Rc<RefCell<Container>>);

impl ArrayRef {
    pub fn new(container: Container) -> Self {
        Self(Rc::new(RefCell::new(container)))
    }

    /// Empty positional container.
    pub fn list() -> Self {
        Self::new(Container::List(Vec::new()))
    }

    /// Empty keyed container.
    pub fn map() -> Self {
        Self::new(Container::Map(Vec::new()))
    }

    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// Append to a list. On a map the value is keyed by its position.
    pub fn push(&self, value: impl Into<Value>) {
        let mut container = self.0.borrow_mut();
        match &mut *container {
            Container::List(items) => items.push(value.into()),
            Container::Map(entries) => {
                let key = entries.len().to_string();
                entries.push((key, value.into()));
            }
        }
    }

    /// Insert or replace a keyed entry. A list is converted to a map first,
    /// keeping positions as keys.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut container = self.0.borrow_mut();
        if let Container::List(items) = &mut *container {
            let entries = std::mem::take(items)
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect();
            *container = Container::Map(entries);
        }
        if let Container::Map(entries) = &mut *container {
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn try_borrow(&self) -> Option<Ref<'_, Container>> {
        self.0.try_borrow().ok()
    }

    #[cfg(test)]
    pub(crate) fn borrow_mut_for_test(&self) -> std::cell::RefMut<'_, Container> {
        self.0.borrow_mut()
    }
}

impl fmt::Debug for ArrayRef {
    // Never follows entries: the graph may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(container) => write!(f, "ArrayRef({:#x}, len={})", self.id().0, container.len()),
            Err(_) => write!(f, "ArrayRef({:#x}, borrowed)", self.id().0),
        }
    }
}

/// Whether a field is visible from outside the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A named field of an object-like record.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub value: Value,
    pub visibility: Visibility,
}

/// An object-like record: a type name plus ordered fields.
#[derive(Debug, Clone)]
pub struct Object {
    pub type_name: String,
    pub fields: Vec<Field>,
}

impl Object {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn public_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|field| field.visibility == Visibility::Public)
    }
}

/// Shared handle to an object.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(Object::new(type_name))))
    }

    pub fn id(&self) -> NodeId {
        NodeId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.set(name.into(), value.into(), Visibility::Public);
    }

    pub fn set_private_field(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.set(name.into(), value.into(), Visibility::Private);
    }

    fn set(&self, name: String, value: Value, visibility: Visibility) {
        let mut object = self.0.borrow_mut();
        match object.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => {
                field.value = value;
                field.visibility = visibility;
            }
            None => object.fields.push(Field {
                name,
                value,
                visibility,
            }),
        }
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    pub(crate) fn try_borrow(&self) -> Option<Ref<'_, Object>> {
        self.0.try_borrow().ok()
    }

    #[cfg(test)]
    pub(crate) fn borrow_mut_for_test(&self) -> std::cell::RefMut<'_, Object> {
        self.0.borrow_mut()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(object) => write!(
                f,
                "ObjectRef({:#x}, {}, fields={})",
                self.id().0,
                object.type_name,
                object.fields.len()
            ),
            Err(_) => write!(f, "ObjectRef({:#x}, borrowed)", self.id().0),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<ArrayRef> for Value {
    fn from(value: ArrayRef) -> Self {
        Value::Array(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(ArrayRef::new(Container::List(items)))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(ArrayRef::new(Container::List(
                    items.into_iter().map(Value::from).collect(),
                )))
            }
            serde_json::Value::Object(map) => Value::Array(ArrayRef::new(Container::Map(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ))),
        }
    }
}
