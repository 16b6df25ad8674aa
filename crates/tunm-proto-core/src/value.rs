//! Dynamically typed values.
//!
//! `Value` owns its payload. `ValueRef` is the non-owning view the encoder
//! walks, so caller-held data is encoded without copying.
//!
//! Equality and hashing follow the payload of the active variant. `Float` and
//! `Double` compare by their fixed-point `get_num()` (×1000 / ×1_000_000),
//! which is exactly the precision that survives the wire.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::error::ProtoError;
use crate::types::TypeTag;

/// Insertion-ordered map; iteration order is encode order.
pub type ValueMap = IndexMap<Value, Value>;

pub(crate) const FLOAT_SCALE: f64 = 1000.0;
pub(crate) const DOUBLE_SCALE: f64 = 1_000_000.0;

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Varint(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Raw(Vec<u8>),
    Arr(Vec<Value>),
    Map(ValueMap),
}

pub(crate) fn scale_float(v: f32) -> i64 {
    (f64::from(v) * FLOAT_SCALE).round() as i64
}

pub(crate) fn scale_double(v: f64) -> i64 {
    (v * DOUBLE_SCALE).round() as i64
}

impl Value {
    /// Tag of the active variant (the natural tag, before wire collapsing).
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Nil => TypeTag::Nil,
            Value::Bool(_) => TypeTag::Bool,
            Value::U8(_) => TypeTag::U8,
            Value::I8(_) => TypeTag::I8,
            Value::U16(_) => TypeTag::U16,
            Value::I16(_) => TypeTag::I16,
            Value::U32(_) => TypeTag::U32,
            Value::I32(_) => TypeTag::I32,
            Value::U64(_) => TypeTag::U64,
            Value::I64(_) => TypeTag::I64,
            Value::Varint(_) => TypeTag::Varint,
            Value::Float(_) => TypeTag::Float,
            Value::Double(_) => TypeTag::Double,
            Value::Str(_) => TypeTag::Str,
            Value::Raw(_) => TypeTag::Raw,
            Value::Arr(_) => TypeTag::Arr,
            Value::Map(_) => TypeTag::Map,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Numeric payload. `Float` is scaled by 1000 and `Double` by 1_000_000,
    /// both rounded. `U64` above `i64::MAX` wraps, as on the wire.
    pub fn get_num(&self) -> i64 {
        self.as_view().get_num()
    }

    /// Borrow this value as a view.
    pub fn as_view(&self) -> ValueRef<'_> {
        match self {
            Value::Nil => ValueRef::Nil,
            Value::Bool(v) => ValueRef::Bool(*v),
            Value::U8(v) => ValueRef::U8(*v),
            Value::I8(v) => ValueRef::I8(*v),
            Value::U16(v) => ValueRef::U16(*v),
            Value::I16(v) => ValueRef::I16(*v),
            Value::U32(v) => ValueRef::U32(*v),
            Value::I32(v) => ValueRef::I32(*v),
            Value::U64(v) => ValueRef::U64(*v),
            Value::I64(v) => ValueRef::I64(*v),
            Value::Varint(v) => ValueRef::Varint(*v),
            Value::Float(v) => ValueRef::Float(*v),
            Value::Double(v) => ValueRef::Double(*v),
            Value::Str(v) => ValueRef::Str(v),
            Value::Raw(v) => ValueRef::Raw(v),
            Value::Arr(v) => ValueRef::Arr(v),
            Value::Map(v) => ValueRef::Map(v),
        }
    }

    /// Move the payload out, leaving `Nil` behind.
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer variant as `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::U8(_)
            | Value::I8(_)
            | Value::U16(_)
            | Value::I16(_)
            | Value::U32(_)
            | Value::I32(_)
            | Value::U64(_)
            | Value::I64(_)
            | Value::Varint(_) => Some(self.get_num()),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Value::Raw(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_arr(&self) -> Option<&[Value]> {
        match self {
            Value::Arr(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Map lookup by a string key. `None` for non-maps and missing keys.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(&Value::Str(key.to_owned()))
    }
}

/// Non-owning view over caller-held data.
#[derive(Debug, Clone, Copy)]
pub enum ValueRef<'a> {
    Nil,
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Varint(i64),
    Float(f32),
    Double(f64),
    Str(&'a str),
    Raw(&'a [u8]),
    Arr(&'a [Value]),
    Map(&'a ValueMap),
}

impl<'a> ValueRef<'a> {
    pub fn tag(&self) -> TypeTag {
        match self {
            ValueRef::Nil => TypeTag::Nil,
            ValueRef::Bool(_) => TypeTag::Bool,
            ValueRef::U8(_) => TypeTag::U8,
            ValueRef::I8(_) => TypeTag::I8,
            ValueRef::U16(_) => TypeTag::U16,
            ValueRef::I16(_) => TypeTag::I16,
            ValueRef::U32(_) => TypeTag::U32,
            ValueRef::I32(_) => TypeTag::I32,
            ValueRef::U64(_) => TypeTag::U64,
            ValueRef::I64(_) => TypeTag::I64,
            ValueRef::Varint(_) => TypeTag::Varint,
            ValueRef::Float(_) => TypeTag::Float,
            ValueRef::Double(_) => TypeTag::Double,
            ValueRef::Str(_) => TypeTag::Str,
            ValueRef::Raw(_) => TypeTag::Raw,
            ValueRef::Arr(_) => TypeTag::Arr,
            ValueRef::Map(_) => TypeTag::Map,
        }
    }

    pub fn get_num(&self) -> i64 {
        match *self {
            ValueRef::Bool(v) => i64::from(v),
            ValueRef::U8(v) => i64::from(v),
            ValueRef::I8(v) => i64::from(v),
            ValueRef::U16(v) => i64::from(v),
            ValueRef::I16(v) => i64::from(v),
            ValueRef::U32(v) => i64::from(v),
            ValueRef::I32(v) => i64::from(v),
            ValueRef::U64(v) => v as i64,
            ValueRef::I64(v) | ValueRef::Varint(v) => v,
            ValueRef::Float(v) => scale_float(v),
            ValueRef::Double(v) => scale_double(v),
            _ => 0,
        }
    }

    /// Deep copy into an owning value.
    pub fn to_owned_value(&self) -> Value {
        match *self {
            ValueRef::Nil => Value::Nil,
            ValueRef::Bool(v) => Value::Bool(v),
            ValueRef::U8(v) => Value::U8(v),
            ValueRef::I8(v) => Value::I8(v),
            ValueRef::U16(v) => Value::U16(v),
            ValueRef::I16(v) => Value::I16(v),
            ValueRef::U32(v) => Value::U32(v),
            ValueRef::I32(v) => Value::I32(v),
            ValueRef::U64(v) => Value::U64(v),
            ValueRef::I64(v) => Value::I64(v),
            ValueRef::Varint(v) => Value::Varint(v),
            ValueRef::Float(v) => Value::Float(v),
            ValueRef::Double(v) => Value::Double(v),
            ValueRef::Str(v) => Value::Str(v.to_owned()),
            ValueRef::Raw(v) => Value::Raw(v.to_vec()),
            ValueRef::Arr(v) => Value::Arr(v.to_vec()),
            ValueRef::Map(v) => Value::Map(v.clone()),
        }
    }
}

impl<'a> From<&'a Value> for ValueRef<'a> {
    fn from(v: &'a Value) -> Self {
        v.as_view()
    }
}

impl<'a> From<&'a str> for ValueRef<'a> {
    fn from(v: &'a str) -> Self {
        ValueRef::Str(v)
    }
}

impl<'a> From<&'a [u8]> for ValueRef<'a> {
    fn from(v: &'a [u8]) -> Self {
        ValueRef::Raw(v)
    }
}

impl<'a> From<&'a [Value]> for ValueRef<'a> {
    fn from(v: &'a [Value]) -> Self {
        ValueRef::Arr(v)
    }
}

impl<'a> From<&'a ValueMap> for ValueRef<'a> {
    fn from(v: &'a ValueMap) -> Self {
        ValueRef::Map(v)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::Varint(a), Value::Varint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => scale_float(*a) == scale_float(*b),
            (Value::Double(a), Value::Double(b)) => scale_double(*a) == scale_double(*b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Raw(a), Value::Raw(b)) => a == b,
            (Value::Arr(a), Value::Arr(b)) => a == b,
            // Order-insensitive, like the keyed lookup itself.
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(v) => v.hash(state),
            Value::Str(v) => v.hash(state),
            Value::Raw(v) => v.hash(state),
            Value::Arr(v) => v.hash(state),
            // Entries only contribute their count: hashing must not depend on order.
            Value::Map(v) => v.len().hash(state),
            _ => self.get_num().hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(v) => write!(f, "bool({v:?})"),
            Value::U8(v) => write!(f, "u8({v:?})"),
            Value::I8(v) => write!(f, "i8({v:?})"),
            Value::U16(v) => write!(f, "u16({v:?})"),
            Value::I16(v) => write!(f, "i16({v:?})"),
            Value::U32(v) => write!(f, "u32({v:?})"),
            Value::I32(v) => write!(f, "i32({v:?})"),
            Value::U64(v) => write!(f, "u64({v:?})"),
            Value::I64(v) => write!(f, "i64({v:?})"),
            Value::Varint(v) => write!(f, "varint({v:?})"),
            Value::Float(v) => write!(f, "float({v:?})"),
            Value::Double(v) => write!(f, "double({v:?})"),
            Value::Str(v) => write!(f, "str({v:?})"),
            Value::Raw(v) => write!(f, "raw({v:?})"),
            Value::Arr(v) => write!(f, "arr({v:?})"),
            Value::Map(v) => write!(f, "map({v:?})"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = ProtoError;

                fn try_from(v: Value) -> Result<Self, Self::Error> {
                    match v {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(ProtoError::TypeMismatch {
                            expected: TypeTag::$variant.name(),
                            found: other.type_name(),
                        }),
                    }
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => Float,
    f64 => Double,
    String => Str,
    Vec<u8> => Raw,
    Vec<Value> => Arr,
    ValueMap => Map,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Raw(v.to_vec())
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(v: Option<V>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}
