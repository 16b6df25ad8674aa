//! Type tags and the name ↔ tag registry.
//!
//! Tags are single bytes on the wire. `U16`..`I64` exist for naming only: field
//! bodies of those widths are always written with the generic `Varint` tag.
//! The registry is a pair of `match` tables, fixed at compile time.

use std::fmt;

use crate::error::ProtoError;

/// Wire type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Nil = 0,
    Bool = 1,
    U8 = 2,
    I8 = 3,
    U16 = 4,
    I16 = 5,
    U32 = 6,
    I32 = 7,
    U64 = 8,
    I64 = 9,
    Varint = 10,
    Float = 11,
    Double = 12,
    Str = 13,
    StrIdx = 14,
    Raw = 15,
    Arr = 16,
    Map = 17,
}

/// Every tag in wire order.
pub const ALL_TAGS: [TypeTag; 18] = [
    TypeTag::Nil,
    TypeTag::Bool,
    TypeTag::U8,
    TypeTag::I8,
    TypeTag::U16,
    TypeTag::I16,
    TypeTag::U32,
    TypeTag::I32,
    TypeTag::U64,
    TypeTag::I64,
    TypeTag::Varint,
    TypeTag::Float,
    TypeTag::Double,
    TypeTag::Str,
    TypeTag::StrIdx,
    TypeTag::Raw,
    TypeTag::Arr,
    TypeTag::Map,
];

impl TypeTag {
    /// Raw wire byte.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Registry name (`"u8"`, `"str_idx"`, `"map"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Nil => "nil",
            TypeTag::Bool => "bool",
            TypeTag::U8 => "u8",
            TypeTag::I8 => "i8",
            TypeTag::U16 => "u16",
            TypeTag::I16 => "i16",
            TypeTag::U32 => "u32",
            TypeTag::I32 => "i32",
            TypeTag::U64 => "u64",
            TypeTag::I64 => "i64",
            TypeTag::Varint => "varint",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::Str => "str",
            TypeTag::StrIdx => "str_idx",
            TypeTag::Raw => "raw",
            TypeTag::Arr => "arr",
            TypeTag::Map => "map",
        }
    }

    /// Reverse lookup of [`TypeTag::name`].
    pub fn from_name(name: &str) -> Option<TypeTag> {
        let tag = match name {
            "nil" => TypeTag::Nil,
            "bool" => TypeTag::Bool,
            "u8" => TypeTag::U8,
            "i8" => TypeTag::I8,
            "u16" => TypeTag::U16,
            "i16" => TypeTag::I16,
            "u32" => TypeTag::U32,
            "i32" => TypeTag::I32,
            "u64" => TypeTag::U64,
            "i64" => TypeTag::I64,
            "varint" => TypeTag::Varint,
            "float" => TypeTag::Float,
            "double" => TypeTag::Double,
            "str" => TypeTag::Str,
            "str_idx" => TypeTag::StrIdx,
            "raw" => TypeTag::Raw,
            "arr" => TypeTag::Arr,
            "map" => TypeTag::Map,
            _ => return None,
        };
        Some(tag)
    }
}

impl TryFrom<u8> for TypeTag {
    type Error = ProtoError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        ALL_TAGS
            .get(v as usize)
            .copied()
            .ok_or(ProtoError::UnknownTag(v))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry lookup used by tooling: unknown names map to `nil`.
pub fn name_to_tag(name: &str) -> u8 {
    TypeTag::from_name(name).unwrap_or(TypeTag::Nil).as_u8()
}

/// Registry lookup used by tooling: unknown tags map to `"nil"`.
pub fn tag_to_name(tag: u8) -> &'static str {
    TypeTag::try_from(tag).map(TypeTag::name).unwrap_or("nil")
}
