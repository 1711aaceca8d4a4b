//! Scalar constants and operation kinds.

use std::hash::{Hash, Hasher};
use std::mem::discriminant;

use fori_dtype::{DType, HasDType};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single element value, stored at the widest width of its category.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

// Floats hash by bit pattern so literals can take part in content hashing.
impl Hash for ConstValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match *self {
            Self::Int(v) => v.hash(state),
            Self::UInt(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Bool(v) => v.hash(state),
        }
    }
}

/// Helper macro to cast to target width and back to storage type (for proper truncation/extension).
macro_rules! cast_via {
    ($v:expr, $target:ty, $storage:ty) => {
        ($v as $target) as $storage
    };
}

#[inline]
fn cast_int(v: i64, to: DType) -> ConstValue {
    use DType::*;
    match to {
        Bool => ConstValue::Bool(v != 0),
        Int8 => ConstValue::Int(cast_via!(v, i8, i64)),
        Int16 => ConstValue::Int(cast_via!(v, i16, i64)),
        Int32 => ConstValue::Int(cast_via!(v, i32, i64)),
        Int64 => ConstValue::Int(v),
        UInt8 => ConstValue::UInt(cast_via!(v, u8, u64)),
        UInt16 => ConstValue::UInt(cast_via!(v, u16, u64)),
        UInt32 => ConstValue::UInt(cast_via!(v, u32, u64)),
        UInt64 => ConstValue::UInt(v as u64),
        Float32 => ConstValue::Float(cast_via!(v, f32, f64)),
        Float64 => ConstValue::Float(v as f64),
    }
}

#[inline]
fn cast_uint(v: u64, to: DType) -> ConstValue {
    use DType::*;
    match to {
        Bool => ConstValue::Bool(v != 0),
        Int8 => ConstValue::Int(cast_via!(v, i8, i64)),
        Int16 => ConstValue::Int(cast_via!(v, i16, i64)),
        Int32 => ConstValue::Int(cast_via!(v, i32, i64)),
        Int64 => ConstValue::Int(v as i64),
        UInt8 => ConstValue::UInt(cast_via!(v, u8, u64)),
        UInt16 => ConstValue::UInt(cast_via!(v, u16, u64)),
        UInt32 => ConstValue::UInt(cast_via!(v, u32, u64)),
        UInt64 => ConstValue::UInt(v),
        Float32 => ConstValue::Float(cast_via!(v, f32, f64)),
        Float64 => ConstValue::Float(v as f64),
    }
}

#[inline]
fn cast_float(v: f64, to: DType) -> ConstValue {
    use DType::*;
    match to {
        Bool => ConstValue::Bool(v != 0.0),
        Int8 => ConstValue::Int(cast_via!(v, i8, i64)),
        Int16 => ConstValue::Int(cast_via!(v, i16, i64)),
        Int32 => ConstValue::Int(cast_via!(v, i32, i64)),
        Int64 => ConstValue::Int(v as i64),
        // Float-to-unsigned routes through i64 first.
        UInt8 => ConstValue::UInt(cast_via!(v as i64, u8, u64)),
        UInt16 => ConstValue::UInt(cast_via!(v as i64, u16, u64)),
        UInt32 => ConstValue::UInt(cast_via!(v as i64, u32, u64)),
        UInt64 => ConstValue::UInt((v as i64) as u64),
        Float32 => ConstValue::Float(cast_via!(v, f32, f64)),
        Float64 => ConstValue::Float(v),
    }
}

impl ConstValue {
    pub const fn zero(dtype: DType) -> Self {
        use DType::*;
        match dtype {
            Bool => Self::Bool(false),
            Int8 | Int16 | Int32 | Int64 => Self::Int(0),
            UInt8 | UInt16 | UInt32 | UInt64 => Self::UInt(0),
            Float32 | Float64 => Self::Float(0.0),
        }
    }

    pub const fn one(dtype: DType) -> Self {
        use DType::*;
        match dtype {
            Bool => Self::Bool(true),
            Int8 | Int16 | Int32 | Int64 => Self::Int(1),
            UInt8 | UInt16 | UInt32 | UInt64 => Self::UInt(1),
            Float32 | Float64 => Self::Float(1.0),
        }
    }

    /// Cast to `dtype`, truncating or extending to its width.
    pub fn cast(self, dtype: DType) -> Self {
        match self {
            Self::Bool(v) => cast_int(v as i64, dtype),
            Self::Int(v) => cast_int(v, dtype),
            Self::UInt(v) => cast_uint(v, dtype),
            Self::Float(v) => cast_float(v, dtype),
        }
    }

    /// Whether this value is stored in the representation `dtype` uses.
    pub const fn fits(&self, dtype: DType) -> bool {
        matches!(
            (self, dtype),
            (Self::Bool(_), DType::Bool)
                | (Self::Int(_), DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64)
                | (Self::UInt(_), DType::UInt8 | DType::UInt16 | DType::UInt32 | DType::UInt64)
                | (Self::Float(_), DType::Float32 | DType::Float64)
        )
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConstValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Host scalar types that convert to and from [`ConstValue`].
pub trait HostScalar: HasDType {
    fn into_const(self) -> ConstValue;
    fn from_const(value: ConstValue) -> Option<Self>;
}

macro_rules! impl_host_scalar {
    ($variant:ident: $($ty:ty),* $(,)?) => {
        $(impl HostScalar for $ty {
            fn into_const(self) -> ConstValue {
                ConstValue::$variant(self as _)
            }

            fn from_const(value: ConstValue) -> Option<Self> {
                match value {
                    ConstValue::$variant(v) => Some(v as $ty),
                    _ => None,
                }
            }
        })*
    };
}

impl_host_scalar!(Int: i8, i16, i32, i64);
impl_host_scalar!(UInt: u8, u16, u32, u64);
impl_host_scalar!(Float: f32, f64);

impl HostScalar for bool {
    fn into_const(self) -> ConstValue {
        ConstValue::Bool(self)
    }

    fn from_const(value: ConstValue) -> Option<Self> {
        value.as_bool()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum UnaryOp {
    #[strum(serialize = "negate")]
    Neg,
    Not,
    Abs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum BinaryOp {
    Add,
    #[strum(serialize = "subtract")]
    Sub,
    #[strum(serialize = "multiply")]
    Mul,
    #[strum(serialize = "divide")]
    Div,
    #[strum(serialize = "remainder")]
    Rem,
    #[strum(serialize = "maximum")]
    Max,
    #[strum(serialize = "minimum")]
    Min,
    And,
    Or,
}

impl BinaryOp {
    /// Logical ops accept only predicates and integers.
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "UPPERCASE")]
pub enum ComparisonDirection {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}
