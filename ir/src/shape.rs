//! Shapes of IR values.
//!
//! An IR value is either an array (element type plus dimensions) or a tuple of
//! shapes. Dimensions are usually static; a dynamic dimension carries an
//! optional upper bound and makes the whole shape non-static.

use fori_dtype::DType;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dim {
    Static(usize),
    Dynamic { bound: Option<usize> },
}

impl Dim {
    pub const fn as_static(&self) -> Option<usize> {
        match self {
            Self::Static(n) => Some(*n),
            Self::Dynamic { .. } => None,
        }
    }

    pub const fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }
}

impl From<usize> for Dim {
    fn from(n: usize) -> Self {
        Self::Static(n)
    }
}

impl std::fmt::Display for Dim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(n) => write!(f, "{n}"),
            Self::Dynamic { bound: Some(bound) } => write!(f, "<={bound}"),
            Self::Dynamic { bound: None } => f.write_str("?"),
        }
    }
}

/// Dimension list with inline capacity for the common ranks.
pub type Dims = SmallVec<[Dim; 4]>;

/// Shape of an IR value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    Array { dtype: DType, dims: Dims },
    Tuple(Vec<Shape>),
}

impl Shape {
    /// Static array shape.
    pub fn array(dtype: DType, dims: impl IntoIterator<Item = usize>) -> Self {
        Self::Array { dtype, dims: dims.into_iter().map(Dim::Static).collect() }
    }

    /// Array shape with explicit (possibly dynamic) dimensions.
    pub fn array_with_dims(dtype: DType, dims: impl IntoIterator<Item = Dim>) -> Self {
        Self::Array { dtype, dims: dims.into_iter().collect() }
    }

    /// Rank-0 array.
    pub fn scalar(dtype: DType) -> Self {
        Self::Array { dtype, dims: Dims::new() }
    }

    pub fn tuple(elements: impl IntoIterator<Item = Shape>) -> Self {
        Self::Tuple(elements.into_iter().collect())
    }

    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    pub const fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    pub const fn dtype(&self) -> Option<DType> {
        match self {
            Self::Array { dtype, .. } => Some(*dtype),
            Self::Tuple(_) => None,
        }
    }

    pub fn dims(&self) -> Option<&[Dim]> {
        match self {
            Self::Array { dims, .. } => Some(dims),
            Self::Tuple(_) => None,
        }
    }

    pub fn rank(&self) -> Option<usize> {
        self.dims().map(<[Dim]>::len)
    }

    pub fn tuple_elements(&self) -> Option<&[Shape]> {
        match self {
            Self::Tuple(elements) => Some(elements),
            Self::Array { .. } => None,
        }
    }

    /// Whether every dimension, including those of nested tuple elements, is static.
    pub fn is_static(&self) -> bool {
        match self {
            Self::Array { dims, .. } => dims.iter().all(Dim::is_static),
            Self::Tuple(elements) => elements.iter().all(Self::is_static),
        }
    }

    /// Concrete dimensions of a fully static array shape.
    pub fn to_static(&self) -> Option<SmallVec<[usize; 4]>> {
        self.dims()?.iter().map(Dim::as_static).collect()
    }

    /// Number of elements of a static array shape.
    pub fn element_count(&self) -> Option<usize> {
        self.to_static().map(|dims| dims.iter().product())
    }

    /// `pred[]`, the only shape a loop condition may produce.
    pub fn is_scalar_pred(&self) -> bool {
        matches!(self, Self::Array { dtype: DType::Bool, dims } if dims.is_empty())
    }

    /// Same dimensions with a different element type. Tuples are returned unchanged.
    pub fn with_dtype(&self, dtype: DType) -> Self {
        match self {
            Self::Array { dims, .. } => Self::Array { dtype, dims: dims.clone() },
            Self::Tuple(_) => self.clone(),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array { dtype, dims } => {
                write!(f, "{dtype}[")?;
                for (i, dim) in dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{dim}")?;
                }
                f.write_str("]")
            }
            Self::Tuple(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(")")
            }
        }
    }
}
