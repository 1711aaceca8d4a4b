//! Element-wise operations: arithmetic, logical, comparison, select.
//!
//! Binary operands must have identical shapes; there is no implicit
//! broadcasting or type promotion. Use [`Value::broadcast`] and
//! [`Value::convert`] to line operands up.

use fori_dtype::DType;
use snafu::ensure;

use crate::builder::Value;
use crate::error::{
    DTypeMismatchSnafu, ExpectedArraySnafu, InvalidDTypeForBinaryOpSnafu, InvalidDTypeForUnaryOpSnafu, Result,
    SelectPredicateNotBoolSnafu, ShapeMismatchSnafu,
};
use crate::op::Op;
use crate::shape::Shape;
use crate::types::{BinaryOp, ComparisonDirection, UnaryOp};

macro_rules! binary_ops {
    ($($method:ident => $op:ident),+ $(,)?) => {
        $(
            pub fn $method(&self, rhs: &Value) -> Result<Value> {
                self.binary(BinaryOp::$op, rhs)
            }
        )+
    };
}

macro_rules! unary_ops {
    ($($method:ident => $op:ident),+ $(,)?) => {
        $(
            pub fn $method(&self) -> Result<Value> {
                self.unary(UnaryOp::$op)
            }
        )+
    };
}

macro_rules! cmp_ops {
    ($($method:ident => $dir:ident),+ $(,)?) => {
        $(
            pub fn $method(&self, rhs: &Value) -> Result<Value> {
                self.compare(ComparisonDirection::$dir, rhs)
            }
        )+
    };
}

impl Value {
    binary_ops! {
        add => Add,
        sub => Sub,
        mul => Mul,
        div => Div,
        rem => Rem,
        max => Max,
        min => Min,
        and => And,
        or => Or,
    }

    unary_ops! {
        neg => Neg,
        not => Not,
        abs => Abs,
    }

    cmp_ops! {
        eq => Eq,
        ne => Ne,
        lt => Lt,
        le => Le,
        gt => Gt,
        ge => Ge,
    }

    pub fn binary(&self, op: BinaryOp, rhs: &Value) -> Result<Value> {
        let dtype = self.same_array_shape(rhs, "binary")?;
        let valid = if op.is_logical() {
            dtype == DType::Bool || dtype.is_int()
        } else {
            matches!(op, BinaryOp::Max | BinaryOp::Min) || dtype != DType::Bool
        };
        ensure!(valid, InvalidDTypeForBinaryOpSnafu { operation: op, dtype });
        self.emit(&[self, rhs], Op::Binary(op, self.id, rhs.id), self.shape.clone())
    }

    pub fn unary(&self, op: UnaryOp) -> Result<Value> {
        let dtype = self.array_dtype("unary")?;
        let valid = match op {
            UnaryOp::Not => dtype == DType::Bool || dtype.is_int(),
            UnaryOp::Neg | UnaryOp::Abs => dtype != DType::Bool,
        };
        ensure!(valid, InvalidDTypeForUnaryOpSnafu { operation: op, dtype });
        self.emit(&[self], Op::Unary(op, self.id), self.shape.clone())
    }

    /// Element-wise comparison producing `pred` of the operand dimensions.
    pub fn compare(&self, direction: ComparisonDirection, rhs: &Value) -> Result<Value> {
        self.same_array_shape(rhs, "compare")?;
        let shape = self.shape.with_dtype(DType::Bool);
        self.emit(&[self, rhs], Op::Compare(direction, self.id, rhs.id), shape)
    }

    /// `pred ? on_true : on_false`, element-wise or with a scalar predicate.
    pub fn select(&self, on_true: &Value, on_false: &Value) -> Result<Value> {
        let pred_ok = matches!(self.shape.dtype(), Some(DType::Bool))
            && (self.shape.rank() == Some(0) || self.shape.dims() == on_true.shape.dims());
        ensure!(pred_ok, SelectPredicateNotBoolSnafu { actual: self.shape.clone() });
        on_true.same_array_shape(on_false, "select")?;
        let op = Op::Select { pred: self.id, on_true: on_true.id, on_false: on_false.id };
        self.emit(&[self, on_true, on_false], op, on_true.shape.clone())
    }

    /// Element type of an array value.
    pub(crate) fn array_dtype(&self, op: &'static str) -> Result<DType> {
        match &self.shape {
            Shape::Array { dtype, .. } => Ok(*dtype),
            Shape::Tuple(_) => ExpectedArraySnafu { op, actual: self.shape.clone() }.fail(),
        }
    }

    /// Both operands are arrays with identical dtype and dimensions; returns the dtype.
    fn same_array_shape(&self, rhs: &Value, op: &'static str) -> Result<DType> {
        let lhs_dtype = self.array_dtype(op)?;
        let rhs_dtype = rhs.array_dtype(op)?;
        ensure!(lhs_dtype == rhs_dtype, DTypeMismatchSnafu { op, lhs: lhs_dtype, rhs: rhs_dtype });
        ensure!(
            self.shape == rhs.shape,
            ShapeMismatchSnafu { op, lhs: self.shape.clone(), rhs: rhs.shape.clone() }
        );
        Ok(lhs_dtype)
    }
}
