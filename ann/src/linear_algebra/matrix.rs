use std::error::Error;
use std::fmt;
use std::ops::{Div, DivAssign, Mul, MulAssign};

use super::{Value, ValueType};

/// A `(rows, columns)` pair.
pub type Shape = (usize, usize);

/// A dense matrix, stored in row-major order.
///
/// The element at row `i`, column `j` lives at index `i * cols + j` of the value buffer, and
/// the buffer always holds exactly `rows * cols` values.
#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    values: Vec<Value>,
}

impl Matrix {
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        let len = rows
            .checked_mul(cols)
            .expect("matrix element count overflows usize");

        Self {
            rows,
            cols,
            values: vec![Value::ZERO; len],
        }
    }

    /// Wraps a row-major value buffer. Fails if the buffer doesn't hold exactly `rows * cols`
    /// values.
    pub fn from_values(rows: usize, cols: usize, values: Vec<Value>) -> Result<Self, MatrixError> {
        if rows.checked_mul(cols) != Some(values.len()) {
            return Err(ShapeMismatch::Values {
                shape: (rows, cols),
                count: values.len(),
            }
            .into());
        }

        Ok(Self { rows, cols, values })
    }

    /// Creates an `n x 1` column vector.
    pub fn column(values: Vec<Value>) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            values,
        }
    }

    pub fn identity(size: usize) -> Self {
        let mut result = Self::zeros(size, size);
        for i in 0..size {
            result.values[i * size + i] = Value::ONE;
        }
        result
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> Shape {
        (self.rows, self.cols)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Value, MatrixError> {
        let index = self.index(row, col)?;
        Ok(self.values[index])
    }

    pub fn set(&mut self, row: usize, col: usize, value: Value) -> Result<(), MatrixError> {
        let index = self.index(row, col)?;
        self.values[index] = value;
        Ok(())
    }

    /// The matrix product `self * rhs`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.cols != rhs.rows {
            return Err(ShapeMismatch::Multiply {
                left: self.shape(),
                right: rhs.shape(),
            }
            .into());
        }

        let mut result = Matrix::zeros(self.rows, rhs.cols);
        for row in 0..self.rows {
            for column in 0..rhs.cols {
                result.values[row * rhs.cols + column] = (0..self.cols)
                    .map(|k| self.values[row * self.cols + k] * rhs.values[k * rhs.cols + column])
                    .sum();
            }
        }
        Ok(result)
    }

    /// The elementwise sum `self + rhs`. Both operands must have the same shape.
    pub fn add(&self, rhs: &Matrix) -> Result<Matrix, MatrixError> {
        if self.shape() != rhs.shape() {
            return Err(ShapeMismatch::Add {
                left: self.shape(),
                right: rhs.shape(),
            }
            .into());
        }

        let values = self
            .values
            .iter()
            .zip(&rhs.values)
            .map(|(a, b)| a + b)
            .collect();

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            values,
        })
    }

    /// Applies `f` to every value, reusing this matrix's buffer.
    pub fn map(mut self, mut f: impl FnMut(Value) -> Value) -> Matrix {
        self.values.iter_mut().for_each(|x| *x = f(*x));
        self
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, MatrixError> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(MatrixError::IndexOutOfRange {
                row,
                col,
                shape: self.shape(),
            })
        }
    }
}

macro_rules! value_op_impl {
    ($op:ident, $op_method:ident, $op_assign:ident, $op_assign_method:ident) => {
        impl $op<Value> for Matrix {
            type Output = Matrix;

            fn $op_method(mut self, rhs: Value) -> Self::Output {
                self.$op_assign_method(rhs);
                self
            }
        }

        impl $op<Value> for &Matrix {
            type Output = Matrix;

            fn $op_method(self, rhs: Value) -> Self::Output {
                self.clone().$op_method(rhs)
            }
        }

        impl $op_assign<Value> for Matrix {
            fn $op_assign_method(&mut self, rhs: Value) {
                for x in self.values.iter_mut() {
                    (*x).$op_assign_method(rhs)
                }
            }
        }
    };
}

value_op_impl!(Mul, mul, MulAssign, mul_assign);
value_op_impl!(Div, div, DivAssign, div_assign);

impl<const R: usize, const C: usize> From<[[Value; C]; R]> for Matrix {
    fn from(values: [[Value; C]; R]) -> Self {
        Self {
            rows: R,
            cols: C,
            values: values.iter().flatten().copied().collect(),
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for row in 0..self.rows {
            if row > 0 {
                write!(f, "\n ")?;
            }
            for column in 0..self.cols {
                if column > 0 {
                    write!(f, " ")?;
                }
                fmt::Debug::fmt(&self.values[row * self.cols + column], f)?;
            }
        }
        write!(f, "]")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapeMismatch {
    /// A value buffer doesn't hold `rows * cols` values.
    Values { shape: Shape, count: usize },
    Multiply { left: Shape, right: Shape },
    Add { left: Shape, right: Shape },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatrixError {
    ShapeMismatch(ShapeMismatch),
    IndexOutOfRange { row: usize, col: usize, shape: Shape },
}

impl From<ShapeMismatch> for MatrixError {
    fn from(error: ShapeMismatch) -> Self {
        Self::ShapeMismatch(error)
    }
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values { shape, count } => {
                write!(f, "{}x{} matrix cannot hold {count} values", shape.0, shape.1)
            }
            Self::Multiply { left, right } => write!(
                f,
                "cannot multiply {}x{} by {}x{}",
                left.0, left.1, right.0, right.1
            ),
            Self::Add { left, right } => write!(
                f,
                "cannot add {}x{} and {}x{}",
                left.0, left.1, right.0, right.1
            ),
        }
    }
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch(error) => write!(f, "shape mismatch: {error}"),
            Self::IndexOutOfRange { row, col, shape } => write!(
                f,
                "index [{row}, {col}] is out of range for a {}x{} matrix",
                shape.0, shape.1
            ),
        }
    }
}

impl Error for MatrixError {}
