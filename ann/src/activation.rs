use crate::layer::activation_forward;
use crate::linear_algebra::{Matrix, Value, ValueType};

/// The logistic function `1 / (1 + e^-x)`.
///
/// Negative inputs are evaluated as `e^x / (1 + e^x)` so that `e^-x` is never computed for
/// large negative `x`.
pub fn sigmoid(x: Value) -> Value {
    if x >= Value::ZERO {
        Value::ONE / (Value::ONE + (-x).exp())
    } else {
        let e = x.exp();
        e / (Value::ONE + e)
    }
}

/// Applies [`sigmoid`] to every value of `m`.
pub fn sigmoid_matrix(m: Matrix) -> Matrix {
    activation_forward(m, sigmoid)
}
