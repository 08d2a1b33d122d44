use crate::linear_algebra::{Matrix, MatrixError, Value};

/// Computes `weights * inputs + biases`.
pub fn fully_connected_forward(
    inputs: &Matrix,
    weights: &Matrix,
    biases: &Matrix,
) -> Result<Matrix, MatrixError> {
    weights.multiply(inputs)?.add(biases)
}

pub fn activation_forward(inputs: Matrix, activation: impl Fn(Value) -> Value) -> Matrix {
    inputs.map(activation)
}
