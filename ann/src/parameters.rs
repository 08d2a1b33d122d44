//! The serialized form of a trained network.
//!
//! A parameter document lists the network's layers in order, each holding a weight matrix
//! (`WM`) and a bias matrix (`BM`):
//!
//! ```json
//! { "Layers": [ { "WM": { "Rows": 2, "Cols": 3, "values": [1, 2, 3, 4, 5, 6] },
//!                 "BM": { "Rows": 2, "Cols": 1, "values": [0, 0] } } ] }
//! ```
//!
//! These types only describe the document. Nothing here is validated until the parameters are
//! handed to [`Network::from_parameters`](crate::Network::from_parameters).

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::linear_algebra::{Matrix, Shape, Value};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Parameters {
    #[serde(rename = "Layers", default)]
    pub layers: Vec<LayerParameters>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LayerParameters {
    #[serde(rename = "WM", default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<MatrixParameters>,
    #[serde(rename = "BM", default, skip_serializing_if = "Option::is_none")]
    pub biases: Option<MatrixParameters>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatrixParameters {
    #[serde(rename = "Rows")]
    pub rows: usize,
    #[serde(rename = "Cols")]
    pub cols: usize,
    pub values: Vec<Value>,
}

impl MatrixParameters {
    pub(crate) fn into_matrix(
        self,
        layer: usize,
        matrix: MatrixKind,
    ) -> Result<Matrix, ParameterError> {
        let shape = (self.rows, self.cols);
        let count = self.values.len();

        Matrix::from_values(self.rows, self.cols, self.values).map_err(|_| {
            ParameterError::ValueCount {
                layer,
                matrix,
                shape,
                count,
            }
        })
    }
}

impl From<&Matrix> for MatrixParameters {
    fn from(matrix: &Matrix) -> Self {
        Self {
            rows: matrix.rows(),
            cols: matrix.cols(),
            values: matrix.values().to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatrixKind {
    Weights,
    Biases,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weights => f.write_str("weight matrix"),
            Self::Biases => f.write_str("bias matrix"),
        }
    }
}

/// Ways a parameter document can be malformed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParameterError {
    NoLayers,
    MissingMatrix {
        layer: usize,
        matrix: MatrixKind,
    },
    /// A matrix's declared shape doesn't match the number of values supplied for it.
    ValueCount {
        layer: usize,
        matrix: MatrixKind,
        shape: Shape,
        count: usize,
    },
    /// A layer size of zero, at the given position of a layer size list.
    InvalidSize {
        position: usize,
        size: usize,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLayers => f.write_str("no layers"),
            Self::MissingMatrix { layer, matrix } => {
                write!(f, "layer {layer} is missing its {matrix}")
            }
            Self::ValueCount {
                layer,
                matrix,
                shape,
                count,
            } => write!(
                f,
                "layer {layer} declares a {}x{} {matrix} but supplies {count} values",
                shape.0, shape.1
            ),
            Self::InvalidSize { position, size } => {
                write!(f, "invalid layer size at position {position}: {size}")
            }
        }
    }
}

impl Error for ParameterError {}
