use std::error::Error;
use std::fmt;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::activation::sigmoid_matrix;
use crate::layer::fully_connected_forward;
use crate::linear_algebra::{Matrix, MatrixError, Shape, Value};
use crate::parameters::{LayerParameters, MatrixKind, ParameterError, Parameters};

/// One fully connected, sigmoid-activated layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    weights: Matrix,
    biases: Matrix,
}

impl Layer {
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    pub fn output_size(&self) -> usize {
        self.weights.rows()
    }

    pub fn forward(&self, inputs: &Matrix) -> Result<Matrix, MatrixError> {
        let weighted = fully_connected_forward(inputs, &self.weights, &self.biases)?;
        Ok(sigmoid_matrix(weighted))
    }
}

/// A feed-forward network of sigmoid layers.
///
/// A `Network` can only be obtained fully validated: every layer has a weight matrix and a
/// column of biases matching its output size, and each layer's input size matches the previous
/// layer's output size. It is never modified after construction, so a single instance can serve
/// [`predict`](Network::predict) calls from any number of threads.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(try_from = "Parameters", into = "Parameters")]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    pub fn from_parameters(parameters: Parameters) -> Result<Self, NetworkError> {
        if parameters.layers.is_empty() {
            return Err(ParameterError::NoLayers.into());
        }

        let mut layers: Vec<Layer> = Vec::with_capacity(parameters.layers.len());

        for (index, layer) in parameters.layers.into_iter().enumerate() {
            let weights = layer
                .weights
                .ok_or(ParameterError::MissingMatrix {
                    layer: index,
                    matrix: MatrixKind::Weights,
                })?
                .into_matrix(index, MatrixKind::Weights)?;

            let biases = layer
                .biases
                .ok_or(ParameterError::MissingMatrix {
                    layer: index,
                    matrix: MatrixKind::Biases,
                })?
                .into_matrix(index, MatrixKind::Biases)?;

            if let Some(previous) = layers.last() {
                if weights.cols() != previous.output_size() {
                    return Err(NetworkError::ShapeMismatch {
                        layer: index,
                        expected: (weights.rows(), previous.output_size()),
                        found: weights.shape(),
                    });
                }
            }

            if biases.shape() != (weights.rows(), 1) {
                return Err(NetworkError::ShapeMismatch {
                    layer: index,
                    expected: (weights.rows(), 1),
                    found: biases.shape(),
                });
            }

            layers.push(Layer { weights, biases });
        }

        let network = Self { layers };
        debug!(sizes = ?network.layer_sizes(), "Constructed network.");

        Ok(network)
    }

    /// Creates a network with the given layer sizes, the first being the input size.
    ///
    /// Weights are drawn from a normal distribution with a standard deviation of
    /// `1 / sqrt(inputs)`, and biases start at zero.
    pub fn random(layer_sizes: &[usize], rng: &mut impl Rng) -> Result<Self, NetworkError> {
        if layer_sizes.len() < 2 {
            return Err(ParameterError::NoLayers.into());
        }

        if let Some((position, &size)) = layer_sizes.iter().enumerate().find(|&(_, &s)| s == 0) {
            return Err(ParameterError::InvalidSize { position, size }.into());
        }

        let layers = layer_sizes
            .windows(2)
            .map(|pair| {
                let (inputs, outputs) = (pair[0], pair[1]);
                let scale = (inputs as Value).sqrt().recip();

                let weights = Matrix::zeros(outputs, inputs)
                    .map(|_| rng.sample::<Value, _>(StandardNormal))
                    * scale;

                Layer {
                    weights,
                    biases: Matrix::zeros(outputs, 1),
                }
            })
            .collect();

        let network = Self { layers };
        debug!(sizes = ?network.layer_sizes(), "Created random network.");

        Ok(network)
    }

    pub fn to_parameters(&self) -> Parameters {
        Parameters {
            layers: self
                .layers
                .iter()
                .map(|layer| LayerParameters {
                    weights: Some((&layer.weights).into()),
                    biases: Some((&layer.biases).into()),
                })
                .collect(),
        }
    }

    /// Runs the forward pass, returning the activation of the last layer.
    ///
    /// `input` must be a column with as many rows as the first layer has inputs.
    pub fn predict(&self, input: &Matrix) -> Result<Matrix, MatrixError> {
        let mut activation = input.clone();

        for (index, layer) in self.layers.iter().enumerate() {
            activation = layer.forward(&activation)?;
            trace!(layer = index, shape = ?activation.shape(), "Forward.");
        }

        Ok(activation)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, Layer::output_size)
    }

    /// The input size followed by each layer's output size.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_size())
            .chain(self.layers.iter().map(Layer::output_size))
            .collect()
    }
}

impl TryFrom<Parameters> for Network {
    type Error = NetworkError;

    fn try_from(parameters: Parameters) -> Result<Self, Self::Error> {
        Self::from_parameters(parameters)
    }
}

impl From<Network> for Parameters {
    fn from(network: Network) -> Self {
        network.to_parameters()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NetworkError {
    MalformedParameters(ParameterError),
    /// A layer's matrix doesn't fit the layers around it.
    ShapeMismatch {
        layer: usize,
        expected: Shape,
        found: Shape,
    },
}

impl From<ParameterError> for NetworkError {
    fn from(error: ParameterError) -> Self {
        Self::MalformedParameters(error)
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedParameters(error) => write!(f, "malformed parameters: {error}"),
            Self::ShapeMismatch {
                layer,
                expected,
                found,
            } => write!(
                f,
                "shape mismatch in layer {layer}: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
        }
    }
}

impl Error for NetworkError {}
