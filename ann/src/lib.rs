pub use self::linear_algebra::{Matrix, MatrixError, Shape, ShapeMismatch, Value};
pub use self::network::{Layer, Network, NetworkError};
pub use self::parameters::{LayerParameters, MatrixKind, MatrixParameters, ParameterError, Parameters};

pub mod activation;
pub mod layer;
pub mod linear_algebra;
pub mod parameters;

mod network;
