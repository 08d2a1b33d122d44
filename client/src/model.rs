use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Error as IoError, Write};
use std::path::Path;

use tracing::info;

use ann::Network;

/// Reads a parameter document from a JSON file and builds the network it describes.
pub fn load_network(path: &Path) -> Result<Network, ModelError> {
    let file = File::open(path).map_err(|error| ModelError::Io(path.display().to_string(), error))?;
    let network: Network = serde_json::from_reader(BufReader::new(file))
        .map_err(|error| ModelError::Parse(path.display().to_string(), error))?;

    info!(path = %path.display(), sizes = ?network.layer_sizes(), "Loaded model.");
    Ok(network)
}

pub fn save_network(network: &Network, path: &Path) -> Result<(), ModelError> {
    let io_error = |error| ModelError::Io(path.display().to_string(), error);

    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer_pretty(&mut writer, network)
        .map_err(|error| ModelError::Parse(path.display().to_string(), error))?;
    writer.flush().map_err(io_error)?;

    info!(path = %path.display(), "Saved model.");
    Ok(())
}

#[derive(Debug)]
pub enum ModelError {
    Io(String, IoError),
    /// The file isn't valid JSON, or doesn't describe a valid network.
    Parse(String, serde_json::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, error) => write!(f, "{path}: {error}"),
            Self::Parse(path, error) => write!(f, "{path}: {error}"),
        }
    }
}

impl Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::env;
    use std::fs;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use ann::Matrix;

    #[test]
    fn save_and_load() {
        let path = env::temp_dir().join(format!("digits-model-{}.json", std::process::id()));

        let mut rng = StdRng::seed_from_u64(5);
        let network = Network::random(&[5, 3, 2], &mut rng).unwrap();
        save_network(&network, &path).unwrap();

        let loaded = load_network(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.layer_sizes(), vec![5, 3, 2]);

        let input = Matrix::column(vec![0.1, 0.3, 0.5, 0.7, 0.9]);
        let expected = network.predict(&input).unwrap();
        let output = loaded.predict(&input).unwrap();
        for (x, y) in output.values().iter().zip(expected.values()) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn load_invalid() {
        let path = env::temp_dir().join(format!("digits-invalid-{}.json", std::process::id()));
        fs::write(&path, r#"{ "Layers": [] }"#).unwrap();

        let result = load_network(&path);
        fs::remove_file(&path).ok();

        match result {
            Err(ModelError::Parse(_, error)) => assert!(error.to_string().contains("no layers")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn load_missing() {
        let path = Path::new("/nonexistent/model.json");
        assert!(matches!(load_network(path), Err(ModelError::Io(..))));
    }
}
