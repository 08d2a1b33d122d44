use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::idx::{read_images, read_labels, DatasetError};
use crate::image::Image;

/// Which half of the MNIST distribution to read.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Subset {
    Train,
    #[default]
    Test,
}

impl Subset {
    pub fn images_file(self) -> &'static str {
        match self {
            Self::Train => "train-images.idx3-ubyte",
            Self::Test => "t10k-images.idx3-ubyte",
        }
    }

    pub fn labels_file(self) -> &'static str {
        match self {
            Self::Train => "train-labels.idx1-ubyte",
            Self::Test => "t10k-labels.idx1-ubyte",
        }
    }
}

impl FromStr for Subset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Self::Train),
            "test" | "t10k" => Ok(Self::Test),
            unknown => Err(format!("unknown subset: {unknown} (expected train or test)")),
        }
    }
}

/// Where to find a dataset's files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DatasetConfig {
    pub directory: PathBuf,
    pub subset: Subset,
}

impl DatasetConfig {
    pub fn new(directory: impl Into<PathBuf>, subset: Subset) -> Self {
        Self {
            directory: directory.into(),
            subset,
        }
    }

    pub fn images_path(&self) -> PathBuf {
        self.directory.join(self.subset.images_file())
    }

    pub fn labels_path(&self) -> PathBuf {
        self.directory.join(self.subset.labels_file())
    }
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    images: Vec<Image>,
}

impl Dataset {
    pub fn load(config: &DatasetConfig) -> Result<Self, DatasetError> {
        let images_path = config.images_path();
        let labels_path = config.labels_path();

        info!(
            images = %images_path.display(),
            labels = %labels_path.display(),
            "Loading dataset."
        );

        let dataset = Self::from_readers(open(&images_path)?, open(&labels_path)?)?;
        info!(count = dataset.len(), "Loaded dataset.");

        Ok(dataset)
    }

    /// Reads an image file and its matching label file.
    pub fn from_readers(images: impl Read, labels: impl Read) -> Result<Self, DatasetError> {
        let raw = read_images(images)?;
        let labels = read_labels(labels)?;

        if raw.count != labels.len() {
            return Err(DatasetError::CountMismatch {
                images: raw.count,
                labels: labels.len(),
            });
        }

        debug!(
            count = raw.count,
            rows = raw.rows,
            cols = raw.cols,
            "Read image data."
        );

        let size = raw.rows * raw.cols;
        let images = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Image {
                label,
                width: raw.cols,
                height: raw.rows,
                pixels: raw.pixels[index * size..(index + 1) * size].to_vec(),
            })
            .collect();

        Ok(Self { images })
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn get(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn open(path: &Path) -> Result<BufReader<File>, DatasetError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|error| DatasetError::Io(format!("{}: {error}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::idx::tests::{image_file, label_file};

    #[test]
    fn from_readers() {
        let pixels: Vec<u8> = (0..8).collect();
        let images = image_file(2, 2, 2, &pixels);
        let labels = label_file(&[5, 9]);

        let dataset = Dataset::from_readers(images.as_slice(), labels.as_slice()).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = dataset.get(0).unwrap();
        assert_eq!(first.label, 5);
        assert_eq!((first.width, first.height), (2, 2));
        assert_eq!(first.pixels, vec![0, 1, 2, 3]);

        let second = dataset.get(1).unwrap();
        assert_eq!(second.label, 9);
        assert_eq!(second.pixel(1, 0), Some(6));

        assert!(dataset.get(2).is_none());
    }

    #[test]
    fn count_mismatch() {
        let images = image_file(2, 1, 1, &[0, 0]);
        let labels = label_file(&[1, 2, 3]);

        assert_eq!(
            Dataset::from_readers(images.as_slice(), labels.as_slice()).unwrap_err(),
            DatasetError::CountMismatch {
                images: 2,
                labels: 3
            }
        );
    }

    #[test]
    fn paths() {
        let config = DatasetConfig::new("data", Subset::Train);
        assert_eq!(
            config.images_path(),
            Path::new("data").join("train-images.idx3-ubyte")
        );
        assert_eq!(
            config.labels_path(),
            Path::new("data").join("train-labels.idx1-ubyte")
        );

        let config = DatasetConfig::new("data", Subset::Test);
        assert_eq!(
            config.images_path(),
            Path::new("data").join("t10k-images.idx3-ubyte")
        );
    }

    #[test]
    fn subset_from_str() {
        assert_eq!("train".parse::<Subset>(), Ok(Subset::Train));
        assert_eq!("test".parse::<Subset>(), Ok(Subset::Test));
        assert!("validation".parse::<Subset>().is_err());
    }

    #[test]
    fn load_missing_files() {
        let config = DatasetConfig::new("/nonexistent/mnist", Subset::Test);
        match Dataset::load(&config) {
            Err(DatasetError::Io(message)) => assert!(message.contains("t10k-images.idx3-ubyte")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
