pub use self::dataset::{Dataset, DatasetConfig, Subset};
pub use self::idx::{read_images, read_labels, DatasetError, RawImages};
pub use self::image::{normalize, Image};

mod dataset;
mod idx;
mod image;
