use std::ops::Deref;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args as ArgsTrait, Parser, Subcommand};

use mnist::{DatasetConfig, Subset};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Measures a model's accuracy over a dataset.
    Evaluate(EvaluateConfig),
    /// Classifies a single image from a dataset.
    Predict(PredictConfig),
    /// Prints the layer structure of a model.
    Inspect(InspectConfig),
    /// Writes a model with randomly initialized weights.
    Random(RandomConfig),
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct DatasetArgs {
    /// The directory holding the MNIST IDX files.
    #[arg(short, long, default_value = "MNIST_Dataset", verbatim_doc_comment)]
    pub data: PathBuf,

    /// Which part of the dataset to read. (train or test)
    #[arg(short, long, default_value = "test", verbatim_doc_comment)]
    pub subset: Subset,
}

impl DatasetArgs {
    pub fn config(&self) -> DatasetConfig {
        DatasetConfig::new(&self.data, self.subset)
    }
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct EvaluateConfig {
    /// A model file in JSON format.
    #[arg(short, long)]
    pub model: PathBuf,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Only evaluate the first N images.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// The number of threads to split the images between. Capped at the number of cores.
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct PredictConfig {
    /// A model file in JSON format.
    #[arg(short, long)]
    pub model: PathBuf,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// The position of the image in the dataset.
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Also draw the image.
    #[arg(long)]
    pub show: bool,
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct InspectConfig {
    /// A model file in JSON format.
    #[arg(short, long)]
    pub model: PathBuf,
}

#[derive(ArgsTrait, Clone, Debug)]
pub struct RandomConfig {
    /// Layer sizes, starting with the input size.
    ///
    /// Sizes are separated by commas or spaces, e.g. "784,16,16,10".
    #[arg(long, default_value = "784,16,16,10", verbatim_doc_comment)]
    pub layers: LayerSizes,

    /// The file to write the model to.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Seed for the weight initialization. Random if not given.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LayerSizes(Vec<usize>);

impl Deref for LayerSizes {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for LayerSizes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sizes = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|field| !field.is_empty())
            .map(|field| {
                field
                    .parse::<usize>()
                    .map_err(|_| format!("invalid layer size: {field}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if sizes.len() < 2 {
            return Err("need an input size and at least one layer size".to_owned());
        }

        Ok(Self(sizes))
    }
}
