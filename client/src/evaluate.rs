use std::num::NonZeroUsize;
use std::panic;
use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use tracing::{debug, error, info};

use ann::{Matrix, MatrixError, Network, Value};
use mnist::{Dataset, Image};

use crate::args::EvaluateConfig;
use crate::model::load_network;

pub fn run_evaluate(config: EvaluateConfig) -> ExitCode {
    let network = match load_network(&config.model) {
        Ok(network) => network,
        Err(err) => {
            error!(error = %err, "Could not load model.");
            return ExitCode::FAILURE;
        }
    };

    let dataset = match Dataset::load(&config.dataset.config()) {
        Ok(dataset) => dataset,
        Err(err) => {
            error!(error = %err, "Could not load dataset.");
            return ExitCode::FAILURE;
        }
    };

    let images = match config.limit {
        Some(limit) => &dataset.images()[..limit.min(dataset.len())],
        None => dataset.images(),
    };

    let start_time = Instant::now();

    match count_correct(&network, images, config.threads) {
        Ok(correct) => {
            info!(
                images = images.len(),
                threads = config.threads,
                elapsed = ?start_time.elapsed(),
                "Evaluation finished."
            );
            println!(
                "Accuracy: {:.2}% ({correct}/{})",
                accuracy(correct, images.len()),
                images.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Model does not fit the dataset.");
            ExitCode::FAILURE
        }
    }
}

/// Counts the images whose label matches the network's strongest output, splitting the work
/// between `threads` threads, at most one per available core.
pub fn count_correct(
    network: &Network,
    images: &[Image],
    threads: usize,
) -> Result<usize, MatrixError> {
    let threads = threads.clamp(1, max_threads());
    let chunk_size = images.len().div_ceil(threads).max(1);

    thread::scope(|scope| {
        let workers: Vec<_> = images
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || count_correct_sequential(network, chunk)))
            .collect();

        debug!(workers = workers.len(), chunk_size, "Started evaluation.");

        workers
            .into_iter()
            .map(|worker| worker.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .sum()
    })
}

fn max_threads() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

fn count_correct_sequential(network: &Network, images: &[Image]) -> Result<usize, MatrixError> {
    let mut correct = 0;
    for image in images {
        let output = network.predict(&image.to_input())?;
        if arg_max(&output) == Some(image.label as usize) {
            correct += 1;
        }
    }
    Ok(correct)
}

/// The row of the largest output. Ties go to the earlier row.
pub fn arg_max(output: &Matrix) -> Option<usize> {
    output
        .values()
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, Value)>, (index, &value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((index, value)),
        })
        .map(|(index, _)| index)
}

pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * correct as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ann::{LayerParameters, MatrixParameters, Parameters};

    /// Outputs class 0 for images brighter on top, class 1 for images brighter on the bottom.
    fn top_bottom_network() -> Network {
        Network::from_parameters(Parameters {
            layers: vec![LayerParameters {
                weights: Some(MatrixParameters {
                    rows: 2,
                    cols: 4,
                    values: vec![10.0, 10.0, -10.0, -10.0, -10.0, -10.0, 10.0, 10.0],
                }),
                biases: Some(MatrixParameters {
                    rows: 2,
                    cols: 1,
                    values: vec![0.0, 0.0],
                }),
            }],
        })
        .unwrap()
    }

    fn image(label: u8, top: bool) -> Image {
        let pixels = if top {
            vec![255, 255, 0, 0]
        } else {
            vec![0, 0, 255, 255]
        };
        Image {
            label,
            width: 2,
            height: 2,
            pixels,
        }
    }

    fn images() -> Vec<Image> {
        vec![
            image(0, true),
            image(1, false),
            image(0, true),
            image(1, false),
            image(1, true),
            image(1, false),
            image(0, true),
        ]
    }

    #[test]
    fn arg_max_picks_largest() {
        assert_eq!(arg_max(&[[0.1], [0.7], [0.2]].into()), Some(1));
        assert_eq!(arg_max(&[[0.5], [0.5]].into()), Some(0));
        assert_eq!(arg_max(&Matrix::zeros(0, 1)), None);
    }

    #[test]
    fn counts_correct() {
        let network = top_bottom_network();
        assert_eq!(count_correct(&network, &images(), 1), Ok(6));
    }

    #[test]
    fn threads_agree() {
        let network = top_bottom_network();
        let images = images();
        for threads in [0, 1, 2, 3, 7, 16] {
            assert_eq!(count_correct(&network, &images, threads), Ok(6));
        }
        assert_eq!(count_correct(&network, &[], 4), Ok(0));
    }

    #[test]
    fn excessive_threads() {
        let network = top_bottom_network();
        assert_eq!(count_correct(&network, &images(), usize::MAX), Ok(6));
        assert!(max_threads() >= 1);
    }

    #[test]
    fn wrong_image_size() {
        let network = top_bottom_network();
        let images = vec![Image {
            label: 0,
            width: 3,
            height: 3,
            pixels: vec![0; 9],
        }];
        assert!(count_correct(&network, &images, 2).is_err());
    }

    #[test]
    fn accuracy_percent() {
        assert_eq!(accuracy(3, 4), 75.0);
        assert_eq!(accuracy(0, 0), 0.0);
    }
}
