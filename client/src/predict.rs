use std::process::ExitCode;

use tracing::error;

use ann::Matrix;
use mnist::{Dataset, Image};

use crate::args::PredictConfig;
use crate::evaluate::arg_max;
use crate::model::load_network;

pub fn run_predict(config: PredictConfig) -> ExitCode {
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

    let Some(image) = dataset.get(config.index) else {
        error!(index = config.index, count = dataset.len(), "Image index out of range.");
        return ExitCode::FAILURE;
    };

    match network.predict(&image.to_input()) {
        Ok(output) => {
            print!("{}", report(image, &output, config.show));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Model does not fit the image.");
            ExitCode::FAILURE
        }
    }
}

fn report(image: &Image, output: &Matrix, show: bool) -> String {
    let mut report = String::new();

    if show {
        report.push_str(&image.render());
    }

    report.push_str(&format!("Label: {}\n", image.label));
    match arg_max(output) {
        Some(prediction) => report.push_str(&format!("Prediction: {prediction}\n")),
        None => report.push_str("Prediction: none\n"),
    }

    for (class, value) in output.values().iter().enumerate() {
        report.push_str(&format!("  {class}: {value:.4}\n"));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lines() {
        let image = Image {
            label: 1,
            width: 2,
            height: 1,
            pixels: vec![0, 255],
        };
        let output: Matrix = [[0.25], [0.75]].into();

        assert_eq!(
            report(&image, &output, false),
            "Label: 1\nPrediction: 1\n  0: 0.2500\n  1: 0.7500\n"
        );
        assert_eq!(
            report(&image, &output, true),
            " @\nLabel: 1\nPrediction: 1\n  0: 0.2500\n  1: 0.7500\n"
        );
    }
}
