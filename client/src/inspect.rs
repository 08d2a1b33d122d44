use std::process::ExitCode;

use tracing::error;

use ann::Network;

use crate::args::InspectConfig;
use crate::model::load_network;

pub fn run_inspect(config: InspectConfig) -> ExitCode {
    match load_network(&config.model) {
        Ok(network) => {
            print!("{}", describe(&network));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Could not load model.");
            ExitCode::FAILURE
        }
    }
}

fn describe(network: &Network) -> String {
    let sizes = network
        .layer_sizes()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");

    let mut output = format!("Layers: {}\nSizes: {sizes}\n", network.layer_count());
    let mut parameters = 0;

    for (index, layer) in network.layers().iter().enumerate() {
        let (weight_rows, weight_cols) = layer.weights().shape();
        let (bias_rows, bias_cols) = layer.biases().shape();
        parameters += weight_rows * weight_cols + bias_rows * bias_cols;

        output.push_str(&format!(
            "  {index}: weights {weight_rows}x{weight_cols}, biases {bias_rows}x{bias_cols}\n"
        ));
    }

    output.push_str(&format!("Parameters: {parameters}\n"));
    output
}
