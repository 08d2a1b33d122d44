use std::process::ExitCode;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use ann::Network;

use crate::args::RandomConfig;
use crate::model::save_network;

pub fn run_random(config: RandomConfig) -> ExitCode {
    let mut rng = config
        .seed
        .map(StdRng::seed_from_u64)
        .unwrap_or_else(StdRng::from_entropy);

    let network = match Network::random(&config.layers, &mut rng) {
        Ok(network) => network,
        Err(err) => {
            error!(error = %err, "Could not create model.");
            return ExitCode::FAILURE;
        }
    };

    info!(sizes = ?network.layer_sizes(), seed = ?config.seed, "Created model.");

    match save_network(&network, &config.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Could not save model.");
            ExitCode::FAILURE
        }
    }
}
