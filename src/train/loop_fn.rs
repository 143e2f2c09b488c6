use std::time::Instant;

use log::{debug, info};

use crate::error::{NetError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, TrainEvent, TrainingSummary};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of strict online gradient
/// descent: samples are visited in order, one `backpropagate` each, with no
/// shuffling or batching.
///
/// # Arguments
/// - `network`  — mutable reference to the network; modified in place
/// - `inputs`   — training samples, each a `Vec<f64>` of length `input_size`
/// - `expected` — corresponding targets, each of length `output_size`
/// - `config`   — epoch count and optional progress channel
///
/// # Errors
/// `NetError::InvalidDataSize` if the two lists differ in length or any
/// sample has the wrong width. All of this is checked before the first
/// update, so a rejected dataset leaves the network untouched.
pub fn train_loop(
    network: &mut Network,
    inputs: &[Vec<f64>],
    expected: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<TrainingSummary> {
    validate(network, inputs, expected)?;

    info!("Began training for {} epochs...", config.epochs);

    let start = Instant::now();
    let mut final_cost = None;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let avg_cost = run_one_epoch(network, inputs, expected)?;
        final_cost = Some(avg_cost);

        let elapsed_ms = t_start.elapsed().as_millis() as u64;
        debug!(
            "  + Completed epoch {} of {} in {}ms with an average cost of {:.5}",
            epoch, config.epochs, elapsed_ms, avg_cost
        );

        emit(config, TrainEvent::Epoch(EpochStats {
            epoch,
            total_epochs: config.epochs,
            avg_cost,
            elapsed_ms,
        }));
    }

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let avg_epoch_ms = if config.epochs == 0 { 0 } else { elapsed_ms / config.epochs as u64 };

    info!(
        "Trained for {} epochs in {}ms with an average of {}ms per epoch.",
        config.epochs, elapsed_ms, avg_epoch_ms
    );

    let summary = TrainingSummary {
        epochs: config.epochs,
        elapsed_ms,
        avg_epoch_ms,
        final_cost,
    };
    emit(config, TrainEvent::Finished(summary.clone()));

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn validate(network: &Network, inputs: &[Vec<f64>], expected: &[Vec<f64>]) -> Result<()> {
    if inputs.len() != expected.len() {
        return Err(NetError::InvalidDataSize {
            expected: inputs.len(),
            actual: expected.len(),
        });
    }

    let widths = inputs.iter()
        .map(|x| (network.input_size(), x.len()))
        .chain(expected.iter().map(|y| (network.output_size(), y.len())));
    for (want, got) in widths {
        if want != got {
            return Err(NetError::InvalidDataSize { expected: want, actual: got });
        }
    }

    Ok(())
}

/// One pass over the data. Returns the mean total squared error, each sample
/// measured on the network right after its own update. Empty data costs 0.
fn run_one_epoch(network: &mut Network, inputs: &[Vec<f64>], expected: &[Vec<f64>]) -> Result<f64> {
    if inputs.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for (input, target) in inputs.iter().zip(expected.iter()) {
        network.backpropagate(input, target)?;
        total += MseLoss::total(&network.forward(input)?, target)?;
    }

    Ok(total / inputs.len() as f64)
}

/// Receivers are optional observers; a hung-up channel is not an error.
fn emit(config: &TrainConfig, event: TrainEvent) {
    if let Some(ref tx) = config.progress_tx {
        let _ = tx.send(event);
    }
}
