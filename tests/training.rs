use std::sync::mpsc;

use rand::{rngs::StdRng, SeedableRng};
use sigmanet::{MseLoss, NetError, Network, TrainConfig, TrainEvent};

fn xor() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    (
        vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]],
        vec![vec![1.0], vec![0.0], vec![1.0], vec![0.0]],
    )
}

#[test]
fn single_example_epoch_from_zero_lowers_cost() {
    let mut net = Network::zeroed(2, 1, &[2], 0.1).unwrap();
    let input = vec![vec![1.0, 0.0]];
    let expected = vec![vec![1.0]];

    // Every neuron starts at σ(0) = 0.5.
    let before = MseLoss::total(&net.forward(&input[0]).unwrap(), &expected[0]).unwrap();
    assert_eq!(before, 0.25);

    let summary = net.train(&input, &expected, 1).unwrap();

    for layer in net.layers() {
        assert!(layer.biases.as_slice().iter().all(|&b| b != 0.0));
        assert!(layer.weights.as_slice().iter().any(|&w| w != 0.0));
    }

    let after = summary.final_cost.unwrap();
    assert!(after < before, "{after} >= {before}");
    assert_eq!(after, MseLoss::total(&net.forward(&input[0]).unwrap(), &expected[0]).unwrap());
}

#[test]
fn xor_converges() {
    let (inputs, expected) = xor();

    // A couple of seeds guards against an unlucky start in a local minimum.
    let best = (1..=4u64)
        .map(|seed| {
            let mut net = Network::random(2, 1, &[4], 0.5, &mut StdRng::seed_from_u64(seed)).unwrap();
            net.train(&inputs, &expected, 10000).unwrap().final_cost.unwrap()
        })
        .fold(f64::INFINITY, f64::min);

    assert!(best < 0.05, "best average cost {best}");
}

#[test]
fn linearly_separable_data_converges_without_hidden_layers() {
    let inputs = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
    let expected = vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]];
    let mut net = Network::zeroed(2, 1, &[], 1.0).unwrap();

    let first = net.train(&inputs, &expected, 1).unwrap().final_cost.unwrap();
    let last = net.train(&inputs, &expected, 2000).unwrap().final_cost.unwrap();

    assert!(last < first);
    assert!(last < 0.05, "average cost {last}");
}

#[test]
fn training_is_deterministic() {
    let (inputs, expected) = xor();
    let start = Network::random(2, 1, &[3], 0.3, &mut StdRng::seed_from_u64(21)).unwrap();

    let mut a = start.clone();
    let mut b = start.clone();
    a.train(&inputs, &expected, 50).unwrap();
    b.train(&inputs, &expected, 50).unwrap();

    assert_eq!(a, b);
}

#[test]
fn mismatched_lists_are_rejected_before_any_update() {
    let mut net = Network::random(2, 1, &[2], 0.1, &mut StdRng::seed_from_u64(1)).unwrap();
    let before = net.clone();

    let err = net.train(&[vec![1.0, 0.0], vec![0.0, 1.0]], &[vec![1.0]], 5);
    assert!(matches!(err, Err(NetError::InvalidDataSize { .. })));
    assert_eq!(net, before);
}

#[test]
fn bad_sample_width_is_rejected_before_any_update() {
    let mut net = Network::random(2, 1, &[2], 0.1, &mut StdRng::seed_from_u64(1)).unwrap();
    let before = net.clone();

    // The bad sample is last, so a lazy check would already have updated the layers.
    let inputs = vec![vec![1.0, 0.0], vec![0.0, 1.0, 1.0]];
    let expected = vec![vec![1.0], vec![0.0]];

    assert!(matches!(
        net.train(&inputs, &expected, 1),
        Err(NetError::InvalidDataSize { expected: 2, actual: 3 })
    ));
    assert_eq!(net, before);
}

#[test]
fn zero_epochs_leave_network_untouched() {
    let (inputs, expected) = xor();
    let mut net = Network::random(2, 1, &[2], 0.1, &mut StdRng::seed_from_u64(2)).unwrap();
    let before = net.clone();

    let summary = net.train(&inputs, &expected, 0).unwrap();

    assert_eq!(summary.epochs, 0);
    assert_eq!(summary.avg_epoch_ms, 0);
    assert_eq!(summary.final_cost, None);
    assert_eq!(net, before);
}

#[test]
fn progress_events_are_emitted_per_epoch() {
    let (inputs, expected) = xor();
    let mut net = Network::random(2, 1, &[2], 0.1, &mut StdRng::seed_from_u64(3)).unwrap();
    let (tx, rx) = mpsc::channel();

    let summary = net
        .train_with(&inputs, &expected, &TrainConfig::new(3).with_progress(tx))
        .unwrap();
    let events: Vec<TrainEvent> = rx.try_iter().collect();

    assert_eq!(events.len(), 4);
    for (k, event) in events[..3].iter().enumerate() {
        match event {
            TrainEvent::Epoch(stats) => {
                assert_eq!(stats.epoch, k + 1);
                assert_eq!(stats.total_epochs, 3);
                assert!(stats.avg_cost >= 0.0);
            }
            other => panic!("expected epoch event, got {other:?}"),
        }
    }
    assert_eq!(events[3], TrainEvent::Finished(summary));
}

#[test]
fn dropped_receiver_does_not_stop_training() {
    let (inputs, expected) = xor();
    let mut net = Network::random(2, 1, &[2], 0.1, &mut StdRng::seed_from_u64(4)).unwrap();
    let (tx, rx) = mpsc::channel();
    drop(rx);

    let summary = net
        .train_with(&inputs, &expected, &TrainConfig::new(5).with_progress(tx))
        .unwrap();

    assert_eq!(summary.epochs, 5);
    assert!(summary.final_cost.is_some());
}

#[test]
fn empty_dataset_trains_to_zero_cost() {
    let mut net = Network::zeroed(2, 1, &[2], 0.1).unwrap();
    let summary = net.train(&[], &[], 2).unwrap();
    assert_eq!(summary.final_cost, Some(0.0));
    assert_eq!(net, Network::zeroed(2, 1, &[2], 0.1).unwrap());
}
