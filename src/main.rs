// Demo: trains a 2-4-1 network on XOR, saves it, reloads it and prints the
// reloaded network's answers. All network logic lives in the library.
//
//   RUST_LOG=info cargo run -- [model path, default xor.nn]
use sigmanet::{Network, Result};

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "xor.nn".to_string());

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![
        vec![1.0],
        vec![0.0],
        vec![1.0],
        vec![0.0],
    ];

    let mut network = Network::random(2, 1, &[4], 0.5, &mut rand::thread_rng())?;
    let summary = network.train(&inputs, &expected_outputs, 10000)?;
    println!("Final average cost: {:.6}", summary.final_cost.unwrap_or_default());

    network.save(&path)?;
    let reloaded = Network::load(&path)?;

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, reloaded.forward(input)?[0]);
    }
    Ok(())
}
