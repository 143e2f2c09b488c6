use rand::Rng;

use crate::{
    activation::sigmoid::{sigmoid, sigmoid_derivative},
    error::{NetError, Result},
    layers::dense::Layer,
    math::matrix::Matrix,
    network::options::NetworkOptions,
    optim::sgd::Sgd,
    train::{epoch_stats::TrainingSummary, loop_fn::train_loop, train_config::TrainConfig},
};

/// Fully-connected sigmoid network.
///
/// Layer `i` maps the previous layer's activation (or the network input for
/// `i == 0`) to `hidden_sizes[i]` neurons; the last layer maps to `output_size`.
/// `Clone` produces a deep copy: no matrix storage is shared between instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    input_size: usize,
    output_size: usize,
    hidden_sizes: Vec<usize>,
    pub(crate) layers: Vec<Layer>,
    learning_rate: f64,
}

impl Network {
    /// Builds a network with every weight and bias set to zero.
    pub fn zeroed(
        input_size: usize,
        output_size: usize,
        hidden_sizes: &[usize],
        learning_rate: f64,
    ) -> Result<Network> {
        Network::build(input_size, output_size, hidden_sizes, learning_rate, Layer::zeros)
    }

    /// Builds a network whose weights and biases are uniform in `[-1, 1)`,
    /// drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        hidden_sizes: &[usize],
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Network> {
        Network::build(input_size, output_size, hidden_sizes, learning_rate, |size, input| {
            Layer::random(size, input, rng)
        })
    }

    fn build<F>(
        input_size: usize,
        output_size: usize,
        hidden_sizes: &[usize],
        learning_rate: f64,
        mut make_layer: F,
    ) -> Result<Network>
    where
        F: FnMut(usize, usize) -> Layer,
    {
        let layers = Network::layer_shapes(input_size, output_size, hidden_sizes)?
            .into_iter()
            .map(|(size, fan_in)| make_layer(size, fan_in))
            .collect();

        Ok(Network {
            input_size,
            output_size,
            hidden_sizes: hidden_sizes.to_vec(),
            layers,
            learning_rate,
        })
    }

    /// `(size, input_size)` of every layer, checked for zero sizes and for
    /// weight matrices too large to address.
    pub(crate) fn layer_shapes(
        input_size: usize,
        output_size: usize,
        hidden_sizes: &[usize],
    ) -> Result<Vec<(usize, usize)>> {
        if input_size == 0 || output_size == 0 {
            return Err(NetError::InvalidTopology(format!(
                "input and output sizes must be positive, got {input_size} and {output_size}"
            )));
        }
        if let Some(i) = hidden_sizes.iter().position(|&h| h == 0) {
            return Err(NetError::InvalidTopology(format!("hidden layer {i} has zero neurons")));
        }

        let mut fan_in = input_size;
        hidden_sizes.iter()
            .copied()
            .chain(std::iter::once(output_size))
            .map(|size| {
                if size.checked_mul(fan_in).and_then(|n| n.checked_mul(8)).is_none() {
                    return Err(NetError::InvalidTopology(format!(
                        "{size}x{fan_in} weight matrix is too large"
                    )));
                }
                let shape = (size, fan_in);
                fan_in = size;
                Ok(shape)
            })
            .collect()
    }

    /// Assembles a network from layers already shaped by `layer_shapes`.
    pub(crate) fn from_layers(
        input_size: usize,
        output_size: usize,
        hidden_sizes: Vec<usize>,
        layers: Vec<Layer>,
        learning_rate: f64,
    ) -> Network {
        Network {
            input_size,
            output_size,
            hidden_sizes,
            layers,
            learning_rate,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn hidden_sizes(&self) -> &[usize] {
        &self.hidden_sizes
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Topology record as written to `meta.json`.
    pub fn options(&self) -> NetworkOptions {
        NetworkOptions {
            input_size: self.input_size,
            output_size: self.output_size,
            hidden_sizes: self.hidden_sizes.clone(),
            learning_rate: self.learning_rate,
            weight_paths: (0..self.layers.len()).map(NetworkOptions::weight_path).collect(),
            bias_paths: (0..self.layers.len()).map(NetworkOptions::bias_path).collect(),
        }
    }

    /// Evaluates `input` through every layer: `a_i = σ(W_i · a_{i-1} + b_i)`.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len(self.input_size, input)?;

        let mut activation = Matrix::column(input.to_vec());
        for layer in &self.layers {
            activation = layer.pre_activation(&activation)?.apply(|_, _, z| sigmoid(z));
        }

        Ok(activation.into_vec())
    }

    /// Runs one gradient step on a single (input, expected) pair, mutating the
    /// layers in place.
    ///
    /// The output error is `expected - actual`. Walking from the last layer to
    /// the first, the error is back-projected through the (already updated)
    /// weights of the layer above before being used, then `Sgd::step` applies
    /// the update with `grad_term = error ⊙ σ'(z_i)`.
    pub fn backpropagate(&mut self, input: &[f64], expected: &[f64]) -> Result<()> {
        check_len(self.input_size, input)?;
        check_len(self.output_size, expected)?;

        let input = Matrix::column(input.to_vec());
        let expected = Matrix::column(expected.to_vec());

        let mut zs = Vec::with_capacity(self.layers.len());
        let mut activations: Vec<Matrix> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let prev = activations.last().unwrap_or(&input);
            let z = layer.pre_activation(prev)?;
            activations.push(z.apply(|_, _, v| sigmoid(v)));
            zs.push(z);
        }

        let last = self.layers.len() - 1;
        let mut error = expected.sub(&activations[last])?;
        let sgd = Sgd::new(self.learning_rate);

        for i in (0..=last).rev() {
            if i != last {
                error = self.layers[i + 1].weights.transpose().matmul(&error)?;
            }

            let grad_term = error.hadamard(&zs[i].apply(|_, _, v| sigmoid_derivative(v)))?;
            let layer_input = if i == 0 { &input } else { &activations[i - 1] };

            sgd.step(&mut self.layers[i], &grad_term, layer_input)?;
        }

        Ok(())
    }

    /// Online gradient descent over the examples, in order, for `epochs`
    /// passes. Progress is logged through `log`.
    pub fn train(
        &mut self,
        inputs: &[Vec<f64>],
        expected: &[Vec<f64>],
        epochs: usize,
    ) -> Result<TrainingSummary> {
        train_loop(self, inputs, expected, &TrainConfig::new(epochs))
    }

    /// Like [`Network::train`], with progress events sent to `config.progress_tx`.
    pub fn train_with(
        &mut self,
        inputs: &[Vec<f64>],
        expected: &[Vec<f64>],
        config: &TrainConfig,
    ) -> Result<TrainingSummary> {
        train_loop(self, inputs, expected, config)
    }

    /// Adds uniform noise from `[-strength, strength)` to every weight and bias.
    pub fn perturb<R: Rng + ?Sized>(&mut self, strength: f64, rng: &mut R) -> Result<()> {
        for layer in &mut self.layers {
            layer.perturb(strength, rng)?;
        }
        Ok(())
    }
}

fn check_len(expected: usize, data: &[f64]) -> Result<()> {
    if data.len() != expected {
        return Err(NetError::InvalidDataSize {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}
