use crate::{error::Result, layers::dense::Layer, math::matrix::Matrix};

/// Fixed learning-rate gradient step.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to `layer` from its error term `grad_term = δ ⊙ σ'(z)`
    /// and the activation that fed it:
    ///
    /// - `b += 2·lr·grad_term`
    /// - `W += lr·(grad_term · inputᵀ)`
    ///
    /// The bias step is twice the weight step's scale. Saved models were trained
    /// with this rule, so it is kept as is.
    pub fn step(&self, layer: &mut Layer, grad_term: &Matrix, input: &Matrix) -> Result<()> {
        let biases_delta = grad_term.scale(2.0 * self.learning_rate);
        let weights_delta = grad_term.matmul(&input.transpose())?.scale(self.learning_rate);
        layer.apply_deltas(&weights_delta, &biases_delta)
    }
}
