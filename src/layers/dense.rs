use rand::Rng;

use crate::{error::Result, math::matrix::Matrix};

/// One affine transform of the network: `weights` is `size × input_size`,
/// `biases` is `size × 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Layer {
    /// All-zero layer.
    pub fn zeros(size: usize, input_size: usize) -> Layer {
        Layer {
            weights: Matrix::zeros(size, input_size),
            biases: Matrix::zeros(size, 1),
        }
    }

    /// Weights and biases drawn independently and uniformly from `[-1, 1)`.
    pub fn random<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        Layer {
            weights: Matrix::random(size, input_size, -1.0, 1.0, rng),
            biases: Matrix::random(size, 1, -1.0, 1.0, rng),
        }
    }

    pub fn size(&self) -> usize {
        self.weights.rows()
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols()
    }

    /// Pre-activation `z = W · input + b` for a column-vector input.
    pub fn pre_activation(&self, input: &Matrix) -> Result<Matrix> {
        self.weights.matmul(input)?.add(&self.biases)
    }

    /// Adds the given deltas to the biases and weights. Nothing is written
    /// unless both shapes match.
    pub fn apply_deltas(&mut self, weights_delta: &Matrix, biases_delta: &Matrix) -> Result<()> {
        let biases = self.biases.add(biases_delta)?;
        let weights = self.weights.add(weights_delta)?;
        self.biases = biases;
        self.weights = weights;
        Ok(())
    }

    /// Adds independent uniform noise from `[-strength, strength)` to every parameter.
    pub fn perturb<R: Rng + ?Sized>(&mut self, strength: f64, rng: &mut R) -> Result<()> {
        let (wr, wc) = self.weights.dims();
        let (br, bc) = self.biases.dims();

        let weights_noise = Matrix::random(wr, wc, -strength, strength, rng);
        let biases_noise = Matrix::random(br, bc, -strength, strength, rng);
        self.apply_deltas(&weights_noise, &biases_noise)
    }
}
