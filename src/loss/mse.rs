use crate::error::{NetError, Result};

pub struct MseLoss;

impl MseLoss {
    /// Total squared error: sum((expected - predicted)²) over output dimensions.
    pub fn total(predicted: &[f64], expected: &[f64]) -> Result<f64> {
        if predicted.len() != expected.len() {
            return Err(NetError::InvalidDataSize {
                expected: expected.len(),
                actual: predicted.len(),
            });
        }

        Ok(predicted.iter().zip(expected.iter())
            .map(|(a, b)| (b - a).powi(2))
            .sum::<f64>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_squared_errors() {
        let cost = MseLoss::total(&[0.5, 1.0], &[1.0, 0.0]).unwrap();
        assert_eq!(cost, 1.25);
    }

    #[test]
    fn total_rejects_length_mismatch() {
        assert!(MseLoss::total(&[0.5], &[1.0, 0.0]).is_err());
    }
}
