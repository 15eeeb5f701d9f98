//! Self-augmented training via virtual adversarial perturbation.
//!
//! The regularizer asks the classifier to keep its prediction under the small
//! input perturbation that changes it the most. The direction of that
//! perturbation is estimated with a short power-iteration-like gradient
//! search rather than a closed-form Hessian eigenvector.

use candle_core::{D, Tensor, Var};
use candle_nn::Module;
use candle_nn::ops::{log_softmax, softmax};

use super::kl_div::kl_div_loss;
use crate::error::{Error, Result};

/// L2-normalize each row along the feature axis.
fn normalize_rows(d: &Tensor) -> Result<Tensor> {
    let norm = d.sqr()?.sum_keepdim(D::Minus1)?.sqrt()?;
    Ok(d.broadcast_div(&(norm + 1e-12)?)?)
}

/// Estimate the perturbation direction that most increases output divergence.
///
/// Runs `num_iters` refinements of a random unit direction: each step
/// evaluates the classifier at `x + xi * d` with `d` registered as a
/// differentiable variable, measures the batched-mean KL divergence from the
/// clean predictions, and replaces `d` with the re-normalized gradient of
/// that divergence with respect to `d`.
///
/// - `model`: classifier producing raw class scores `[N, K]`.
/// - `x`: input batch `[N, D]`.
/// - `y_pred`: raw scores `model(x)` on the clean batch.
/// - `xi`: finite-difference step.
/// - `num_iters`: refinement count. 0 returns the random initial direction.
///
/// Every returned row has unit l2 norm.
pub fn adversarial_direction<M: Module>(
    model: &M,
    x: &Tensor,
    y_pred: &Tensor,
    xi: f64,
    num_iters: usize,
) -> Result<Tensor> {
    let clean = softmax(y_pred, D::Minus1)?.detach();
    let mut d = normalize_rows(&x.randn_like(0.0, 1.0)?)?;

    for _ in 0..num_iters {
        let d_var = Var::from_tensor(&d)?;
        let perturbed = (x + d_var.as_tensor().affine(xi, 0.)?)?;
        let logits = model.forward(&perturbed)?;
        let divergence = kl_div_loss(&log_softmax(&logits, D::Minus1)?, &clean, true)?;

        let grads = divergence.backward()?;
        let grad = grads.get(&d_var).ok_or_else(|| Error::Autograd {
            reason: "no gradient recorded for the perturbation direction".to_string(),
        })?;
        d = normalize_rows(&grad.detach())?;
    }

    Ok(d)
}

/// Self-augmentation penalty: batched-mean KL divergence between the clean
/// predictions and the predictions on the adversarially perturbed batch.
///
/// The clean predictions `y` fill the log-probability operand of the
/// divergence and the perturbed softmax output fills the distribution
/// operand, i.e. the penalty is `KL(softmax(model(x + eps*d)) || y)`.
///
/// - `model`: classifier producing raw class scores `[N, K]`.
/// - `x`: input batch `[N, D]`.
/// - `y`: `model`'s predictions on `x` as probabilities, rows summing to 1.
/// - `eps`: perturbation magnitude.
/// - `xi`: finite-difference step for the direction search.
/// - `num_iters`: direction refinement count.
pub fn self_augmented_loss<M: Module>(
    model: &M,
    x: &Tensor,
    y: &Tensor,
    eps: f64,
    xi: f64,
    num_iters: usize,
) -> Result<Tensor> {
    let y_pred = model.forward(x)?;
    let d = adversarial_direction(model, x, &y_pred, xi, num_iters)?;

    let perturbed = (x + d.affine(eps, 0.)?)?;
    let y_p = softmax(&model.forward(&perturbed)?, D::Minus1)?;

    kl_div_loss(&y.log()?, &y_p, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::cpu;
    use candle_core::Tensor;
    use candle_nn::Module;

    /// Classifier stub: raw scores are the inputs themselves.
    struct IdentityScores;

    impl Module for IdentityScores {
        fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
            Ok(xs.clone())
        }
    }

    fn sample_batch(device: &candle_core::Device) -> (Tensor, Tensor) {
        let x = Tensor::from_slice(
            &[2.0f32, -2.0, -2.0, 2.0, 2.0, -2.0, -2.0, 2.0],
            (4, 2),
            device,
        )
        .unwrap();
        let y = Tensor::from_slice(
            &[0.9f32, 0.1, 0.1, 0.9, 0.9, 0.1, 0.1, 0.9],
            (4, 2),
            device,
        )
        .unwrap();
        (x, y)
    }

    fn row_norms(d: &Tensor) -> Vec<f32> {
        d.sqr()
            .unwrap()
            .sum(1)
            .unwrap()
            .sqrt()
            .unwrap()
            .to_vec1()
            .unwrap()
    }

    #[test]
    fn test_direction_unit_norm_without_refinement() {
        let device = cpu();
        let (x, _) = sample_batch(&device);
        let y_pred = IdentityScores.forward(&x).unwrap();

        let d = adversarial_direction(&IdentityScores, &x, &y_pred, 1.0, 0).unwrap();
        assert_eq!(d.dims(), x.dims());
        for norm in row_norms(&d) {
            assert!((norm - 1.0).abs() < 1e-5, "row norm {norm}");
        }
    }

    #[test]
    fn test_direction_unit_norm_after_refinement() {
        let device = cpu();
        let (x, _) = sample_batch(&device);
        let y_pred = IdentityScores.forward(&x).unwrap();

        let d = adversarial_direction(&IdentityScores, &x, &y_pred, 1.0, 2).unwrap();
        for norm in row_norms(&d) {
            assert!((norm - 1.0).abs() < 1e-4, "row norm {norm}");
        }
    }

    #[test]
    fn test_sat_loss_finite_and_non_negative_without_refinement() {
        let device = cpu();
        let (x, y) = sample_batch(&device);

        let loss = self_augmented_loss(&IdentityScores, &x, &y, 1.0, 1.0, 0).unwrap();
        let val: f32 = loss.to_scalar().unwrap();
        assert!(val.is_finite(), "loss={val}");
        assert!(val >= -1e-6, "KL divergence should be non-negative: {val}");
    }

    #[test]
    fn test_sat_loss_finite_with_refinement() {
        let device = cpu();
        let (x, y) = sample_batch(&device);

        let loss = self_augmented_loss(&IdentityScores, &x, &y, 1.0, 1.0, 1).unwrap();
        let val: f32 = loss.to_scalar().unwrap();
        assert!(val.is_finite(), "loss={val}");
        assert!(val >= -1e-6, "KL divergence should be non-negative: {val}");
    }

    #[test]
    fn test_sat_loss_zero_when_unperturbed_and_consistent() {
        let device = cpu();
        let (x, _) = sample_batch(&device);

        // With eps = 0 the perturbed batch is the clean batch, so predictions
        // that already equal softmax(model(x)) incur no penalty.
        let y = softmax(&IdentityScores.forward(&x).unwrap(), D::Minus1).unwrap();
        let loss = self_augmented_loss(&IdentityScores, &x, &y, 0.0, 1.0, 1).unwrap();
        let val: f32 = loss.to_scalar().unwrap();
        assert!(val.abs() < 1e-5, "loss={val}");
    }
}
