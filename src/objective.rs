//! The combined IMSAT training objective.

use candle_core::Tensor;
use candle_nn::Module;

use crate::config::ImsatConfig;
use crate::error::Result;
use crate::information::{marginal_distribution, mutual_information};
use crate::loss::self_augmented_loss;

/// Terms of one objective evaluation.
///
/// `loss` is what the training loop backpropagates; the component terms are
/// surfaced so the loop can log them.
#[derive(Debug, Clone)]
pub struct ImsatTerms {
    /// Combined loss `R_sat - lambda * I`.
    pub loss: Tensor,
    /// Mutual information estimate `I` between inputs and assignments.
    pub mutual_information: Tensor,
    /// Self-augmentation penalty `R_sat`.
    pub sat_loss: Tensor,
}

/// Regularized information maximization.
///
/// Combines the mutual information between inputs and predicted cluster
/// assignments with the self-augmentation penalty into the scalar the
/// training loop descends on. Hyperparameters travel with the instance; see
/// [`ImsatConfig`].
///
/// # Usage
///
/// ```ignore
/// let objective = ImsatObjective::new(ImsatConfig::default());
///
/// for (x, y) in batches {
///     let terms = objective.compute(&model, &x, &y)?;
///     println!(
///         "loss={:.4} mi={:.4}",
///         terms.loss.to_scalar::<f32>()?,
///         terms.mutual_information.to_scalar::<f32>()?,
///     );
///     let grads = terms.loss.backward()?;
///     // optimizer step on grads
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ImsatObjective {
    config: ImsatConfig,
}

impl ImsatObjective {
    pub fn new(config: ImsatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImsatConfig {
        &self.config
    }

    /// Evaluate the objective, returning the combined loss and its terms.
    ///
    /// - `model`: classifier producing raw class scores `[N, K]`.
    /// - `x`: input batch `[N, D]`.
    /// - `y`: `model`'s predictions on `x` as probabilities `[N, K]`.
    pub fn compute<M: Module>(&self, model: &M, x: &Tensor, y: &Tensor) -> Result<ImsatTerms> {
        let marginals = marginal_distribution(y)?;
        let info = mutual_information(&marginals, y)?;

        let sat = self_augmented_loss(
            model,
            x,
            y,
            self.config.eps,
            self.config.xi,
            self.config.sat_iters,
        )?;

        let loss = (&sat - info.affine(self.config.lambda, 0.)?)?;

        Ok(ImsatTerms {
            loss,
            mutual_information: info,
            sat_loss: sat,
        })
    }

    /// Evaluate the objective, returning only the combined scalar loss.
    pub fn loss<M: Module>(&self, model: &M, x: &Tensor, y: &Tensor) -> Result<Tensor> {
        Ok(self.compute(model, x, y)?.loss)
    }
}

impl Default for ImsatObjective {
    fn default() -> Self {
        Self::new(ImsatConfig::default())
    }
}
