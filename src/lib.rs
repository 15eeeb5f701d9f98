//! # imsat
//!
//! **Loss functions for Information Maximizing Self-Augmented Training.**
//!
//! IMSAT trains an unsupervised discriminative clustering model by maximizing
//! the mutual information between inputs and predicted cluster assignments
//! while penalizing prediction changes under a virtual adversarial
//! perturbation of the inputs. This crate implements that objective as a
//! single differentiable scalar; the classifier, the optimizer, and the
//! training loop live with the caller.
//!
//! | Module | Contents |
//! |---|---|
//! | [`information`] | marginal distribution, entropy, mutual information |
//! | [`loss`] | KL divergence, adversarial direction search, self-augmentation penalty |
//! | [`objective`] | the combined `R_sat - lambda * I` objective |
//! | [`config`] | hyperparameters threaded through the objective |
//!
//! ## Usage
//!
//! ```ignore
//! use imsat::{ImsatConfig, ImsatObjective};
//!
//! let objective = ImsatObjective::new(ImsatConfig::default().with_lambda(0.1));
//!
//! for x in batches {
//!     let y = softmax(&model.forward(&x)?, D::Minus1)?;
//!     let terms = objective.compute(&model, &x, &y)?;
//!     let grads = terms.loss.backward()?;
//!     // optimizer step on grads
//! }
//! ```
//!
//! ## Numeric conventions
//!
//! No clamping or bounds-checking is performed anywhere: a zero probability
//! drives an entropy through `0 * log(0) = NaN`, and the NaN propagates to
//! the returned loss. Training loops are expected to watch for non-finite
//! losses.

pub mod config;
pub mod error;
pub mod information;
pub mod loss;
pub mod objective;

pub use config::ImsatConfig;
pub use error::{Error, Result};
pub use information::{entropy, marginal_distribution, mean_entropy, mutual_information};
pub use loss::{adversarial_direction, kl_div_loss, self_augmented_loss};
pub use objective::{ImsatObjective, ImsatTerms};

// Re-export backend types that users will commonly need
pub use candle_core::{Device, Tensor};
pub use candle_nn::Module;
