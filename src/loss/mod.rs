//! Loss terms of the IMSAT objective.
//!
//! | Function | Use case |
//! |---|---|
//! | [`kl_div_loss`] | distribution matching between prediction pairs |
//! | [`adversarial_direction`] | virtual adversarial perturbation search |
//! | [`self_augmented_loss`] | prediction invariance under input perturbation |

pub mod kl_div;
pub mod sat;

pub use kl_div::kl_div_loss;
pub use sat::{adversarial_direction, self_augmented_loss};

/// Compute batch size from shape (product of all dims except last).
fn batch_size(shape: &[usize]) -> usize {
    if shape.len() <= 1 {
        1
    } else {
        shape[..shape.len() - 1].iter().product()
    }
}
