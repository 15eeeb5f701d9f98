//! Marginal, entropy, and mutual information estimates over cluster assignments.
//!
//! | Function | Use case |
//! |---|---|
//! | [`marginal_distribution`] | batch-averaged cluster probabilities |
//! | [`entropy`] | Shannon entropy of a single distribution |
//! | [`mean_entropy`] | average per-row entropy of a batch |
//! | [`mutual_information`] | empirical I(X;Y) lower bound |

use candle_core::Tensor;

use crate::error::{Error, Result};

/// Marginal class distribution: the column-wise average of the conditionals.
///
/// - `conditionals`: `[N, K]`, each row a probability distribution.
///
/// Returns `[K]`, summing to 1 whenever every input row does. The batch must
/// be non-empty.
pub fn marginal_distribution(conditionals: &Tensor) -> Result<Tensor> {
    let (rows, _classes) = conditionals.dims2()?;
    if rows == 0 {
        return Err(Error::InvalidArgument {
            arg: "conditionals",
            reason: "cannot average an empty batch".to_string(),
        });
    }
    conditionals.mean(0).map_err(Error::Candle)
}

/// Shannon entropy `-sum(p * log(p))` of a single distribution.
///
/// - `p`: `[K]` probability vector.
///
/// A zero probability yields `log(0) = -inf` and a `0 * -inf = NaN` product;
/// the NaN propagates instead of being masked.
pub fn entropy(p: &Tensor) -> Result<Tensor> {
    if p.rank() != 1 {
        return Err(Error::InvalidArgument {
            arg: "p",
            reason: format!("expected a 1-D distribution, got rank {}", p.rank()),
        });
    }
    let plogp = (p * p.log()?)?;
    Ok(plogp.sum_all()?.neg()?)
}

/// Average per-row Shannon entropy `-(1/N) * sum(p * log(p))` of a batch.
///
/// - `p`: `[N, K]`, each row a probability distribution.
///
/// Same zero-probability convention as [`entropy`].
pub fn mean_entropy(p: &Tensor) -> Result<Tensor> {
    let (rows, _classes) = p.dims2()?;
    if rows == 0 {
        return Err(Error::InvalidArgument {
            arg: "p",
            reason: "cannot average an empty batch".to_string(),
        });
    }
    let plogp = (p * p.log()?)?;
    Ok(plogp.sum_all()?.affine(-1.0 / rows as f64, 0.)?)
}

/// Empirical mutual information between inputs and cluster assignments:
/// `H(marginals) - (1/N) * sum_i H(conditionals[i])`.
///
/// This is the lower bound I(X;Y) ≈ H(Ȳ) − mean H(Y|X=xᵢ) that IMSAT
/// maximizes.
///
/// - `marginals`: `[K]` marginal class distribution.
/// - `conditionals`: `[N, K]` per-sample class distributions.
pub fn mutual_information(marginals: &Tensor, conditionals: &Tensor) -> Result<Tensor> {
    let marginal_entropy = entropy(marginals)?;
    let conditional_entropy = mean_entropy(conditionals)?;

    (marginal_entropy - conditional_entropy).map_err(Error::Candle)
}
