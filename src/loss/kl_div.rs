//! KL divergence loss.

use candle_core::Tensor;

use super::batch_size;
use crate::error::Result;

/// KL divergence: `D_KL(P || Q) = sum(P * (log(P) - log(Q)))`
///
/// Measures how distribution P diverges from distribution Q.
///
/// - `log_q`: `[..., C]` log-probabilities. Usually `log_softmax(logits)`.
/// - `p`: `[..., C]` target probability distribution. Must sum to 1 along the
///   last dim.
/// - `batchmean`: if true, sum over all dims and divide by batch size (the
///   PyTorch default). If false, compute the element-wise mean.
pub fn kl_div_loss(log_q: &Tensor, p: &Tensor, batchmean: bool) -> Result<Tensor> {
    let log_p = p.log()?;
    let diff = (log_p - log_q)?;
    let pointwise = (p * diff)?;

    if batchmean {
        let n = batch_size(pointwise.dims());
        Ok(pointwise.sum_all()?.affine(1.0 / n as f64, 0.)?)
    } else {
        Ok(pointwise.mean_all()?)
    }
}
