//! IMSAT objective configuration

/// Hyperparameters of the IMSAT objective.
///
/// `lambda` trades the self-augmentation penalty off against the mutual
/// information term; `eps` and `xi` control the virtual adversarial
/// perturbation search. Values travel with the objective instance, so
/// concurrent runs with different trade-offs do not interfere.
///
/// `eps` and `xi` are not validated; non-positive values are the caller's
/// responsibility.
#[derive(Debug, Clone)]
pub struct ImsatConfig {
    /// Trade-off weight on the mutual information term.
    pub lambda: f64,
    /// Magnitude of the applied adversarial perturbation.
    pub eps: f64,
    /// Finite-difference step used during the direction search.
    pub xi: f64,
    /// Power-iteration count for the direction search. 0 keeps the random
    /// initial direction.
    pub sat_iters: usize,
}

impl Default for ImsatConfig {
    fn default() -> Self {
        Self {
            lambda: 0.1,
            eps: 1.0,
            xi: 1.0,
            sat_iters: 1,
        }
    }
}

impl ImsatConfig {
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_xi(mut self, xi: f64) -> Self {
        self.xi = xi;
        self
    }

    pub fn with_sat_iters(mut self, iters: usize) -> Self {
        self.sat_iters = iters;
        self
    }
}
