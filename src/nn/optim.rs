//! Adam optimizer over flat parameter buffers.

/// Adam optimizer (Kingma & Ba, 2015).
///
/// Update rule:
/// ```text
/// m_t = β₁ * m_{t-1} + (1 - β₁) * grad
/// v_t = β₂ * v_{t-1} + (1 - β₂) * grad²
/// m̂_t = m_t / (1 - β₁ᵗ)
/// v̂_t = v_t / (1 - β₂ᵗ)
/// param = param - lr * m̂_t / (√v̂_t + ε)
/// ```
///
/// Each parameter buffer is addressed by a stable slot index so moment
/// estimates follow the buffer across steps.
#[derive(Debug, Clone)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    /// First moment estimates
    m: Vec<Vec<f32>>,
    /// Second moment estimates
    v: Vec<Vec<f32>>,
    /// Current timestep for bias correction
    t: usize,
}

impl Adam {
    /// Creates an optimizer with β₁=0.9, β₂=0.999, ε=1e-7.
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-7,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    /// Set beta parameters.
    #[must_use]
    pub fn betas(mut self, beta1: f32, beta2: f32) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Set epsilon for numerical stability.
    #[must_use]
    pub fn eps(mut self, eps: f32) -> Self {
        self.eps = eps;
        self
    }

    /// Advances the timestep. Call once per batch before the updates.
    pub fn begin_step(&mut self) {
        self.t += 1;
    }

    /// Current timestep.
    #[must_use]
    pub fn timestep(&self) -> usize {
        self.t
    }

    /// Applies one update to the buffer in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `grads` is shorter than `params`.
    pub fn update(&mut self, slot: usize, params: &mut [f32], grads: &[f32]) {
        if slot >= self.m.len() {
            self.m.resize(slot + 1, Vec::new());
            self.v.resize(slot + 1, Vec::new());
        }
        if self.m[slot].len() != params.len() {
            self.m[slot] = vec![0.0; params.len()];
            self.v[slot] = vec![0.0; params.len()];
        }

        let t = self.t.max(1) as i32;
        let bias_correction1 = 1.0 - self.beta1.powi(t);
        let bias_correction2 = 1.0 - self.beta2.powi(t);

        let m = &mut self.m[slot];
        let v = &mut self.v[slot];
        for i in 0..params.len() {
            let g = grads[i];
            m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * g;
            v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = m[i] / bias_correction1;
            let v_hat = v[i] / bias_correction2;
            params[i] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_moves_by_lr() {
        // With bias correction the first step is lr * sign(grad)
        let mut opt = Adam::new(0.1).eps(0.0);
        let mut params = vec![1.0, -1.0];
        opt.begin_step();
        opt.update(0, &mut params, &[2.0, -0.5]);
        assert!((params[0] - 0.9).abs() < 1e-6);
        assert!((params[1] + 0.9).abs() < 1e-6);
        assert_eq!(opt.timestep(), 1);
    }

    #[test]
    fn test_minimizes_quadratic() {
        let mut opt = Adam::new(0.05);
        let mut x = vec![3.0_f32];
        for _ in 0..500 {
            let grad = vec![2.0 * x[0]];
            opt.begin_step();
            opt.update(0, &mut x, &grad);
        }
        assert!(x[0].abs() < 0.1, "x = {}", x[0]);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut opt = Adam::new(0.1).betas(0.9, 0.999);
        let mut a = vec![0.0];
        let mut b = vec![0.0, 0.0];
        opt.begin_step();
        opt.update(1, &mut b, &[1.0, 1.0]);
        opt.update(0, &mut a, &[-1.0]);
        assert!(a[0] > 0.0);
        assert!(b.iter().all(|&v| v < 0.0));
    }
}
