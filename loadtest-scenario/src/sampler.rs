//! Probabilistic diagnostic logging

use rand::Rng;

/// Decides, independently per iteration, whether to emit a diagnostic line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticSampler {
    rate: f64,
}

impl DiagnosticSampler {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn should_log<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random::<f64>() < self.rate
    }
}

impl Default for DiagnosticSampler {
    fn default() -> Self {
        Self::new(0.01)
    }
}
