//! Synthetic login usernames

use loadtest_config::TargetConfig;
use rand::Rng;

/// Draws a user id uniformly from an inclusive range and renders it as a
/// zero-padded number followed by a domain suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameGenerator {
    min_id: u64,
    max_id: u64,
    width: usize,
    domain: String,
}

impl UsernameGenerator {
    pub fn new(min_id: u64, max_id: u64, width: usize, domain: impl Into<String>) -> Self {
        Self {
            min_id,
            max_id,
            width,
            domain: domain.into(),
        }
    }

    pub fn format(&self, id: u64) -> String {
        format!("{:0width$}{}", id, self.domain, width = self.width)
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.format(rng.random_range(self.min_id..=self.max_id))
    }
}

impl Default for UsernameGenerator {
    fn default() -> Self {
        Self::from(&TargetConfig::default())
    }
}

impl From<&TargetConfig> for UsernameGenerator {
    fn from(config: &TargetConfig) -> Self {
        Self::new(
            config.min_user_id,
            config.max_user_id,
            config.username_width,
            config.username_domain.clone(),
        )
    }
}
