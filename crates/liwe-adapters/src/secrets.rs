//! Random secret source.

use rand::{Rng, distributions::Alphanumeric};

use liwe_core::application::ports::SecretSource;

/// Alphanumeric secrets from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSecrets;

impl RandomSecrets {
    pub fn new() -> Self {
        Self
    }
}

impl SecretSource for RandomSecrets {
    fn generate(&self, len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}
