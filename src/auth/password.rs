use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::config::{ConfigError, PasswordConfig};

/// Argon2id hasher. Cost factors apply to new hashes; verification reads the
/// factors embedded in the stored PHC string, so older hashes keep verifying
/// after the configuration changes.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(cfg: &PasswordConfig) -> Result<Self, ConfigError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| ConfigError::Invalid {
                key: "ARGON2_*",
                value: e.to_string(),
            })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    pub fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        Ok(self
            .argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::new(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = cheap();
        let hash = hasher.hash("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=1024,t=1,p=1"));
        assert!(hasher.verify("Secur3P@ssw0rd!", &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = cheap();
        let hash = hasher.hash("correct-horse-battery-staple").unwrap();
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = cheap();
        assert_ne!(hasher.hash("Abc!defgh").unwrap(), hasher.hash("Abc!defgh").unwrap());
    }

    #[test]
    fn hashes_from_older_cost_factors_still_verify() {
        let old = cheap();
        let hash = old.hash("Abc!defgh").unwrap();
        let current = PasswordHasher::new(&PasswordConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(current.verify("Abc!defgh", &hash).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn invalid_cost_factors_are_a_config_error() {
        let err = PasswordHasher::new(&PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
