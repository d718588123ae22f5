//! Configuration types for an OpenSwap engine deployment.

use std::path::{Path, PathBuf};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{Result, SwapError, constants};

/// Identity the engine binds every order hash to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    /// Protocol name mixed into the domain separator.
    pub name: String,
    /// Protocol version mixed into the domain separator.
    pub version: String,
    /// Chain the engine is deployed on.
    pub chain_id: u64,
    /// The engine's own address. Also the payer of normalized currency legs.
    pub verifying_contract: Address,
}

impl DomainConfig {
    /// Domain with the default protocol name and version.
    #[must_use]
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: constants::DEFAULT_PROTOCOL_NAME.to_string(),
            version: constants::DEFAULT_PROTOCOL_VERSION.to_string(),
            chain_id,
            verifying_contract,
        }
    }
}

/// Configuration for a single OpenSwap engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Signing domain.
    pub domain: DomainConfig,
    /// Fungible wrapped form of the native currency. Legs denominated in
    /// this token may be paid with attached native value.
    pub wrapped_native: Address,
    /// Path of the durable status journal. `None` keeps status in memory.
    #[serde(default)]
    pub status_journal: Option<PathBuf>,
}

impl EngineConfig {
    #[must_use]
    pub fn new(domain: DomainConfig, wrapped_native: Address) -> Self {
        Self {
            domain,
            wrapped_native,
            status_journal: None,
        }
    }

    #[must_use]
    pub fn with_status_journal(mut self, path: impl Into<PathBuf>) -> Self {
        self.status_journal = Some(path.into());
        self
    }

    /// The engine's own address.
    #[must_use]
    pub fn engine_address(&self) -> Address {
        self.domain.verifying_contract
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| {
            SwapError::Configuration(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce an unusable domain.
    pub fn validate(&self) -> Result<()> {
        if self.domain.name.is_empty() {
            return Err(SwapError::Configuration("domain name is empty".into()));
        }
        if self.domain.version.is_empty() {
            return Err(SwapError::Configuration("domain version is empty".into()));
        }
        if self.domain.chain_id == 0 {
            return Err(SwapError::Configuration("chain id must be non-zero".into()));
        }
        if self.domain.verifying_contract.is_zero() {
            return Err(SwapError::Configuration(
                "engine address must be non-zero".into(),
            ));
        }
        if self.wrapped_native.is_zero() {
            return Err(SwapError::Configuration(
                "wrapped native token must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EngineConfig {
        EngineConfig::new(
            DomainConfig::new(1, Address::repeat_byte(0xee)),
            Address::repeat_byte(0xaa),
        )
    }

    #[test]
    fn defaults_use_protocol_constants() {
        let cfg = sample();
        assert_eq!(cfg.domain.name, "OpenSwap");
        assert_eq!(cfg.domain.version, "1");
        assert_eq!(cfg.engine_address(), Address::repeat_byte(0xee));
        assert!(cfg.status_journal.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_zero_chain() {
        let mut cfg = sample();
        cfg.domain.chain_id = 0;
        assert!(matches!(cfg.validate(), Err(SwapError::Configuration(_))));
    }

    #[test]
    fn validate_rejects_zero_addresses() {
        let mut cfg = sample();
        cfg.wrapped_native = Address::ZERO;
        assert!(cfg.validate().is_err());

        let mut cfg = sample();
        cfg.domain.verifying_contract = Address::ZERO;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = sample().with_status_journal("/var/lib/openswap/status.jsonl");
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("chainId"));
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.domain, back.domain);
        assert_eq!(cfg.status_journal, back.status_journal);
    }

    #[test]
    fn missing_journal_defaults_to_memory() {
        let json = r#"{
            "domain": {
                "name": "OpenSwap",
                "version": "1",
                "chainId": 5,
                "verifyingContract": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
            },
            "wrappedNative": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        }"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.status_journal.is_none());
        cfg.validate().unwrap();
    }
}
