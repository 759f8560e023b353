//! Error taxonomy for the Aura economy and its persistence layer.
//!
//! Nothing here is fatal. Economy errors leave the state untouched and are
//! surfaced to the player; persistence errors are warnings and gameplay
//! continues on the in-memory state; corrupt saves fall back to defaults.

/// A purchase, spin or rebirth that could not be carried out.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EconomyError {
    #[error("not enough Aura: need {cost}, have {available}")]
    InsufficientFunds { cost: f64, available: f64 },
    #[error("reach {threshold} total Aura to rebirth ({shortfall} to go)")]
    BelowPrestigeThreshold { threshold: f64, shortfall: f64 },
}

/// Reading or writing the persisted blob failed.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to encode save data: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage rejected the operation: {0}")]
    Storage(String),
}

/// A persisted blob that was read but failed validation.
#[derive(Debug, thiserror::Error)]
pub enum CorruptState {
    #[error("save data is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("save data has no numeric `aura` field")]
    MissingAura,
    #[error("save version {found} is outside the supported range {min}..={max}")]
    UnsupportedVersion { found: u32, min: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_display() {
        let err = EconomyError::InsufficientFunds {
            cost: 25.0,
            available: 3.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("need 25"), "got: {msg}");
        assert!(msg.contains("have 3"), "got: {msg}");
    }

    #[test]
    fn prestige_shortfall_display() {
        let err = EconomyError::BelowPrestigeThreshold {
            threshold: 10_000.0,
            shortfall: 400.0,
        };
        assert!(err.to_string().contains("400 to go"));
    }

    #[test]
    fn persistence_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PersistenceError = io.into();
        assert!(matches!(err, PersistenceError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn unsupported_version_display() {
        let err = CorruptState::UnsupportedVersion {
            found: 9,
            min: 1,
            max: 1,
        };
        assert!(err.to_string().contains("version 9"));
    }
}
