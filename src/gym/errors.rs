use thiserror::Error;

/// Errors that can arise while reading or writing gym state.
///
/// Every variant belongs to the data-access failure class: the session that hit
/// it is abandoned and the caller's menu regains control. Bad menu input never
/// reaches this type; it is handled by re-prompting.
#[derive(Debug, Error)]
pub enum GymError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, console reads).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// A stat write outside the field's closed range.
    #[error("value {value} out of range for {field} ({min}..={max})")]
    InvalidField {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    /// Identity strings that cannot name a stats record.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

impl GymError {
    /// True for failures reading or writing the store, as opposed to a
    /// caller handing in an unusable identity.
    pub fn is_data_access(&self) -> bool {
        !matches!(self, GymError::InvalidIdentity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_identity_is_not_a_storage_failure() {
        assert!(!GymError::InvalidIdentity("a b".into()).is_data_access());
        assert!(GymError::NotFound("stats: guest".into()).is_data_access());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        assert!(GymError::from(io).is_data_access());
        assert!(GymError::SchemaMismatch {
            entity: "stats",
            expected: 1,
            found: 2
        }
        .is_data_access());
    }
}
