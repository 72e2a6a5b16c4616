use thiserror::Error;

use crate::identity::ClassUid;

/// An error raised when a class cannot enter the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Two different classes hash to the same UID, or one type was
    /// described twice.
    #[error("meta class `{incoming}` duplicates {uid} already taken by `{existing}`")]
    DuplicateUid {
        uid: ClassUid,
        existing: &'static str,
        incoming: &'static str,
    },
}
