use atelier_meta::identity::ClassUid;
use thiserror::Error;

/// An error raised while reading or writing a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("settings serialization failed: {0}")]
    Serialize(#[from] ron::Error),
    #[error("no settings file path set")]
    EmptyPath,
    #[error("settings `{incoming}` share UID {uid} with registered settings `{existing}`")]
    UidCollision {
        uid: ClassUid,
        existing: &'static str,
        incoming: &'static str,
    },
}
