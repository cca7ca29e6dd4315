use crate::{codec::FormatError, keys::KeyError, recover::RecoveryError, signer::SignatureError};

/// Errors returned by the token-level entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
}

pub type Result<T> = std::result::Result<T, Error>;
