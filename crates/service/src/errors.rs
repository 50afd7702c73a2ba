//! Error types used by the bridge service.

use crosslink_light_client::ClientError;
use crosslink_primitives::{AccountId, Buf32, ErrorKind};
use crosslink_proof::ProofError;
use crosslink_registry::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The operation is reserved for the bridge trigger.
    #[error("caller {0} is not the bridge trigger")]
    NotBridgeTrigger(AccountId),

    /// The operation is reserved for the governance authority.
    #[error("caller {0} is not the governance authority")]
    NotGovernance(AccountId),

    /// The caller is not a registered header submitter.
    #[error("caller {0} is not a registered header submitter")]
    NotSubmitter(AccountId),

    /// The referenced block hash has no stored header.
    #[error("no stored header with hash {0}")]
    UnknownHeader(Buf32),

    /// The source transaction was already relayed.
    #[error("source transaction {0} was already relayed")]
    DuplicateTransfer(Buf32),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Proof(#[from] ProofError),
}

impl ServiceError {
    /// Coarse classification of this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotBridgeTrigger(_) | Self::NotGovernance(_) | Self::NotSubmitter(_) => {
                ErrorKind::Authorization
            }
            Self::UnknownHeader(_) => ErrorKind::Validation,
            Self::DuplicateTransfer(_) => ErrorKind::StateConflict,
            Self::Registry(e) => e.kind(),
            Self::Client(e) => e.kind(),
            Self::Proof(e) => e.kind(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
