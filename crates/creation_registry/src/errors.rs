//! Error types for the creation registry

use atelier_storage::StorageError;
use thiserror::Error;

/// Code reported for [`ContractError::NotAuthorized`].
pub const ERR_NOT_AUTHORIZED: u32 = 100;
/// Code reported for [`ContractError::AlreadyRegistered`].
pub const ERR_ALREADY_REGISTERED: u32 = 101;
/// Code reported for [`ContractError::NotFound`].
pub const ERR_NOT_FOUND: u32 = 102;

/// Rejections defined by the registry rules. A call failing with one of
/// these has not changed any state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractError {
    #[error("caller is not the creator of this creation")]
    NotAuthorized,

    #[error("creation id is already registered")]
    AlreadyRegistered,

    #[error("creation not found")]
    NotFound,
}

impl ContractError {
    /// Numeric code surfaced to ledger clients.
    pub const fn code(self) -> u32 {
        match self {
            ContractError::NotAuthorized => ERR_NOT_AUTHORIZED,
            ContractError::AlreadyRegistered => ERR_ALREADY_REGISTERED,
            ContractError::NotFound => ERR_NOT_FOUND,
        }
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            ERR_NOT_AUTHORIZED => Some(ContractError::NotAuthorized),
            ERR_ALREADY_REGISTERED => Some(ContractError::AlreadyRegistered),
            ERR_NOT_FOUND => Some(ContractError::NotFound),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The backing store failed. Not a rule violation; the call may be retried.
    #[error("Registry storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RegistryError {
    /// The rule violation behind this error, if it is one.
    pub fn contract(&self) -> Option<ContractError> {
        match self {
            RegistryError::Contract(err) => Some(*err),
            RegistryError::Storage(_) => None,
        }
    }

    pub fn is_contract_error(&self) -> bool {
        self.contract().is_some()
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
