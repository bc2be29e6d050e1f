use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Authorization errors
    NotAuthorized = 3,
    OnlyOwner = 4,
    CannotRevokeOwner = 5,

    // Batch errors
    EmptyBatchId = 6,
    BatchAlreadyExists = 7,
    BatchNotFound = 8,

    // Transfer log errors
    TransferNotFound = 9,
}

impl ContractError {
    /// Human readable reason, surfaced verbatim by off-chain callers.
    pub fn message(&self) -> &'static str {
        match self {
            ContractError::AlreadyInitialized => "Contract already initialized",
            ContractError::NotInitialized => "Contract not initialized",
            ContractError::NotAuthorized => "Not authorized",
            ContractError::OnlyOwner => "Only owner can call this function",
            ContractError::CannotRevokeOwner => "Owner cannot be revoked",
            ContractError::EmptyBatchId => "Batch ID cannot be empty",
            ContractError::BatchAlreadyExists => "Batch already exists",
            ContractError::BatchNotFound => "Batch does not exist",
            ContractError::TransferNotFound => "Transfer record does not exist",
        }
    }
}
