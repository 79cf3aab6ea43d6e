//! EVM chain backends for Birina.
//!
//! Implements the core gateway traits over raw JSON-RPC: the claim-registry
//! read (`isGamusaClaimed(string)`) and the two transaction submitter
//! variants for `claimGamusa(string,string,string)` — a direct signed
//! transaction and a sponsored user operation. Key custody stays external:
//! both submitters delegate signing to an injected capability and only own
//! call-data construction, submission, and receipt polling.

use thiserror::Error;

pub mod abi;
pub mod direct;
pub mod registry;
pub mod rpc;
pub mod signer;
pub mod sponsored;

pub use direct::DirectSubmitter;
pub use registry::EvmClaimRegistry;
pub use rpc::RpcClient;
pub use signer::{CallRequest, SmartAccount, WalletSigner};
pub use sponsored::SponsoredSubmitter;

/// Chain backend error
#[derive(Debug, Error)]
pub enum ChainError {
    /// The node rejected the request
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },
    /// The response lacked a result
    #[error("rpc response carried no result")]
    MissingResult,
    /// The result was not the hex blob the method promises
    #[error("malformed hex in rpc result: {0}")]
    MalformedHex(String),
    /// Transport failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The signer or account backend refused
    #[error("signer error: {0}")]
    Signer(String),
    /// Pre-validation of the call reverted
    #[error("simulation reverted: {0}")]
    Simulation(String),
}
