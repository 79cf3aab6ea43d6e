//! Delegation seams for key custody.
//!
//! Signing never happens in this repository. The direct path hands a
//! [`CallRequest`] to a [`WalletSigner`] and gets raw signed transaction
//! bytes back; the sponsored path hands the same request to a
//! [`SmartAccount`] and gets a signed, paymaster-backed user operation.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::ChainError;

/// A contract call awaiting signature or wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Calling account
    pub from: String,
    /// Target contract address
    pub to: String,
    /// ABI-encoded call data
    pub data: Vec<u8>,
    /// Native value attached; always zero for claims
    pub value: u128,
}

impl CallRequest {
    /// The call as a JSON-RPC call object.
    pub fn as_call_object(&self) -> Value {
        json!({
            "from": self.from,
            "to": self.to,
            "data": format!("0x{}", hex::encode(&self.data)),
            "value": format!("0x{:x}", self.value),
        })
    }
}

/// An external wallet producing raw signed transactions.
///
/// Nonce, gas, and chain id are the signer's concern.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> &str;

    /// Produce raw signed transaction bytes for the call.
    async fn sign_transaction(&self, call: &CallRequest) -> Result<Vec<u8>, ChainError>;
}

/// An external smart account producing sponsored user operations.
#[async_trait]
pub trait SmartAccount: Send + Sync {
    /// Address of the smart account.
    fn address(&self) -> &str;

    /// Produce a signed user operation for the call, ready for bundler
    /// submission.
    async fn build_user_operation(&self, call: &CallRequest) -> Result<Value, ChainError>;
}
