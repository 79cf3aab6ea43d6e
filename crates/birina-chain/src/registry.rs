//! Claim registry reads over `eth_call`.

use async_trait::async_trait;
use birina::gateway::ClaimRegistry;
use birina::Error;
use tracing::instrument;

use crate::rpc::RpcClient;
use crate::{abi, ChainError};

const IS_CLAIMED_SIGNATURE: &str = "isGamusaClaimed(string)";

/// Read-only view of the claim contract.
#[derive(Debug, Clone)]
pub struct EvmClaimRegistry {
    rpc: RpcClient,
    contract_address: String,
}

impl EvmClaimRegistry {
    /// Registry view over the given node and contract.
    pub fn new(rpc: RpcClient, contract_address: impl Into<String>) -> Self {
        Self {
            rpc,
            contract_address: contract_address.into(),
        }
    }

    async fn read_claimed(&self, gamusa_id: &str) -> Result<bool, ChainError> {
        let data = abi::encode_string_call(IS_CLAIMED_SIGNATURE, &[gamusa_id]);
        let ret = self.rpc.eth_call(&self.contract_address, &data).await?;
        abi::decode_bool(&ret)
    }
}

#[async_trait]
impl ClaimRegistry for EvmClaimRegistry {
    #[instrument(skip_all, fields(gamusa_id = %gamusa_id))]
    async fn is_claimed(&self, gamusa_id: &str) -> Result<bool, Error> {
        let claimed = self
            .read_claimed(gamusa_id)
            .await
            .map_err(|e| Error::StatusCheck(e.to_string()))?;
        tracing::debug!("Gamusa {gamusa_id} claimed: {claimed}");
        Ok(claimed)
    }
}
