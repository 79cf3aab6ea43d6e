//! Direct-path transaction submitter.
//!
//! The standard wallet flow: pre-validate the call with `eth_call`, obtain
//! raw signed bytes from the injected [`WalletSigner`], broadcast, then poll
//! for the mined receipt. The receipt wait is unbounded here; the workflow
//! applies its own timeout around it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use birina::gateway::TransactionSubmitter;
use birina::types::{PendingClaim, ScanRecord, TokenUri, TransactionOutcome};
use birina::Error;
use serde_json::{json, Value};
use tracing::instrument;

use crate::rpc::RpcClient;
use crate::signer::{CallRequest, WalletSigner};
use crate::{abi, ChainError};

const CLAIM_SIGNATURE: &str = "claimGamusa(string,string,string)";
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Submitter for standard signed wallet transactions.
pub struct DirectSubmitter {
    rpc: RpcClient,
    signer: Arc<dyn WalletSigner>,
    contract_address: String,
    poll_interval: Duration,
}

impl DirectSubmitter {
    /// Submitter over the given node, signer, and claim contract.
    pub fn new(
        rpc: RpcClient,
        signer: Arc<dyn WalletSigner>,
        contract_address: impl Into<String>,
    ) -> Self {
        Self {
            rpc,
            signer,
            contract_address: contract_address.into(),
            poll_interval: RECEIPT_POLL_INTERVAL,
        }
    }

    /// Override the receipt poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn claim_call(&self, record: &ScanRecord, token_uri: &TokenUri) -> CallRequest {
        CallRequest {
            from: self.signer.address().to_string(),
            to: self.contract_address.clone(),
            data: abi::encode_string_call(
                CLAIM_SIGNATURE,
                &[&record.gamusa_id, &record.location, token_uri.as_str()],
            ),
            value: 0,
        }
    }

    async fn submit(&self, call: &CallRequest) -> Result<PendingClaim, ChainError> {
        // pre-validate before asking the wallet for a signature
        self.rpc
            .call("eth_call", json!([call.as_call_object(), "latest"]))
            .await
            .map_err(|err| match err {
                ChainError::Rpc { message, .. } => ChainError::Simulation(message),
                other => other,
            })?;

        let raw = self.signer.sign_transaction(call).await?;
        let hash = self.rpc.send_raw_transaction(&raw).await?;
        Ok(PendingClaim::new(hash))
    }
}

#[async_trait]
impl TransactionSubmitter for DirectSubmitter {
    fn account(&self) -> &str {
        self.signer.address()
    }

    #[instrument(skip_all)]
    async fn submit_claim(
        &self,
        record: &ScanRecord,
        token_uri: &TokenUri,
    ) -> Result<PendingClaim, Error> {
        let call = self.claim_call(record, token_uri);
        let pending = self
            .submit(&call)
            .await
            .map_err(|e| Error::Transaction(e.to_string()))?;
        tracing::info!("Claim transaction broadcast: {}", pending.handle);
        Ok(pending)
    }

    #[instrument(skip_all)]
    async fn wait_for_receipt(
        &self,
        pending: &PendingClaim,
    ) -> Result<TransactionOutcome, Error> {
        loop {
            let receipt = self
                .rpc
                .get_receipt("eth_getTransactionReceipt", &pending.handle)
                .await
                .map_err(|e| Error::Transaction(e.to_string()))?;

            if let Some(receipt) = receipt {
                let transaction_hash = receipt
                    .get("transactionHash")
                    .and_then(Value::as_str)
                    .unwrap_or(&pending.handle)
                    .to_string();
                return Ok(TransactionOutcome { transaction_hash });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
