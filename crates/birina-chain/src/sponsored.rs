//! Sponsored-path transaction submitter.
//!
//! The gasless flow: wrap the claim call (zero native value) into a user
//! operation built and signed by the injected [`SmartAccount`], submit it to
//! a bundler, then poll for the user-operation receipt and surface the
//! enclosing transaction hash. Fees are the paymaster's concern, configured
//! inside the account backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use birina::gateway::TransactionSubmitter;
use birina::types::{PendingClaim, ScanRecord, TokenUri, TransactionOutcome};
use birina::Error;
use serde_json::{json, Value};
use tracing::instrument;

use crate::rpc::RpcClient;
use crate::signer::{CallRequest, SmartAccount};
use crate::{abi, ChainError};

const CLAIM_SIGNATURE: &str = "claimGamusa(string,string,string)";
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Submitter for paymaster-sponsored user operations.
pub struct SponsoredSubmitter {
    bundler: RpcClient,
    account: Arc<dyn SmartAccount>,
    contract_address: String,
    entry_point: String,
    poll_interval: Duration,
}

impl SponsoredSubmitter {
    /// Submitter over the given bundler, smart account, claim contract, and
    /// entry point.
    pub fn new(
        bundler: RpcClient,
        account: Arc<dyn SmartAccount>,
        contract_address: impl Into<String>,
        entry_point: impl Into<String>,
    ) -> Self {
        Self {
            bundler,
            account,
            contract_address: contract_address.into(),
            entry_point: entry_point.into(),
            poll_interval: RECEIPT_POLL_INTERVAL,
        }
    }

    /// Override the receipt poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn submit(&self, call: &CallRequest) -> Result<PendingClaim, ChainError> {
        let user_op = self.account.build_user_operation(call).await?;
        let result = self
            .bundler
            .call("eth_sendUserOperation", json!([user_op, self.entry_point]))
            .await?;
        let hash = result
            .as_str()
            .map(str::to_string)
            .ok_or(ChainError::MissingResult)?;
        Ok(PendingClaim::new(hash))
    }
}

#[async_trait]
impl TransactionSubmitter for SponsoredSubmitter {
    fn account(&self) -> &str {
        self.account.address()
    }

    #[instrument(skip_all)]
    async fn submit_claim(
        &self,
        record: &ScanRecord,
        token_uri: &TokenUri,
    ) -> Result<PendingClaim, Error> {
        let call = CallRequest {
            from: self.account.address().to_string(),
            to: self.contract_address.clone(),
            data: abi::encode_string_call(
                CLAIM_SIGNATURE,
                &[&record.gamusa_id, &record.location, token_uri.as_str()],
            ),
            value: 0,
        };
        let pending = self
            .submit(&call)
            .await
            .map_err(|e| Error::Transaction(e.to_string()))?;
        tracing::info!("User operation submitted: {}", pending.handle);
        Ok(pending)
    }

    #[instrument(skip_all)]
    async fn wait_for_receipt(
        &self,
        pending: &PendingClaim,
    ) -> Result<TransactionOutcome, Error> {
        loop {
            let receipt = self
                .bundler
                .get_receipt("eth_getUserOperationReceipt", &pending.handle)
                .await
                .map_err(|e| Error::Transaction(e.to_string()))?;

            if let Some(receipt) = receipt {
                if receipt.get("success").and_then(Value::as_bool) == Some(false) {
                    return Err(Error::Transaction("user operation reverted".to_string()));
                }
                let transaction_hash = receipt
                    .get("receipt")
                    .and_then(|r| r.get("transactionHash"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::Transaction(
                            "user operation receipt carried no transaction hash".to_string(),
                        )
                    })?
                    .to_string();
                return Ok(TransactionOutcome { transaction_hash });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
