//! # Outbound Ports
//!
//! The ledger node and the transaction signer (a wallet or an identity
//! session holding an ephemeral key).

use crate::domain::{decode_transaction_response, GatewayError, RawObject, TransactionSpec};
use async_trait::async_trait;
use shared_types::{Address, ObjectId, TransactionResult};
use tracing::{debug, error};

/// Signs a transaction and hands it to the ledger for execution.
///
/// Returns the node's execution response verbatim; the gateway decodes it.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Address the signer acts as (the transaction sender).
    fn address(&self) -> Address;

    /// Sign and execute. Rejection by the user or an invalid signature is
    /// `GatewayError::SignatureRejected`.
    async fn sign_and_execute(
        &self,
        tx: &TransactionSpec,
    ) -> Result<serde_json::Value, GatewayError>;
}

/// Ledger node - outbound port.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Read one object with type, owner and content. `Ok(None)` when absent.
    async fn read_object(&self, id: &ObjectId) -> Result<Option<RawObject>, GatewayError>;

    /// All objects of `struct_type` owned by `owner`, across every page.
    async fn read_owned_objects(
        &self,
        owner: &Address,
        struct_type: &str,
    ) -> Result<Vec<RawObject>, GatewayError>;

    /// All objects of `struct_type`, regardless of owner.
    async fn query_objects(&self, struct_type: &str) -> Result<Vec<RawObject>, GatewayError>;

    /// Total gas-coin balance of `owner` in smallest units.
    async fn get_balance(&self, owner: &Address) -> Result<u64, GatewayError>;

    /// Sign, execute and decode a transaction.
    async fn submit(
        &self,
        tx: &TransactionSpec,
        signer: &dyn TransactionSigner,
    ) -> Result<TransactionResult, GatewayError> {
        debug!(
            "[tl-01] Submitting '{}' ({} commands) as {}",
            tx.label,
            tx.commands.len(),
            signer.address()
        );
        let response = signer.sign_and_execute(tx).await.map_err(|e| {
            error!("[tl-01] '{}' was not executed: {}", tx.label, e);
            e
        })?;
        let result = decode_transaction_response(&response).map_err(|e| {
            error!("[tl-01] '{}' failed: {}", tx.label, e);
            e
        })?;
        debug!(
            "[tl-01] '{}' executed, digest {} ({} created)",
            tx.label,
            result.digest,
            result.created.len()
        );
        Ok(result)
    }
}
