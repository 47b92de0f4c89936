//! # Lifecycle Errors
//!
//! Local validation failures never reach the network. Everything the
//! ledger rejects is classified into `LedgerError` by matching known
//! substrings of the remote message; unmatched messages are kept verbatim
//! in `RemoteFailure`.

use thiserror::Error;
use tl_01_ledger_gateway::GatewayError;
use tl_02_money_codec::CodecError;

/// Ledger-origin failures, with user-facing messages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Signer cannot cover gas (and payment).
    #[error("Insufficient balance for gas fees")]
    InsufficientGas,

    /// A referenced object is gone (e.g. a consumed listing).
    #[error("The requested item no longer exists")]
    ObjectNotFound,

    /// Signing was refused or the signature did not verify.
    #[error("Transaction signature failed. Please try again")]
    InvalidSignature,

    /// The seller profile lacks a verified badge.
    #[error("Seller is not verified. Please get verified first")]
    SellerNotVerified,

    /// Payment differs from the listing price.
    #[error("Payment amount does not match the ticket price")]
    WrongPaymentAmount,

    /// Ticket id differs from the listing's ticket.
    #[error("Ticket ID does not match the listing")]
    TicketIdMismatch,

    /// Only the escrow's buyer may confirm.
    #[error("Only the buyer can confirm this escrow")]
    NotBuyer,

    /// The admin capability is required.
    #[error("Admin capability required for this operation")]
    Unauthorized,

    /// The escrow already reached `Released` or `Refunded`.
    #[error("Escrow is already settled")]
    EscrowNotPending,

    /// Only the ticket's owner may list it.
    #[error("Only the ticket owner can list it")]
    NotTicketOwner,

    /// Anything else, with the original message.
    #[error("{0}")]
    RemoteFailure(String),
}

/// Substring rules, checked in order. Abort codes come first so a message
/// that mentions both an abort and a generic phrase gets the specific kind.
const RULES: &[(&str, LedgerError)] = &[
    ("ESELLER_NOT_VERIFIED", LedgerError::SellerNotVerified),
    ("EWRONG_PAYMENT_AMOUNT", LedgerError::WrongPaymentAmount),
    ("ETICKET_ID_MISMATCH", LedgerError::TicketIdMismatch),
    ("ENOT_BUYER", LedgerError::NotBuyer),
    ("EESCROW_NOT_PENDING", LedgerError::EscrowNotPending),
    ("ENOT_OWNER", LedgerError::NotTicketOwner),
    ("ENOT_ADMIN", LedgerError::Unauthorized),
    ("EUNAUTHORIZED", LedgerError::Unauthorized),
    ("Insufficient gas", LedgerError::InsufficientGas),
    ("InsufficientGas", LedgerError::InsufficientGas),
    ("GasBalanceTooLow", LedgerError::InsufficientGas),
    ("Object not found", LedgerError::ObjectNotFound),
    ("Invalid signature", LedgerError::InvalidSignature),
];

impl LedgerError {
    /// Classify a remote error message.
    pub fn classify(message: &str) -> Self {
        RULES
            .iter()
            .find(|(needle, _)| message.contains(needle))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_else(|| Self::RemoteFailure(message.to_string()))
    }

    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientGas => "insufficient_gas",
            Self::ObjectNotFound => "object_not_found",
            Self::InvalidSignature => "invalid_signature",
            Self::SellerNotVerified => "seller_not_verified",
            Self::WrongPaymentAmount => "wrong_payment_amount",
            Self::TicketIdMismatch => "ticket_id_mismatch",
            Self::NotBuyer => "not_buyer",
            Self::Unauthorized => "unauthorized",
            Self::EscrowNotPending => "escrow_not_pending",
            Self::NotTicketOwner => "not_ticket_owner",
            Self::RemoteFailure(_) => "remote_failure",
        }
    }
}

impl From<GatewayError> for LedgerError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ObjectNotFound(_) => Self::ObjectNotFound,
            GatewayError::SignatureRejected(_) => Self::InvalidSignature,
            // Decode problems carry no ledger message worth matching.
            GatewayError::Decode(_) | GatewayError::UnexpectedType { .. } => {
                Self::RemoteFailure(err.to_string())
            }
            other => Self::classify(&other.to_string()),
        }
    }
}

/// Errors returned by lifecycle operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Bad local input. No request was sent.
    #[error("{0}")]
    Validation(String),

    /// The ledger rejected or failed the request.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl LifecycleError {
    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The ledger classification, if this is a ledger error.
    pub fn ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<GatewayError> for LifecycleError {
    fn from(err: GatewayError) -> Self {
        Self::Ledger(err.into())
    }
}

impl From<CodecError> for LifecycleError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidAmount(_) => Self::Validation(err.to_string()),
            CodecError::NoCreatedObjects => {
                Self::Ledger(LedgerError::RemoteFailure(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ObjectId;

    #[test]
    fn test_classify_abort_codes() {
        let cases = [
            (
                "MoveAbort in ticket::list_ticket: ESELLER_NOT_VERIFIED",
                LedgerError::SellerNotVerified,
            ),
            ("MoveAbort ... EWRONG_PAYMENT_AMOUNT in command 1", LedgerError::WrongPaymentAmount),
            ("ETICKET_ID_MISMATCH", LedgerError::TicketIdMismatch),
            ("abort ENOT_BUYER", LedgerError::NotBuyer),
            ("abort ENOT_ADMIN", LedgerError::Unauthorized),
            ("EUNAUTHORIZED", LedgerError::Unauthorized),
            ("EESCROW_NOT_PENDING", LedgerError::EscrowNotPending),
            ("ENOT_OWNER", LedgerError::NotTicketOwner),
            ("Insufficient gas: balance 0", LedgerError::InsufficientGas),
        ];
        for (message, expected) in cases {
            assert_eq!(LedgerError::classify(message), expected, "{}", message);
        }
    }

    #[test]
    fn test_unmapped_keeps_message() {
        let err = LedgerError::classify("node is syncing");
        assert_eq!(err, LedgerError::RemoteFailure("node is syncing".to_string()));
        assert_eq!(err.to_string(), "node is syncing");
        assert_eq!(err.kind(), "remote_failure");
    }

    #[test]
    fn test_from_gateway_error() {
        assert_eq!(
            LedgerError::from(GatewayError::ObjectNotFound(ObjectId::new("0x1"))),
            LedgerError::ObjectNotFound
        );
        assert_eq!(
            LedgerError::from(GatewayError::SignatureRejected("no".to_string())),
            LedgerError::InvalidSignature
        );
        assert_eq!(
            LedgerError::from(GatewayError::ExecutionFailed("x ENOT_BUYER y".to_string())),
            LedgerError::NotBuyer
        );
        assert_eq!(
            LedgerError::from(GatewayError::Rpc {
                code: -32002,
                message: "Insufficient gas".to_string()
            }),
            LedgerError::InsufficientGas
        );
        assert!(matches!(
            LedgerError::from(GatewayError::Decode("field 'price': missing".to_string())),
            LedgerError::RemoteFailure(_)
        ));
    }

    #[test]
    fn test_codec_error_conversion() {
        assert!(matches!(
            LifecycleError::from(CodecError::InvalidAmount("-1".to_string())),
            LifecycleError::Validation(_)
        ));
        assert!(matches!(
            LifecycleError::from(CodecError::NoCreatedObjects),
            LifecycleError::Ledger(LedgerError::RemoteFailure(_))
        ));
    }
}
