//! # Transaction Specs
//!
//! A `TransactionSpec` is the ledger-neutral description of a programmable
//! transaction: an ordered list of commands where later commands may refer
//! to the results of earlier ones by index. The signer turns it into
//! whatever the node accepts.
//!
//! ```text
//! TransactionBuilder::new("purchase")
//!     .split_gas(price)            -> result #0 (coin)
//!     .move_call(purchase_ticket)  -> result #1 (uses Result(0))
//!     .build()
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{Address, ObjectId};

/// Default gas budget, in smallest units.
pub const DEFAULT_GAS_BUDGET: u64 = 50_000_000;

/// A pure (non-object) argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PureArg {
    /// UTF-8 string, encoded as bytes on the ledger.
    String(String),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Account address.
    Address(Address),
}

/// An argument to a move call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallArg {
    /// Pure value.
    Pure(PureArg),
    /// Existing ledger object by id.
    Object(ObjectId),
    /// Result of an earlier command in the same transaction.
    Result(usize),
}

impl CallArg {
    /// Shorthand for a string argument.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Pure(PureArg::String(value.into()))
    }

    /// Shorthand for a u64 argument.
    pub fn u64(value: u64) -> Self {
        Self::Pure(PureArg::U64(value))
    }

    /// Shorthand for an address argument.
    pub fn address(value: Address) -> Self {
        Self::Pure(PureArg::Address(value))
    }

    /// Shorthand for an object argument.
    pub fn object(id: ObjectId) -> Self {
        Self::Object(id)
    }
}

/// A call into a published package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCall {
    /// Package id.
    pub package: ObjectId,
    /// Module name.
    pub module: String,
    /// Function name.
    pub function: String,
    /// Positional arguments.
    pub arguments: Vec<CallArg>,
}

impl MoveCall {
    /// `{package}::{module}::{function}`
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

/// One step of a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Split a coin of `amount` off the gas coin.
    SplitGas {
        /// Amount in smallest units.
        amount: u64,
    },
    /// Invoke a package function.
    MoveCall(MoveCall),
    /// Transfer the results of earlier commands to `recipient`.
    TransferObjects {
        /// Indices of the commands whose results are transferred.
        objects: Vec<usize>,
        /// Receiving address.
        recipient: Address,
    },
}

/// A complete, unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSpec {
    /// Operation name, for logs and metrics.
    pub label: String,
    /// Commands in execution order.
    pub commands: Vec<Command>,
    /// Gas budget in smallest units.
    pub gas_budget: u64,
}

impl TransactionSpec {
    /// Move calls in this transaction, in order.
    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    /// Every object id referenced directly by an argument.
    pub fn referenced_objects(&self) -> Vec<&ObjectId> {
        self.move_calls()
            .flat_map(|call| call.arguments.iter())
            .filter_map(|arg| match arg {
                CallArg::Object(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

/// Incremental builder for `TransactionSpec`.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    label: String,
    commands: Vec<Command>,
    gas_budget: u64,
}

impl TransactionBuilder {
    /// Start an empty transaction.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
            gas_budget: DEFAULT_GAS_BUDGET,
        }
    }

    /// Split `amount` off the gas coin. Returns the result index of the new coin.
    pub fn split_gas(&mut self, amount: u64) -> usize {
        self.push(Command::SplitGas { amount })
    }

    /// Append a move call. Returns its result index.
    pub fn move_call(
        &mut self,
        package: &ObjectId,
        module: &str,
        function: &str,
        arguments: Vec<CallArg>,
    ) -> usize {
        self.push(Command::MoveCall(MoveCall {
            package: package.clone(),
            module: module.to_string(),
            function: function.to_string(),
            arguments,
        }))
    }

    /// Transfer earlier results to `recipient`.
    pub fn transfer_objects(&mut self, objects: Vec<usize>, recipient: Address) -> &mut Self {
        self.commands
            .push(Command::TransferObjects { objects, recipient });
        self
    }

    /// Override the gas budget.
    pub fn gas_budget(&mut self, budget: u64) -> &mut Self {
        self.gas_budget = budget;
        self
    }

    /// Finish the transaction.
    pub fn build(self) -> TransactionSpec {
        TransactionSpec {
            label: self.label,
            commands: self.commands,
            gas_budget: self.gas_budget,
        }
    }

    fn push(&mut self, command: Command) -> usize {
        self.commands.push(command);
        self.commands.len() - 1
    }
}
