//! In-memory ledger.
//!
//! A deterministic stand-in for a full node running the marketplace
//! package. It executes `TransactionSpec`s with the package's abort rules
//! and answers reads from the same state, so application services can be
//! exercised end to end without a network.
//!
//! Execution is atomic: commands run against a working copy that is
//! committed only when every command succeeds. Gas is charged either way.

use crate::domain::{
    CallArg, Command, GatewayError, MoveCall, ObjectOwner, PureArg, RawObject, TransactionSpec,
};
use crate::ports::outbound::{LedgerGateway, TransactionSigner};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use shared_types::{Address, MarketplaceConfig, ObjectId, ObjectTypes};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Gas charged per executed transaction.
pub const GAS_PER_TRANSACTION: u64 = 1_000_000;

#[derive(Debug, Clone, Default)]
struct LedgerState {
    objects: BTreeMap<ObjectId, RawObject>,
    balances: HashMap<Address, u64>,
    next_object: u64,
}

impl LedgerState {
    fn fresh_id(&mut self) -> ObjectId {
        self.next_object += 1;
        ObjectId::new(format!("0x{:064x}", self.next_object))
    }

    fn credit(&mut self, owner: &Address, amount: u64) {
        let balance = self.balances.entry(owner.clone()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }
}

/// Value produced by a command.
#[derive(Debug, Clone, PartialEq)]
enum CommandResult {
    Nothing,
    Object(ObjectId),
    Coin(u64),
    Consumed,
}

/// A Move abort raised by a package function.
#[derive(Debug)]
struct Abort(&'static str);

/// Marketplace ledger held in memory.
pub struct InMemoryLedger {
    types: ObjectTypes,
    admin: Address,
    escrow_admin_cap_id: ObjectId,
    state: Mutex<LedgerState>,
    transactions: Mutex<u64>,
    offline: AtomicBool,
}

impl InMemoryLedger {
    /// Create a ledger with the package published at `package_id`. The
    /// escrow admin capability is created and owned by `admin`.
    pub fn new(package_id: ObjectId, admin: Address, escrow_admin_cap_id: ObjectId) -> Self {
        let types = ObjectTypes::for_package(&package_id);
        let mut state = LedgerState::default();
        state.objects.insert(
            escrow_admin_cap_id.clone(),
            RawObject {
                object_id: escrow_admin_cap_id.clone(),
                version: 1,
                object_type: types.escrow_admin_cap.clone(),
                owner: ObjectOwner::Address(admin.clone()),
                fields: Map::new(),
            },
        );
        Self {
            types,
            admin,
            escrow_admin_cap_id,
            state: Mutex::new(state),
            transactions: Mutex::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Create a ledger matching a client configuration.
    pub fn from_config(config: &MarketplaceConfig) -> Self {
        Self::new(
            config.package_id.clone(),
            config.admin_address.clone(),
            config.escrow_admin_cap_id.clone(),
        )
    }

    /// Marketplace struct types of the published package.
    pub fn object_types(&self) -> &ObjectTypes {
        &self.types
    }

    /// Id of the escrow admin capability.
    pub fn escrow_admin_cap_id(&self) -> &ObjectId {
        &self.escrow_admin_cap_id
    }

    /// Add gas to an account.
    pub fn fund(&self, owner: &Address, amount: u64) {
        self.state.lock().credit(owner, amount);
    }

    /// Current gas balance of an account.
    pub fn balance(&self, owner: &Address) -> u64 {
        self.state.lock().balances.get(owner).copied().unwrap_or(0)
    }

    /// Snapshot of an object.
    pub fn object(&self, id: &ObjectId) -> Option<RawObject> {
        self.state.lock().objects.get(id).cloned()
    }

    /// Store an object directly, bypassing execution.
    pub fn insert_object(&self, object: RawObject) {
        self.state
            .lock()
            .objects
            .insert(object.object_id.clone(), object);
    }

    /// Make every read fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Transport("ledger unreachable".to_string()))
        } else {
            Ok(())
        }
    }

    fn next_digest(&self) -> String {
        let mut count = self.transactions.lock();
        *count += 1;
        format!("TX{:016X}", *count)
    }

    /// Execute `spec` as `sender` and return a node-shaped execution
    /// response.
    ///
    /// Missing input objects and insufficient gas are rejected before
    /// execution (`Err`). Aborts produce a response with failure status.
    pub fn execute(&self, sender: &Address, spec: &TransactionSpec) -> Result<Value, GatewayError> {
        self.check_online()?;
        let mut state = self.state.lock();

        for id in spec.referenced_objects() {
            if !state.objects.contains_key(id) {
                return Err(GatewayError::ObjectNotFound(id.clone()));
            }
        }

        let split_total: u64 = spec
            .commands
            .iter()
            .map(|c| match c {
                Command::SplitGas { amount } => *amount,
                _ => 0,
            })
            .fold(0u64, u64::saturating_add);
        let required = split_total.saturating_add(GAS_PER_TRANSACTION);
        let available = state.balances.get(sender).copied().unwrap_or(0);
        if available < required {
            return Err(GatewayError::Rpc {
                code: -32002,
                message: format!(
                    "Insufficient gas: balance {} below required {}",
                    available, required
                ),
            });
        }

        let digest = self.next_digest();
        let mut working = state.clone();
        let outcome = self.run_commands(&mut working, sender, spec);

        match outcome {
            Ok(created) => {
                *state = working;
                if let Some(balance) = state.balances.get_mut(sender) {
                    *balance = balance.saturating_sub(GAS_PER_TRANSACTION);
                }
                debug!(
                    "[tl-01] in-memory '{}' executed as {} ({} created)",
                    spec.label,
                    sender,
                    created.len()
                );
                let created: Vec<&RawObject> = created
                    .iter()
                    .filter_map(|id| state.objects.get(id))
                    .collect();
                Ok(success_response(&digest, sender, &created))
            }
            Err((index, call, abort)) => {
                if let Some(balance) = state.balances.get_mut(sender) {
                    *balance = balance.saturating_sub(GAS_PER_TRANSACTION);
                }
                let error = format!(
                    "MoveAbort in {}::{}: {} in command {}",
                    call.module, call.function, abort.0, index
                );
                debug!("[tl-01] in-memory '{}' aborted: {}", spec.label, error);
                Ok(json!({
                    "digest": digest,
                    "effects": { "status": { "status": "failure", "error": error } }
                }))
            }
        }
    }

    fn run_commands(
        &self,
        state: &mut LedgerState,
        sender: &Address,
        spec: &TransactionSpec,
    ) -> Result<Vec<ObjectId>, (usize, MoveCall, Abort)> {
        let mut results: Vec<CommandResult> = Vec::with_capacity(spec.commands.len());
        let mut created = Vec::new();

        for (index, command) in spec.commands.iter().enumerate() {
            let result = match command {
                Command::SplitGas { amount } => {
                    if let Some(balance) = state.balances.get_mut(sender) {
                        *balance = balance.saturating_sub(*amount);
                    }
                    CommandResult::Coin(*amount)
                }
                Command::MoveCall(call) => self
                    .dispatch(state, sender, call, &mut results, &mut created)
                    .map_err(|abort| (index, call.clone(), abort))?,
                Command::TransferObjects { objects, recipient } => {
                    for source in objects {
                        match results.get_mut(*source).map(take) {
                            Some(CommandResult::Object(id)) => {
                                if let Some(object) = state.objects.get_mut(&id) {
                                    object.owner = ObjectOwner::Address(recipient.clone());
                                    object.version += 1;
                                }
                            }
                            Some(CommandResult::Coin(value)) => state.credit(recipient, value),
                            _ => {
                                return Err((index, transfer_call(), Abort("EINVALID_TRANSFER")))
                            }
                        }
                    }
                    CommandResult::Nothing
                }
            };
            results.push(result);
        }

        // Unused split coins go back to the sender.
        for result in results {
            if let CommandResult::Coin(value) = result {
                state.credit(sender, value);
            }
        }
        Ok(created)
    }

    fn dispatch(
        &self,
        state: &mut LedgerState,
        sender: &Address,
        call: &MoveCall,
        results: &mut [CommandResult],
        created: &mut Vec<ObjectId>,
    ) -> Result<CommandResult, Abort> {
        let args = &call.arguments;
        match (call.module.as_str(), call.function.as_str()) {
            ("ticket", "mint_ticket") => {
                let event_name = pure_string(args, 0)?;
                let event_date = pure_string(args, 1)?;
                let artifact_ref = pure_string(args, 2)?;
                let verified = self.holds_verified_profile(state, sender);
                let id = self.create(
                    state,
                    created,
                    self.types.ticket.clone(),
                    ObjectOwner::Address(sender.clone()),
                    json!({
                        "event_name": utf8_bytes(&event_name),
                        "event_date": utf8_bytes(&event_date),
                        "ipfs_cid": utf8_bytes(&artifact_ref),
                        "original_issuer_verified": verified,
                    }),
                );
                Ok(CommandResult::Object(id))
            }
            ("ticket", "list_ticket") => {
                let ticket_id = object_arg(args, 0)?;
                let profile_id = object_arg(args, 1)?;
                let price = pure_u64(args, 2)?;

                let profile = state.objects.get(&profile_id).ok_or(Abort("EINVALID_ARGUMENT"))?;
                let profile_ok = profile.object_type == self.types.seller_profile
                    && profile.fields.get("verified_badge") == Some(&Value::Bool(true))
                    && profile.fields.get("seller_address").and_then(Value::as_str)
                        == Some(sender.as_str());
                if !profile_ok {
                    return Err(Abort("ESELLER_NOT_VERIFIED"));
                }
                let ticket = state.objects.get(&ticket_id).ok_or(Abort("EINVALID_ARGUMENT"))?;
                if ticket.object_type != self.types.ticket {
                    return Err(Abort("EINVALID_ARGUMENT"));
                }
                if ticket.owner.address() != Some(sender) {
                    return Err(Abort("ENOT_OWNER"));
                }
                if price == 0 {
                    return Err(Abort("EINVALID_PRICE"));
                }
                let id = self.create(
                    state,
                    created,
                    self.types.listing.clone(),
                    ObjectOwner::Address(sender.clone()),
                    json!({
                        "ticket_id": ticket_id.as_str(),
                        "seller_address": sender.as_str(),
                        "price": price.to_string(),
                    }),
                );
                Ok(CommandResult::Object(id))
            }
            ("ticket", "grant_seller_badge") => {
                let admin = pure_address(args, 0)?;
                let seller = pure_address(args, 1)?;
                if *sender != self.admin || admin != self.admin {
                    return Err(Abort("ENOT_ADMIN"));
                }
                let id = self.create(
                    state,
                    created,
                    self.types.seller_profile.clone(),
                    ObjectOwner::Address(sender.clone()),
                    json!({ "seller_address": seller.as_str(), "verified_badge": true }),
                );
                Ok(CommandResult::Object(id))
            }
            ("ticket", "purchase_ticket") => {
                let listing_id = object_arg(args, 0)?;
                let ticket_id = object_arg(args, 1)?;
                let payment = coin_arg(args, 2, results)?;

                let listing = state.objects.get(&listing_id).ok_or(Abort("EINVALID_ARGUMENT"))?;
                if listing.object_type != self.types.listing {
                    return Err(Abort("EINVALID_ARGUMENT"));
                }
                if listing.fields.get("ticket_id").and_then(Value::as_str)
                    != Some(ticket_id.as_str())
                {
                    return Err(Abort("ETICKET_ID_MISMATCH"));
                }
                let price = listing
                    .fields
                    .get("price")
                    .and_then(Value::as_str)
                    .and_then(|p| p.parse::<u64>().ok())
                    .ok_or(Abort("EINVALID_ARGUMENT"))?;
                if payment != price {
                    return Err(Abort("EWRONG_PAYMENT_AMOUNT"));
                }
                let seller = listing
                    .fields
                    .get("seller_address")
                    .and_then(Value::as_str)
                    .map(Address::new)
                    .ok_or(Abort("EINVALID_ARGUMENT"))?;

                let ticket = state
                    .objects
                    .get_mut(&ticket_id)
                    .ok_or(Abort("EINVALID_ARGUMENT"))?;
                ticket.owner = ObjectOwner::Address(sender.clone());
                ticket.version += 1;
                state.objects.remove(&listing_id);

                self.create(
                    state,
                    created,
                    self.types.escrow.clone(),
                    ObjectOwner::Shared,
                    json!({
                        "seller": seller.as_str(),
                        "buyer": sender.as_str(),
                        "ticket_id": ticket_id.as_str(),
                        "status": 0,
                        "payment": {
                            "type": "0x2::balance::Balance<0x2::sui::SUI>",
                            "fields": { "balance": payment.to_string() }
                        },
                    }),
                );
                Ok(CommandResult::Nothing)
            }
            ("ticket_escrow", "confirm_and_release") => {
                let escrow_id = object_arg(args, 0)?;
                let escrow = self.escrow_mut(state, &escrow_id)?;
                if escrow.fields.get("buyer").and_then(Value::as_str) != Some(sender.as_str()) {
                    return Err(Abort("ENOT_BUYER"));
                }
                let (seller, amount) = settle(escrow, 1)?;
                state.credit(&seller, amount);
                Ok(CommandResult::Nothing)
            }
            ("ticket_escrow", "refund") => {
                let escrow_id = object_arg(args, 0)?;
                let cap_id = object_arg(args, 1)?;
                let cap = state.objects.get(&cap_id).ok_or(Abort("EINVALID_ARGUMENT"))?;
                if cap.object_type != self.types.escrow_admin_cap
                    || cap.owner.address() != Some(sender)
                {
                    return Err(Abort("ENOT_ADMIN"));
                }
                let escrow = self.escrow_mut(state, &escrow_id)?;
                let buyer = escrow
                    .fields
                    .get("buyer")
                    .and_then(Value::as_str)
                    .map(Address::new)
                    .ok_or(Abort("EINVALID_ARGUMENT"))?;
                let (_, amount) = settle(escrow, 2)?;
                state.credit(&buyer, amount);
                Ok(CommandResult::Nothing)
            }
            _ => Err(Abort("EFUNCTION_NOT_FOUND")),
        }
    }

    fn create(
        &self,
        state: &mut LedgerState,
        created: &mut Vec<ObjectId>,
        object_type: String,
        owner: ObjectOwner,
        fields: Value,
    ) -> ObjectId {
        let id = state.fresh_id();
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        state.objects.insert(
            id.clone(),
            RawObject {
                object_id: id.clone(),
                version: 1,
                object_type,
                owner,
                fields,
            },
        );
        created.push(id.clone());
        id
    }

    fn holds_verified_profile(&self, state: &LedgerState, owner: &Address) -> bool {
        state.objects.values().any(|o| {
            o.object_type == self.types.seller_profile
                && o.owner.address() == Some(owner)
                && o.fields.get("verified_badge") == Some(&Value::Bool(true))
        })
    }

    fn escrow_mut<'a>(
        &self,
        state: &'a mut LedgerState,
        id: &ObjectId,
    ) -> Result<&'a mut RawObject, Abort> {
        let escrow = state.objects.get_mut(id).ok_or(Abort("EINVALID_ARGUMENT"))?;
        if escrow.object_type != self.types.escrow {
            return Err(Abort("EINVALID_ARGUMENT"));
        }
        Ok(escrow)
    }
}

/// Move a pending escrow to `status`. Returns the seller and held amount.
fn settle(escrow: &mut RawObject, status: u64) -> Result<(Address, u64), Abort> {
    if escrow.fields.get("status").and_then(Value::as_u64) != Some(0) {
        return Err(Abort("EESCROW_NOT_PENDING"));
    }
    let amount = escrow
        .fields
        .get("payment")
        .and_then(|p| p.get("fields"))
        .and_then(|f| f.get("balance"))
        .and_then(Value::as_str)
        .and_then(|b| b.parse::<u64>().ok())
        .ok_or(Abort("EINVALID_ARGUMENT"))?;
    let seller = escrow
        .fields
        .get("seller")
        .and_then(Value::as_str)
        .map(Address::new)
        .ok_or(Abort("EINVALID_ARGUMENT"))?;
    escrow.fields.insert("status".to_string(), json!(status));
    escrow.version += 1;
    Ok((seller, amount))
}

/// Take a command result, leaving it consumed.
fn take(slot: &mut CommandResult) -> CommandResult {
    std::mem::replace(slot, CommandResult::Consumed)
}

fn transfer_call() -> MoveCall {
    MoveCall {
        package: ObjectId::new("0x2"),
        module: "transfer".to_string(),
        function: "transfer_objects".to_string(),
        arguments: Vec::new(),
    }
}

fn utf8_bytes(s: &str) -> Value {
    Value::Array(s.bytes().map(|b| json!(b)).collect())
}

fn arg(args: &[CallArg], index: usize) -> Result<&CallArg, Abort> {
    args.get(index).ok_or(Abort("EINVALID_ARGUMENT"))
}

fn object_arg(args: &[CallArg], index: usize) -> Result<ObjectId, Abort> {
    match arg(args, index)? {
        CallArg::Object(id) => Ok(id.clone()),
        _ => Err(Abort("EINVALID_ARGUMENT")),
    }
}

fn pure_string(args: &[CallArg], index: usize) -> Result<String, Abort> {
    match arg(args, index)? {
        CallArg::Pure(PureArg::String(s)) => Ok(s.clone()),
        _ => Err(Abort("EINVALID_ARGUMENT")),
    }
}

fn pure_u64(args: &[CallArg], index: usize) -> Result<u64, Abort> {
    match arg(args, index)? {
        CallArg::Pure(PureArg::U64(v)) => Ok(*v),
        _ => Err(Abort("EINVALID_ARGUMENT")),
    }
}

fn pure_address(args: &[CallArg], index: usize) -> Result<Address, Abort> {
    match arg(args, index)? {
        CallArg::Pure(PureArg::Address(a)) => Ok(a.clone()),
        _ => Err(Abort("EINVALID_ARGUMENT")),
    }
}

fn coin_arg(args: &[CallArg], index: usize, results: &mut [CommandResult]) -> Result<u64, Abort> {
    match arg(args, index)? {
        CallArg::Result(source) => match results.get_mut(*source) {
            Some(slot) => match take(slot) {
                CommandResult::Coin(value) => Ok(value),
                _ => Err(Abort("EINVALID_ARGUMENT")),
            },
            None => Err(Abort("EINVALID_ARGUMENT")),
        },
        _ => Err(Abort("EINVALID_ARGUMENT")),
    }
}

fn success_response(digest: &str, sender: &Address, created: &[&RawObject]) -> Value {
    let changes: Vec<Value> = created
        .iter()
        .map(|o| {
            json!({
                "type": "created",
                "sender": sender.as_str(),
                "owner": o.owner.to_rpc(),
                "objectType": o.object_type,
                "objectId": o.object_id.as_str(),
                "version": o.version.to_string(),
            })
        })
        .collect();
    let effects_created: Vec<Value> = created
        .iter()
        .map(|o| {
            json!({
                "owner": o.owner.to_rpc(),
                "reference": { "objectId": o.object_id.as_str(), "version": o.version }
            })
        })
        .collect();
    json!({
        "digest": digest,
        "effects": { "status": { "status": "success" }, "created": effects_created },
        "objectChanges": changes,
    })
}

#[async_trait]
impl LedgerGateway for InMemoryLedger {
    async fn read_object(&self, id: &ObjectId) -> Result<Option<RawObject>, GatewayError> {
        self.check_online()?;
        Ok(self.object(id))
    }

    async fn read_owned_objects(
        &self,
        owner: &Address,
        struct_type: &str,
    ) -> Result<Vec<RawObject>, GatewayError> {
        self.check_online()?;
        Ok(self
            .state
            .lock()
            .objects
            .values()
            .filter(|o| o.object_type == struct_type && o.owner.address() == Some(owner))
            .cloned()
            .collect())
    }

    async fn query_objects(&self, struct_type: &str) -> Result<Vec<RawObject>, GatewayError> {
        self.check_online()?;
        Ok(self
            .state
            .lock()
            .objects
            .values()
            .filter(|o| o.object_type == struct_type)
            .cloned()
            .collect())
    }

    async fn get_balance(&self, owner: &Address) -> Result<u64, GatewayError> {
        self.check_online()?;
        Ok(self.balance(owner))
    }
}

/// Signer acting as one address against an `InMemoryLedger`.
pub struct InMemoryWallet {
    address: Address,
    ledger: Arc<InMemoryLedger>,
    rejecting: AtomicBool,
}

impl InMemoryWallet {
    /// Wallet for `address` on `ledger`.
    pub fn new(ledger: Arc<InMemoryLedger>, address: Address) -> Self {
        Self {
            address,
            ledger,
            rejecting: AtomicBool::new(false),
        }
    }

    /// Refuse every signing request, as a user dismissing the prompt.
    pub fn reject_signing(&self, reject: bool) {
        self.rejecting.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl TransactionSigner for InMemoryWallet {
    fn address(&self) -> Address {
        self.address.clone()
    }

    async fn sign_and_execute(&self, tx: &TransactionSpec) -> Result<Value, GatewayError> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(GatewayError::SignatureRejected(
                "User rejected the request".to_string(),
            ));
        }
        self.ledger.execute(&self.address, tx)
    }
}
