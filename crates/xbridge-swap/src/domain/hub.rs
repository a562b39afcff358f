//! Hub-side escrow state machine: matching, the two-sided ack advance, and
//! the TTL sweep that drives stalled swaps into rollback.

use std::collections::HashMap;

use xbridge_types::{
    Address, Currency, Hash256, HubIdBody, IdBody, TransactionCreateBody, TransactionHoldBody,
    TransactionInitBody, TransactionRollbackBody, TxPairBody, TxSingleBody,
};
use xbridge_types::Command;

use crate::ports::Outbound;

use super::fingerprint::{hash1, hash2, hub_id};

/// Seconds a pending order or a stalled swap is allowed to sit idle before
/// the sweep reclaims it. 150s in calibration; 600s is the production value.
pub const DEFAULT_TTL_SECS: u64 = 150;

const FIRST_LOCK_TIME_SECONDS: u32 = (DEFAULT_TTL_SECS * 2) as u32;
const FIRST_REVERT_DELAY_SECONDS: u32 = 24 * 3600;
const SECOND_LOCK_TIME_SECONDS: u32 = (DEFAULT_TTL_SECS * 4) as u32;
const SECOND_REVERT_DELAY_SECONDS: u32 = 48 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapState {
    Joined,
    Hold,
    Initialized,
    Created,
    Signed,
    Commited,
    Confirmed,
    Finished,
    Cancelled,
    Rollback,
}

impl SwapState {
    fn before_signed(self) -> bool {
        matches!(
            self,
            SwapState::Joined | SwapState::Hold | SwapState::Initialized | SwapState::Created
        )
    }

    fn is_terminal(self) -> bool {
        matches!(
            self,
            SwapState::Finished | SwapState::Cancelled | SwapState::Rollback
        )
    }
}

/// One party's side of an order: the addresses and currencies it declared.
/// `src_addr`/`src_currency`/`src_amount` is what the party pays from;
/// `dst_addr`/`dst_currency`/`dst_amount` is where it wants to receive the
/// counterparty's leg.
#[derive(Debug, Clone)]
pub struct Member {
    pub order_id: Hash256,
    pub src_addr: Address,
    pub src_currency: Currency,
    pub src_amount: u64,
    pub dst_addr: Address,
    pub dst_currency: Currency,
    pub dst_amount: u64,
}

impl Member {
    fn matches(a: &Member, b: &Member) -> bool {
        a.src_currency == b.dst_currency
            && a.dst_currency == b.src_currency
            && a.src_amount == b.dst_amount
            && a.dst_amount == b.src_amount
    }
}

/// An unmatched order sitting in the pending pool, waiting for a mirror.
#[derive(Debug, Clone)]
struct PendingOrder {
    member: Member,
    installed_at: u64,
}

/// A joined swap moving through the escrow state machine.
#[derive(Debug, Clone)]
pub struct Swap {
    pub hub_id: Hash256,
    pub state: SwapState,
    pub created_at: u64,
    pub last_advance: u64,
    pub first: Member,
    pub second: Member,
    first_acked: bool,
    second_acked: bool,
    first_raw_pay: Option<String>,
    first_raw_revert: Option<String>,
    second_raw_pay: Option<String>,
    second_raw_revert: Option<String>,
    first_raw_revert_signed: Option<String>,
    second_raw_revert_signed: Option<String>,
    first_awaiting_tx_hash: Option<Hash256>,
    second_awaiting_tx_hash: Option<Hash256>,
    first_confirmed: bool,
    second_confirmed: bool,
}

/// Outcome of feeding a fresh `xbcTransaction` order into the exchange.
#[derive(Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    /// No mirror existed yet; the order is now sitting in the pending pool.
    Pending,
    /// A stale mirror was evicted and this order took its place instead of
    /// joining it.
    ReplacedStale,
    /// The order refreshed an existing pending entry with the same id.
    Refreshed,
    /// A compatible mirror was found and a swap was joined.
    Joined(Hash256),
    /// Currency pair isn't enabled on this hub; order dropped.
    CurrencyNotEnabled,
}

/// Hub-side matching engine and escrow state machine. Holds the pending
/// pool and the table of active swaps; emits wire commands through an
/// [`Outbound`] as it advances.
pub struct Exchange {
    hub_address: Address,
    enabled: std::collections::HashSet<Currency>,
    ttl_secs: u64,
    pending: HashMap<Hash256, PendingOrder>,
    pending_by_fingerprint: HashMap<Hash256, Hash256>,
    active: HashMap<Hash256, Swap>,
}

impl Exchange {
    pub fn new(hub_address: Address, enabled: impl IntoIterator<Item = Currency>) -> Self {
        Self {
            hub_address,
            enabled: enabled.into_iter().collect(),
            ttl_secs: DEFAULT_TTL_SECS,
            pending: HashMap::new(),
            pending_by_fingerprint: HashMap::new(),
            active: HashMap::new(),
        }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn active_swap(&self, hub_id: &Hash256) -> Option<&Swap> {
        self.active.get(hub_id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Handle an incoming `xbcTransaction` order announcement.
    pub fn on_transaction(&mut self, order: Member, now: u64, out: &dyn Outbound) -> JoinOutcome {
        if !self.enabled.contains(&order.src_currency) || !self.enabled.contains(&order.dst_currency) {
            return JoinOutcome::CurrencyNotEnabled;
        }

        if let Some(existing) = self.pending.get_mut(&order.order_id) {
            existing.installed_at = now;
            return JoinOutcome::Refreshed;
        }

        let my_hash1 = hash1(
            order.src_currency,
            order.src_amount,
            order.dst_currency,
            order.dst_amount,
        );
        let seeking = hash2(
            order.src_currency,
            order.src_amount,
            order.dst_currency,
            order.dst_amount,
        );

        if let Some(&mirror_order_id) = self.pending_by_fingerprint.get(&seeking) {
            let mirror = self.pending.get(&mirror_order_id).expect("fingerprint index out of sync");
            if now.saturating_sub(mirror.installed_at) > self.ttl_secs {
                // Stale mirror: evict it and install the fresh order instead.
                self.remove_pending(&mirror_order_id);
                self.install_pending(order, my_hash1, now);
                return JoinOutcome::ReplacedStale;
            }

            if Member::matches(&mirror.member, &order) {
                let first = self.pending.remove(&mirror_order_id).unwrap().member;
                self.pending_by_fingerprint.remove(&hash1(
                    first.src_currency,
                    first.src_amount,
                    first.dst_currency,
                    first.dst_amount,
                ));
                let id = hub_id(&first.order_id, &order.order_id);
                let swap = Swap {
                    hub_id: id,
                    state: SwapState::Joined,
                    created_at: now,
                    last_advance: now,
                    first,
                    second: order,
                    first_acked: false,
                    second_acked: false,
                    first_raw_pay: None,
                    first_raw_revert: None,
                    second_raw_pay: None,
                    second_raw_revert: None,
                    first_raw_revert_signed: None,
                    second_raw_revert_signed: None,
                    first_awaiting_tx_hash: None,
                    second_awaiting_tx_hash: None,
                    first_confirmed: false,
                    second_confirmed: false,
                };
                self.active.insert(id, swap);
                self.emit_hold(&id, out);
                return JoinOutcome::Joined(id);
            }
        }

        self.install_pending(order, my_hash1, now);
        JoinOutcome::Pending
    }

    fn install_pending(&mut self, order: Member, fingerprint: Hash256, now: u64) {
        self.pending_by_fingerprint.insert(fingerprint, order.order_id);
        self.pending.insert(
            order.order_id,
            PendingOrder {
                member: order,
                installed_at: now,
            },
        );
    }

    fn remove_pending(&mut self, order_id: &Hash256) {
        if let Some(entry) = self.pending.remove(order_id) {
            let fp = hash1(
                entry.member.src_currency,
                entry.member.src_amount,
                entry.member.dst_currency,
                entry.member.dst_amount,
            );
            self.pending_by_fingerprint.remove(&fp);
        }
    }

    /// `xbcTransactionHoldApply` from `from_addr`.
    pub fn on_hold_apply(&mut self, hub_id: &Hash256, from_addr: Address, now: u64, out: &dyn Outbound) {
        let Some(swap) = self.active.get_mut(hub_id) else { return };
        if swap.state != SwapState::Joined {
            return;
        }
        if !Self::mark_ack(swap, from_addr, Role::Source) {
            return;
        }
        if swap.first_acked && swap.second_acked {
            Self::reset_acks(swap);
            swap.state = SwapState::Hold;
            swap.last_advance = now;
            self.emit_init(hub_id, out);
        }
    }

    /// `xbcTransactionInitialized` from `from_addr`.
    pub fn on_initialized(&mut self, hub_id: &Hash256, from_addr: Address, now: u64, out: &dyn Outbound) {
        let Some(swap) = self.active.get_mut(hub_id) else { return };
        if swap.state != SwapState::Hold {
            return;
        }
        if !Self::mark_ack(swap, from_addr, Role::Destination) {
            return;
        }
        if swap.first_acked && swap.second_acked {
            Self::reset_acks(swap);
            swap.state = SwapState::Initialized;
            swap.last_advance = now;
            self.emit_create(hub_id, out);
        }
    }

    /// `xbcTransactionCreated{rawPay,rawRevert}` from `from_addr`.
    pub fn on_created(
        &mut self,
        hub_id: &Hash256,
        from_addr: Address,
        raw_pay: String,
        raw_revert: String,
        now: u64,
        out: &dyn Outbound,
    ) {
        let Some(swap) = self.active.get_mut(hub_id) else { return };
        if swap.state != SwapState::Initialized {
            return;
        }
        if from_addr == swap.first.src_addr {
            swap.first_raw_pay = Some(raw_pay);
            swap.first_raw_revert = Some(raw_revert);
        } else if from_addr == swap.second.src_addr {
            swap.second_raw_pay = Some(raw_pay);
            swap.second_raw_revert = Some(raw_revert);
        } else {
            return;
        }
        if !Self::mark_ack(swap, from_addr, Role::Source) {
            return;
        }
        if swap.first_acked && swap.second_acked {
            Self::reset_acks(swap);
            swap.state = SwapState::Created;
            swap.last_advance = now;
            self.emit_sign(hub_id, out);
        }
    }

    /// `xbcTransactionSigned{rawRevertSigned}` from `from_addr`. The reply
    /// arrives from the counterparty's destination because the hub swapped
    /// sides when it sent `xbcTransactionSign`.
    pub fn on_signed(
        &mut self,
        hub_id: &Hash256,
        from_addr: Address,
        raw_revert_signed: String,
        now: u64,
        out: &dyn Outbound,
    ) {
        let Some(swap) = self.active.get_mut(hub_id) else { return };
        if swap.state != SwapState::Created {
            return;
        }
        if from_addr == swap.second.dst_addr {
            swap.first_raw_revert_signed = Some(raw_revert_signed);
            swap.second_acked = true;
        } else if from_addr == swap.first.dst_addr {
            swap.second_raw_revert_signed = Some(raw_revert_signed);
            swap.first_acked = true;
        } else {
            return;
        }
        if swap.first_acked && swap.second_acked {
            Self::reset_acks(swap);
            swap.state = SwapState::Signed;
            swap.last_advance = now;
            self.emit_commit(hub_id, out);
        }
    }

    /// `xbcTransactionCommited{observedTxHash}` from `from_addr`.
    pub fn on_commited(
        &mut self,
        hub_id: &Hash256,
        from_addr: Address,
        observed_tx_hash: Hash256,
        now: u64,
        out: &dyn Outbound,
    ) {
        let Some(swap) = self.active.get_mut(hub_id) else { return };
        if swap.state != SwapState::Signed {
            return;
        }
        if from_addr == swap.first.src_addr {
            swap.first_awaiting_tx_hash = Some(observed_tx_hash);
        } else if from_addr == swap.second.src_addr {
            swap.second_awaiting_tx_hash = Some(observed_tx_hash);
        } else {
            return;
        }
        if !Self::mark_ack(swap, from_addr, Role::Source) {
            return;
        }
        if swap.first_acked && swap.second_acked {
            Self::reset_acks(swap);
            swap.state = SwapState::Commited;
            swap.last_advance = now;
            out.unicast(
                swap.first.src_addr,
                Command::TransactionConfirm(HubIdBody {
                    dest: swap.first.src_addr,
                    hub: self.hub_address,
                    hub_id: *hub_id,
                }),
            );
            out.unicast(
                swap.second.src_addr,
                Command::TransactionConfirm(HubIdBody {
                    dest: swap.second.src_addr,
                    hub: self.hub_address,
                    hub_id: *hub_id,
                }),
            );
        }
    }

    /// `xbcReceivedTransaction{txHash}` from the wallet scanner. Matches
    /// against the hash each side reported in its `Commited` reply; an
    /// unknown or already-confirmed hash is a no-op.
    pub fn on_received_transaction(&mut self, tx_hash: Hash256, now: u64, out: &dyn Outbound) {
        let hub_ids: Vec<Hash256> = self.active.keys().copied().collect();
        for id in hub_ids {
            let swap = self.active.get_mut(&id).unwrap();
            if swap.state != SwapState::Commited {
                continue;
            }
            if swap.first_awaiting_tx_hash == Some(tx_hash) && !swap.first_confirmed {
                swap.first_confirmed = true;
            } else if swap.second_awaiting_tx_hash == Some(tx_hash) && !swap.second_confirmed {
                swap.second_confirmed = true;
            } else {
                continue;
            }
            if swap.first_confirmed && swap.second_confirmed {
                swap.state = SwapState::Confirmed;
                swap.last_advance = now;
                swap.state = SwapState::Finished;
                out.broadcast(Command::TransactionFinished(IdBody { id }));
            }
            return;
        }
    }

    /// Explicit `xbcTransactionCancel{id}`, either for an active swap or a
    /// still-unmatched pending order.
    pub fn on_cancel(&mut self, id: &Hash256, now: u64, out: &dyn Outbound) {
        if self.pending.contains_key(id) {
            self.remove_pending(id);
            return;
        }
        let Some(swap) = self.active.get_mut(id) else { return };
        if swap.state.is_terminal() {
            return;
        }
        if swap.state.before_signed() {
            swap.state = SwapState::Cancelled;
            swap.last_advance = now;
            out.broadcast(Command::TransactionCancel(IdBody { id: *id }));
        } else {
            self.rollback(id, now, out);
        }
    }

    /// Sweep pending orders and active swaps past their TTL. Expired
    /// pending orders are simply dropped; expired active swaps are rolled
    /// back regardless of how far they'd advanced.
    pub fn sweep(&mut self, now: u64, out: &dyn Outbound) {
        let expired_pending: Vec<Hash256> = self
            .pending
            .iter()
            .filter(|(_, p)| now.saturating_sub(p.installed_at) > self.ttl_secs)
            .map(|(id, _)| *id)
            .collect();
        for id in expired_pending {
            self.remove_pending(&id);
        }

        let expired_active: Vec<Hash256> = self
            .active
            .iter()
            .filter(|(_, s)| !s.state.is_terminal() && now.saturating_sub(s.last_advance) > self.ttl_secs)
            .map(|(id, _)| *id)
            .collect();
        for id in expired_active {
            self.rollback(&id, now, out);
        }
    }

    fn rollback(&mut self, id: &Hash256, now: u64, out: &dyn Outbound) {
        let Some(swap) = self.active.get_mut(id) else { return };
        out.unicast(
            swap.first.src_addr,
            Command::TransactionRollback(TransactionRollbackBody {
                dest: swap.first.src_addr,
                hub_id: *id,
            }),
        );
        out.unicast(
            swap.second.src_addr,
            Command::TransactionRollback(TransactionRollbackBody {
                dest: swap.second.src_addr,
                hub_id: *id,
            }),
        );
        out.broadcast(Command::TransactionCancel(IdBody { id: *id }));
        swap.state = SwapState::Rollback;
        swap.last_advance = now;
    }

    fn mark_ack(swap: &mut Swap, from_addr: Address, role: Role) -> bool {
        let first_addr = role.address_of(&swap.first);
        let second_addr = role.address_of(&swap.second);
        if from_addr == first_addr {
            swap.first_acked = true;
            true
        } else if from_addr == second_addr {
            swap.second_acked = true;
            true
        } else {
            false
        }
    }

    fn reset_acks(swap: &mut Swap) {
        swap.first_acked = false;
        swap.second_acked = false;
    }

    fn emit_hold(&self, hub_id: &Hash256, out: &dyn Outbound) {
        let swap = &self.active[hub_id];
        for m in [&swap.first, &swap.second] {
            out.unicast(
                m.src_addr,
                Command::TransactionHold(TransactionHoldBody {
                    dest: m.src_addr,
                    hub: self.hub_address,
                    old_order_id: m.order_id,
                    hub_id: *hub_id,
                }),
            );
        }
    }

    fn emit_init(&self, hub_id: &Hash256, out: &dyn Outbound) {
        let swap = &self.active[hub_id];
        for m in [&swap.first, &swap.second] {
            out.unicast(
                m.dst_addr,
                Command::TransactionInit(TransactionInitBody {
                    dest: m.dst_addr,
                    hub: self.hub_address,
                    hub_id: *hub_id,
                    from_addr: m.src_addr,
                    from_currency: m.src_currency,
                    from_amount: m.src_amount,
                    to_addr: m.dst_addr,
                    to_currency: m.dst_currency,
                    to_amount: m.dst_amount,
                }),
            );
        }
    }

    fn emit_create(&self, hub_id: &Hash256, out: &dyn Outbound) {
        let swap = &self.active[hub_id];
        out.unicast(
            swap.first.src_addr,
            Command::TransactionCreate(TransactionCreateBody {
                dest: swap.first.src_addr,
                hub: self.hub_address,
                hub_id: *hub_id,
                counterparty_dest_addr: swap.second.dst_addr,
                lock_time_seconds: FIRST_LOCK_TIME_SECONDS,
                revert_delay_seconds: FIRST_REVERT_DELAY_SECONDS,
            }),
        );
        out.unicast(
            swap.second.src_addr,
            Command::TransactionCreate(TransactionCreateBody {
                dest: swap.second.src_addr,
                hub: self.hub_address,
                hub_id: *hub_id,
                counterparty_dest_addr: swap.first.dst_addr,
                lock_time_seconds: SECOND_LOCK_TIME_SECONDS,
                revert_delay_seconds: SECOND_REVERT_DELAY_SECONDS,
            }),
        );
    }

    fn emit_sign(&self, hub_id: &Hash256, out: &dyn Outbound) {
        let swap = &self.active[hub_id];
        let (Some(first_pay), Some(first_revert)) = (&swap.first_raw_pay, &swap.first_raw_revert) else {
            return;
        };
        let (Some(second_pay), Some(second_revert)) = (&swap.second_raw_pay, &swap.second_raw_revert) else {
            return;
        };
        // Swap sides: each destination signs the counterparty's revert.
        out.unicast(
            swap.second.dst_addr,
            Command::TransactionSign(TxPairBody {
                dest: swap.second.dst_addr,
                hub: self.hub_address,
                hub_id: *hub_id,
                raw_pay: first_pay.clone(),
                raw_revert: first_revert.clone(),
            }),
        );
        out.unicast(
            swap.first.dst_addr,
            Command::TransactionSign(TxPairBody {
                dest: swap.first.dst_addr,
                hub: self.hub_address,
                hub_id: *hub_id,
                raw_pay: second_pay.clone(),
                raw_revert: second_revert.clone(),
            }),
        );
    }

    fn emit_commit(&self, hub_id: &Hash256, out: &dyn Outbound) {
        let swap = &self.active[hub_id];
        if let Some(signed) = &swap.first_raw_revert_signed {
            out.unicast(
                swap.first.src_addr,
                Command::TransactionCommit(TxSingleBody {
                    dest: swap.first.src_addr,
                    hub: self.hub_address,
                    hub_id: *hub_id,
                    raw_tx: signed.clone(),
                }),
            );
        }
        if let Some(signed) = &swap.second_raw_revert_signed {
            out.unicast(
                swap.second.src_addr,
                Command::TransactionCommit(TxSingleBody {
                    dest: swap.second.src_addr,
                    hub: self.hub_address,
                    hub_id: *hub_id,
                    raw_tx: signed.clone(),
                }),
            );
        }
    }
}

#[derive(Clone, Copy)]
enum Role {
    Source,
    Destination,
}

impl Role {
    fn address_of(self, m: &Member) -> Address {
        match self {
            Role::Source => m.src_addr,
            Role::Destination => m.dst_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockOutbound;

    fn addr(b: u8) -> Address {
        Address::new([b; 20])
    }

    fn member(order_id: u8, src_addr: u8, dst_addr: u8, src_cur: &str, src_amt: u64, dst_cur: &str, dst_amt: u64) -> Member {
        Member {
            order_id: [order_id; 32],
            src_addr: addr(src_addr),
            src_currency: Currency::new(src_cur),
            src_amount: src_amt,
            dst_addr: addr(dst_addr),
            dst_currency: Currency::new(dst_cur),
            dst_amount: dst_amt,
        }
    }

    fn exchange() -> Exchange {
        Exchange::new(addr(99), [Currency::new("BTC"), Currency::new("LTC")])
    }

    #[test]
    fn unmatched_order_sits_pending() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        let outcome = ex.on_transaction(member(1, 1, 2, "BTC", 100, "LTC", 5000), 0, &out);
        assert_eq!(outcome, JoinOutcome::Pending);
        assert_eq!(ex.pending_len(), 1);
    }

    #[test]
    fn duplicate_order_id_refreshes_instead_of_duplicating() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        ex.on_transaction(member(1, 1, 2, "BTC", 100, "LTC", 5000), 0, &out);
        let outcome = ex.on_transaction(member(1, 1, 2, "BTC", 100, "LTC", 5000), 10, &out);
        assert_eq!(outcome, JoinOutcome::Refreshed);
        assert_eq!(ex.pending_len(), 1);
    }

    #[test]
    fn mirrored_orders_join_and_emit_hold_to_both_sources() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        ex.on_transaction(member(1, 1, 2, "BTC", 100, "LTC", 5000), 0, &out);
        let outcome = ex.on_transaction(member(2, 3, 4, "LTC", 5000, "BTC", 100), 1, &out);
        let JoinOutcome::Joined(hub_id) = outcome else {
            panic!("expected join, got {outcome:?}")
        };
        let swap = ex.active_swap(&hub_id).unwrap();
        assert_eq!(swap.state, SwapState::Joined);
        let log = out.unicast_log.lock();
        assert_eq!(log.len(), 2);
        assert!(log.iter().any(|(to, _)| *to == addr(1)));
        assert!(log.iter().any(|(to, _)| *to == addr(3)));
    }

    #[test]
    fn currency_not_enabled_is_rejected() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        let outcome = ex.on_transaction(member(1, 1, 2, "BTC", 100, "ETH", 5000), 0, &out);
        assert_eq!(outcome, JoinOutcome::CurrencyNotEnabled);
        assert_eq!(ex.pending_len(), 0);
    }

    #[test]
    fn stale_pending_is_evicted_before_join() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        ex.on_transaction(member(1, 1, 2, "BTC", 100, "LTC", 5000), 0, &out);
        // Mirror arrives long after the pending order's TTL expired.
        let outcome = ex.on_transaction(member(2, 3, 4, "LTC", 5000, "BTC", 100), 1000, &out);
        assert_eq!(outcome, JoinOutcome::ReplacedStale);
        assert_eq!(ex.pending_len(), 1);
    }

    fn join(ex: &mut Exchange, out: &MockOutbound) -> Hash256 {
        ex.on_transaction(member(1, 1, 2, "BTC", 100, "LTC", 5000), 0, out);
        match ex.on_transaction(member(2, 3, 4, "LTC", 5000, "BTC", 100), 1, out) {
            JoinOutcome::Joined(id) => id,
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn full_happy_path_reaches_finished() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        let id = join(&mut ex, &out);

        ex.on_hold_apply(&id, addr(1), 2, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Joined);
        ex.on_hold_apply(&id, addr(3), 2, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Hold);

        ex.on_initialized(&id, addr(2), 3, &out);
        ex.on_initialized(&id, addr(4), 3, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Initialized);

        ex.on_created(&id, addr(1), "pay1".into(), "revert1".into(), 4, &out);
        ex.on_created(&id, addr(3), "pay2".into(), "revert2".into(), 4, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Created);

        ex.on_signed(&id, addr(4), "revert1signed".into(), 5, &out);
        ex.on_signed(&id, addr(2), "revert2signed".into(), 5, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Signed);

        ex.on_commited(&id, addr(1), [0xAA; 32], 6, &out);
        ex.on_commited(&id, addr(3), [0xBB; 32], 6, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Commited);

        ex.on_received_transaction([0xAA; 32], 7, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Commited);
        ex.on_received_transaction([0xBB; 32], 7, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Finished);

        assert!(out
            .broadcast_log
            .lock()
            .iter()
            .any(|c| matches!(c, Command::TransactionFinished(b) if b.id == id)));
    }

    #[test]
    fn duplicate_confirmation_hash_is_a_no_op() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        let id = join(&mut ex, &out);
        ex.on_hold_apply(&id, addr(1), 2, &out);
        ex.on_hold_apply(&id, addr(3), 2, &out);
        ex.on_initialized(&id, addr(2), 3, &out);
        ex.on_initialized(&id, addr(4), 3, &out);
        ex.on_created(&id, addr(1), "p1".into(), "r1".into(), 4, &out);
        ex.on_created(&id, addr(3), "p2".into(), "r2".into(), 4, &out);
        ex.on_signed(&id, addr(4), "rs1".into(), 5, &out);
        ex.on_signed(&id, addr(2), "rs2".into(), 5, &out);
        ex.on_commited(&id, addr(1), [0xAA; 32], 6, &out);
        ex.on_commited(&id, addr(3), [0xBB; 32], 6, &out);

        ex.on_received_transaction([0xAA; 32], 7, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Commited);
        // Duplicate of the already-confirmed hash: no-op.
        ex.on_received_transaction([0xAA; 32], 8, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Commited);
        ex.on_received_transaction([0xBB; 32], 9, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Finished);
    }

    #[test]
    fn ack_from_foreign_address_is_ignored() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        let id = join(&mut ex, &out);
        ex.on_hold_apply(&id, addr(200), 2, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Joined);
    }

    #[test]
    fn wrong_predecessor_ack_is_ignored() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        let id = join(&mut ex, &out);
        // Initialized arrives before Hold completed: wrong predecessor state.
        ex.on_initialized(&id, addr(2), 2, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Joined);
    }

    #[test]
    fn ttl_expiry_mid_flight_drives_rollback() {
        let mut ex = Exchange::new(addr(99), [Currency::new("BTC"), Currency::new("LTC")])
            .with_ttl_secs(150);
        let out = MockOutbound::default();
        let id = join(&mut ex, &out);
        ex.on_hold_apply(&id, addr(1), 2, &out);
        ex.on_hold_apply(&id, addr(3), 2, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Hold);

        ex.sweep(2 + 151, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Rollback);
        assert!(out
            .unicast_log
            .lock()
            .iter()
            .any(|(_, c)| matches!(c, Command::TransactionRollback(_))));
    }

    #[test]
    fn cancel_before_signed_needs_no_rollback_messages() {
        let mut ex = exchange();
        let out = MockOutbound::default();
        let id = join(&mut ex, &out);
        ex.on_cancel(&id, 5, &out);
        assert_eq!(ex.active_swap(&id).unwrap().state, SwapState::Cancelled);
        assert!(out.unicast_log.lock().iter().all(|(_, c)| !matches!(c, Command::TransactionRollback(_))));
    }
}
