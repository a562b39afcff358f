//! Hub-side command handlers: translate a locally-addressed `Command` into
//! the matching `Exchange` call. Stateless itself — all state lives in the
//! `Exchange` the caller hands in.

use xbridge_types::{Address, Command};
use xbridge_swap::{Exchange, Member, Outbound};

/// Feed one locally-addressed command into `exchange`. Commands that never
/// reach a hub (the client-side replies, chat, address book) are no-ops.
pub fn handle(exchange: &mut Exchange, from: Address, command: Command, now: u64, out: &dyn Outbound) {
    match command {
        Command::Transaction(b) => {
            let member = Member {
                order_id: b.order_id,
                src_addr: b.src_addr,
                src_currency: b.src_currency,
                src_amount: b.src_amount,
                dst_addr: b.dst_addr,
                dst_currency: b.dst_currency,
                dst_amount: b.dst_amount,
            };
            let outcome = exchange.on_transaction(member, now, out);
            tracing::debug!(?outcome, "xbcTransaction processed");
        }
        Command::TransactionHoldApply(b) => exchange.on_hold_apply(&b.hub_id, from, now, out),
        Command::TransactionInitialized(b) => exchange.on_initialized(&b.hub_id, from, now, out),
        Command::TransactionCreated(b) => {
            exchange.on_created(&b.hub_id, from, b.raw_pay, b.raw_revert, now, out)
        }
        Command::TransactionSigned(b) => exchange.on_signed(&b.hub_id, from, b.raw_tx, now, out),
        Command::TransactionCommited(b) => {
            exchange.on_commited(&b.hub_id, from, b.observed_tx_hash, now, out)
        }
        Command::ReceivedTransaction(b) => exchange.on_received_transaction(b.tx_hash, now, out),
        Command::TransactionCancel(b) => exchange.on_cancel(&b.id, now, out),
        _ => tracing::trace!("command has no hub-side handler"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbridge_swap::ports::MockOutbound;
    use xbridge_types::{Currency, TransactionBody};

    #[test]
    fn transaction_command_installs_a_pending_order() {
        let hub = Address::new([0xAA; 20]);
        let mut exchange = Exchange::new(hub, [Currency::new("BTC"), Currency::new("LTC")]);
        let out = MockOutbound::default();
        let command = Command::Transaction(TransactionBody {
            order_id: [1; 32],
            src_addr: Address::new([1; 20]),
            src_currency: Currency::new("BTC"),
            src_amount: 100,
            dst_addr: Address::new([2; 20]),
            dst_currency: Currency::new("LTC"),
            dst_amount: 200,
        });
        handle(&mut exchange, Address::new([1; 20]), command, 0, &out);
        assert_eq!(exchange.pending_len(), 1);
    }
}
