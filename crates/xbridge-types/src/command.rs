//! # Command Vocabulary
//!
//! Every packet body is the encoding of exactly one `Command` variant. This
//! replaces the source protocol's accreted byte buffer with a typed sum
//! type: one `encode`/`decode` pair per variant, matched exhaustively by
//! `CommandCode`, so adding a command that nobody handles is a compile
//! error rather than a silent drop.
//!
//! Field layouts are reproduced byte-for-byte from the wire specification;
//! see the module-level doc on each struct for the exact byte ranges.

use crate::errors::PacketError;
use crate::ids::{Address, Hash256, HASH_LEN, ID_LEN};
use crate::currency::{Currency, CURRENCY_LEN};

/// Numeric command discriminants. Values are part of the wire contract and
/// must never be renumbered once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum CommandCode {
    Invalid = 0,
    AnnounceAddresses = 1,
    XChatMessage = 2,
    AddressBookEntry = 3,
    ExchangeWallets = 4,
    PendingTransaction = 5,
    Transaction = 6,
    TransactionHold = 7,
    TransactionHoldApply = 8,
    TransactionInit = 9,
    TransactionInitialized = 10,
    TransactionCreate = 11,
    TransactionCreated = 12,
    TransactionSign = 13,
    TransactionSigned = 14,
    TransactionCommit = 15,
    TransactionCommited = 16,
    TransactionConfirm = 17,
    TransactionFinished = 18,
    TransactionCancel = 19,
    TransactionRollback = 20,
    TransactionDropped = 21,
    ReceivedTransaction = 22,
}

impl CommandCode {
    /// Map a numeric discriminant from the wire back to a `CommandCode`.
    pub fn from_u32(value: u32) -> Option<Self> {
        use CommandCode::*;
        let all = [
            Invalid,
            AnnounceAddresses,
            XChatMessage,
            AddressBookEntry,
            ExchangeWallets,
            PendingTransaction,
            Transaction,
            TransactionHold,
            TransactionHoldApply,
            TransactionInit,
            TransactionInitialized,
            TransactionCreate,
            TransactionCreated,
            TransactionSign,
            TransactionSigned,
            TransactionCommit,
            TransactionCommited,
            TransactionConfirm,
            TransactionFinished,
            TransactionCancel,
            TransactionRollback,
            TransactionDropped,
            ReceivedTransaction,
        ];
        all.into_iter().find(|c| *c as u32 == value)
    }
}

// ---------------------------------------------------------------------
// Byte-cursor helpers. Kept deliberately small: these are used by every
// body's encode/decode and nowhere else.
// ---------------------------------------------------------------------

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    command: u32,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], command: u32) -> Self {
        Self { buf, pos: 0, command }
    }

    fn fail(&self, reason: impl Into<String>) -> PacketError {
        PacketError::MalformedBody {
            command: self.command,
            reason: reason.into(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], PacketError> {
        if self.pos + n > self.buf.len() {
            return Err(self.fail(format!(
                "need {n} bytes at offset {}, only {} remain",
                self.pos,
                self.buf.len() - self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn id(&mut self) -> Result<[u8; ID_LEN], PacketError> {
        Ok(self.take(ID_LEN)?.try_into().unwrap())
    }

    fn hash(&mut self) -> Result<Hash256, PacketError> {
        Ok(self.take(HASH_LEN)?.try_into().unwrap())
    }

    fn currency(&mut self) -> Result<Currency, PacketError> {
        let bytes: [u8; CURRENCY_LEN] = self.take(CURRENCY_LEN)?.try_into().unwrap();
        Ok(Currency::from_bytes(bytes))
    }

    fn u64_le(&mut self) -> Result<u64, PacketError> {
        Ok(u64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    fn u32_le(&mut self) -> Result<u32, PacketError> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    /// Read one NUL-terminated string, consuming the NUL.
    fn cstr(&mut self) -> Result<String, PacketError> {
        let rest = &self.buf[self.pos..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.fail("expected NUL-terminated string, found none"))?;
        let s = std::str::from_utf8(&rest[..nul])
            .map_err(|e| self.fail(format!("invalid utf8 in string field: {e}")))?
            .to_string();
        self.pos += nul + 1;
        Ok(s)
    }

    /// The remainder of the buffer, interpreted as a NUL-terminated
    /// string (used for the *last* string field in a body, which may not
    /// carry a trailing NUL on some senders).
    fn cstr_or_rest(&mut self) -> Result<String, PacketError> {
        let rest = &self.buf[self.pos..];
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        let s = std::str::from_utf8(&rest[..end])
            .map_err(|e| self.fail(format!("invalid utf8 in string field: {e}")))?
            .to_string();
        self.pos = self.buf.len();
        Ok(s)
    }

    fn finish(&self) -> Result<(), PacketError> {
        if self.pos != self.buf.len() {
            return Err(self.fail(format!(
                "{} trailing bytes after decoding body",
                self.buf.len() - self.pos
            )));
        }
        Ok(())
    }
}

struct Writer(Vec<u8>);

impl Writer {
    fn new() -> Self {
        Self(Vec::new())
    }
    fn id(&mut self, v: &[u8; ID_LEN]) -> &mut Self {
        self.0.extend_from_slice(v);
        self
    }
    fn hash(&mut self, v: &Hash256) -> &mut Self {
        self.0.extend_from_slice(v);
        self
    }
    fn currency(&mut self, v: &Currency) -> &mut Self {
        self.0.extend_from_slice(&v.as_bytes());
        self
    }
    fn u64_le(&mut self, v: u64) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn u32_le(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn cstr(&mut self, s: &str) -> &mut Self {
        self.0.extend_from_slice(s.as_bytes());
        self.0.push(0);
        self
    }
    fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

// ---------------------------------------------------------------------
// Body structs
// ---------------------------------------------------------------------

/// `xbcTransaction` — broadcast order announcement (no dest/hub prefix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBody {
    pub order_id: Hash256,
    pub src_addr: Address,
    pub src_currency: Currency,
    pub src_amount: u64,
    pub dst_addr: Address,
    pub dst_currency: Currency,
    pub dst_amount: u64,
}

/// `xbcTransactionHold` — unicast, dest + hub address prefixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHoldBody {
    pub dest: Address,
    pub hub: Address,
    pub old_order_id: Hash256,
    pub hub_id: Hash256,
}

/// `xbcTransactionHoldApply` and `xbcTransactionInitialized` share this
/// shape: dest + hub address prefix, then a bare hub id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubIdBody {
    pub dest: Address,
    pub hub: Address,
    pub hub_id: Hash256,
}

/// `xbcTransactionInit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInitBody {
    pub dest: Address,
    pub hub: Address,
    pub hub_id: Hash256,
    pub from_addr: Address,
    pub from_currency: Currency,
    pub from_amount: u64,
    pub to_addr: Address,
    pub to_currency: Currency,
    pub to_amount: u64,
}

/// `xbcTransactionCreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCreateBody {
    pub dest: Address,
    pub hub: Address,
    pub hub_id: Hash256,
    pub counterparty_dest_addr: Address,
    pub lock_time_seconds: u32,
    pub revert_delay_seconds: u32,
}

/// Shared shape for `xbcTransactionCreated`, `xbcTransactionSign`: a hub id
/// plus two NUL-terminated raw-transaction hex strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPairBody {
    pub dest: Address,
    pub hub: Address,
    pub hub_id: Hash256,
    pub raw_pay: String,
    pub raw_revert: String,
}

/// Shared shape for `xbcTransactionSigned`, `xbcTransactionCommit`: a hub
/// id plus a single raw-transaction hex string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxSingleBody {
    pub dest: Address,
    pub hub: Address,
    pub hub_id: Hash256,
    pub raw_tx: String,
}

/// `xbcTransactionCommited`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCommitedBody {
    pub dest: Address,
    pub hub: Address,
    pub hub_id: Hash256,
    pub observed_tx_hash: Hash256,
}

/// Shared shape for `xbcTransactionCancel`, `xbcTransactionFinished`,
/// `xbcTransactionDropped`: broadcast, a bare 32-byte id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdBody {
    pub id: Hash256,
}

/// `xbcTransactionRollback` — the one unicast body noted as carrying only
/// the destination prefix, no separate hub address field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRollbackBody {
    pub dest: Address,
    pub hub_id: Hash256,
}

/// `xbcReceivedTransaction` — external wallet-scanner notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedTransactionBody {
    pub tx_hash: Hash256,
}

/// `xbcPendingTransaction` — broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransactionBody {
    pub id: Hash256,
    pub from_currency: Currency,
    pub from_amount: u64,
    pub to_currency: Currency,
    pub to_amount: u64,
}

/// `xbcAddressBookEntry` — broadcast, three NUL-terminated strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBookEntryBody {
    pub currency: String,
    pub name: String,
    pub address_base64: String,
}

/// `xbcAnnounceAddresses` — a session announcing the local addresses it
/// can deliver to, to a single peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceAddressesBody {
    pub dest: Address,
    pub addresses: Vec<Address>,
}

/// `xbcXChatMessage` — free-form chat, outside the swap hard surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XChatMessageBody {
    pub dest: Address,
    pub hub: Address,
    pub text: String,
}

/// `xbcExchangeWallets` — broadcast list of currencies a hub has attached
/// wallets for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeWalletsBody {
    pub currencies: Vec<Currency>,
}

/// The full command vocabulary, one variant per `CommandCode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Invalid,
    AnnounceAddresses(AnnounceAddressesBody),
    XChatMessage(XChatMessageBody),
    AddressBookEntry(AddressBookEntryBody),
    ExchangeWallets(ExchangeWalletsBody),
    PendingTransaction(PendingTransactionBody),
    Transaction(TransactionBody),
    TransactionHold(TransactionHoldBody),
    TransactionHoldApply(HubIdBody),
    TransactionInit(TransactionInitBody),
    TransactionInitialized(HubIdBody),
    TransactionCreate(TransactionCreateBody),
    TransactionCreated(TxPairBody),
    TransactionSign(TxPairBody),
    TransactionSigned(TxSingleBody),
    TransactionCommit(TxSingleBody),
    TransactionCommited(TransactionCommitedBody),
    TransactionConfirm(HubIdBody),
    TransactionFinished(IdBody),
    TransactionCancel(IdBody),
    TransactionRollback(TransactionRollbackBody),
    TransactionDropped(IdBody),
    ReceivedTransaction(ReceivedTransactionBody),
}

impl Command {
    /// Numeric discriminant for this variant.
    pub fn code(&self) -> CommandCode {
        use Command::*;
        match self {
            Invalid => CommandCode::Invalid,
            AnnounceAddresses(_) => CommandCode::AnnounceAddresses,
            XChatMessage(_) => CommandCode::XChatMessage,
            AddressBookEntry(_) => CommandCode::AddressBookEntry,
            ExchangeWallets(_) => CommandCode::ExchangeWallets,
            PendingTransaction(_) => CommandCode::PendingTransaction,
            Transaction(_) => CommandCode::Transaction,
            TransactionHold(_) => CommandCode::TransactionHold,
            TransactionHoldApply(_) => CommandCode::TransactionHoldApply,
            TransactionInit(_) => CommandCode::TransactionInit,
            TransactionInitialized(_) => CommandCode::TransactionInitialized,
            TransactionCreate(_) => CommandCode::TransactionCreate,
            TransactionCreated(_) => CommandCode::TransactionCreated,
            TransactionSign(_) => CommandCode::TransactionSign,
            TransactionSigned(_) => CommandCode::TransactionSigned,
            TransactionCommit(_) => CommandCode::TransactionCommit,
            TransactionCommited(_) => CommandCode::TransactionCommited,
            TransactionConfirm(_) => CommandCode::TransactionConfirm,
            TransactionFinished(_) => CommandCode::TransactionFinished,
            TransactionCancel(_) => CommandCode::TransactionCancel,
            TransactionRollback(_) => CommandCode::TransactionRollback,
            TransactionDropped(_) => CommandCode::TransactionDropped,
            ReceivedTransaction(_) => CommandCode::ReceivedTransaction,
        }
    }

    /// Encode the body bytes (the header is framed separately by
    /// `RawPacket`).
    pub fn encode_body(&self) -> Vec<u8> {
        use Command::*;
        let mut w = Writer::new();
        match self {
            Invalid => {}
            AnnounceAddresses(b) => {
                w.id(&b.dest.0);
                w.u32_le(b.addresses.len() as u32);
                for a in &b.addresses {
                    w.id(&a.0);
                }
            }
            XChatMessage(b) => {
                w.id(&b.dest.0).id(&b.hub.0).cstr(&b.text);
            }
            AddressBookEntry(b) => {
                w.cstr(&b.currency).cstr(&b.name).cstr(&b.address_base64);
            }
            ExchangeWallets(b) => {
                w.u32_le(b.currencies.len() as u32);
                for c in &b.currencies {
                    w.currency(c);
                }
            }
            PendingTransaction(b) => {
                w.hash(&b.id)
                    .currency(&b.from_currency)
                    .u64_le(b.from_amount)
                    .currency(&b.to_currency)
                    .u64_le(b.to_amount);
            }
            Transaction(b) => {
                w.hash(&b.order_id)
                    .id(&b.src_addr.0)
                    .currency(&b.src_currency)
                    .u64_le(b.src_amount)
                    .id(&b.dst_addr.0)
                    .currency(&b.dst_currency)
                    .u64_le(b.dst_amount);
            }
            TransactionHold(b) => {
                w.id(&b.dest.0)
                    .id(&b.hub.0)
                    .hash(&b.old_order_id)
                    .hash(&b.hub_id);
            }
            TransactionHoldApply(b) | TransactionInitialized(b) | TransactionConfirm(b) => {
                w.id(&b.dest.0).id(&b.hub.0).hash(&b.hub_id);
            }
            TransactionInit(b) => {
                w.id(&b.dest.0)
                    .id(&b.hub.0)
                    .hash(&b.hub_id)
                    .id(&b.from_addr.0)
                    .currency(&b.from_currency)
                    .u64_le(b.from_amount)
                    .id(&b.to_addr.0)
                    .currency(&b.to_currency)
                    .u64_le(b.to_amount);
            }
            TransactionCreate(b) => {
                w.id(&b.dest.0)
                    .id(&b.hub.0)
                    .hash(&b.hub_id)
                    .id(&b.counterparty_dest_addr.0)
                    .u32_le(b.lock_time_seconds)
                    .u32_le(b.revert_delay_seconds);
            }
            TransactionCreated(b) | TransactionSign(b) => {
                w.id(&b.dest.0).id(&b.hub.0).hash(&b.hub_id);
                w.cstr(&b.raw_pay);
                w.0.extend_from_slice(b.raw_revert.as_bytes());
            }
            TransactionSigned(b) | TransactionCommit(b) => {
                w.id(&b.dest.0).id(&b.hub.0).hash(&b.hub_id);
                w.0.extend_from_slice(b.raw_tx.as_bytes());
            }
            TransactionCommited(b) => {
                w.id(&b.dest.0)
                    .id(&b.hub.0)
                    .hash(&b.hub_id)
                    .hash(&b.observed_tx_hash);
            }
            TransactionFinished(b) | TransactionCancel(b) | TransactionDropped(b) => {
                w.hash(&b.id);
            }
            TransactionRollback(b) => {
                w.id(&b.dest.0).hash(&b.hub_id);
            }
            ReceivedTransaction(b) => {
                w.hash(&b.tx_hash);
            }
        }
        w.into_vec()
    }

    /// Decode a body for the given `CommandCode`.
    pub fn decode(code: CommandCode, body: &[u8]) -> Result<Self, PacketError> {
        let mut r = Reader::new(body, code as u32);
        let command = match code {
            CommandCode::Invalid => Command::Invalid,
            CommandCode::AnnounceAddresses => {
                let dest = Address::new(r.id()?);
                let count = r.u32_le()? as usize;
                let mut addresses = Vec::with_capacity(count);
                for _ in 0..count {
                    addresses.push(Address::new(r.id()?));
                }
                r.finish()?;
                Command::AnnounceAddresses(AnnounceAddressesBody { dest, addresses })
            }
            CommandCode::XChatMessage => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let text = r.cstr_or_rest()?;
                Command::XChatMessage(XChatMessageBody { dest, hub, text })
            }
            CommandCode::AddressBookEntry => {
                let currency = r.cstr()?;
                let name = r.cstr()?;
                let address_base64 = r.cstr_or_rest()?;
                Command::AddressBookEntry(AddressBookEntryBody {
                    currency,
                    name,
                    address_base64,
                })
            }
            CommandCode::ExchangeWallets => {
                let count = r.u32_le()? as usize;
                let mut currencies = Vec::with_capacity(count);
                for _ in 0..count {
                    currencies.push(r.currency()?);
                }
                r.finish()?;
                Command::ExchangeWallets(ExchangeWalletsBody { currencies })
            }
            CommandCode::PendingTransaction => {
                let id = r.hash()?;
                let from_currency = r.currency()?;
                let from_amount = r.u64_le()?;
                let to_currency = r.currency()?;
                let to_amount = r.u64_le()?;
                r.finish()?;
                Command::PendingTransaction(PendingTransactionBody {
                    id,
                    from_currency,
                    from_amount,
                    to_currency,
                    to_amount,
                })
            }
            CommandCode::Transaction => {
                let order_id = r.hash()?;
                let src_addr = Address::new(r.id()?);
                let src_currency = r.currency()?;
                let src_amount = r.u64_le()?;
                let dst_addr = Address::new(r.id()?);
                let dst_currency = r.currency()?;
                let dst_amount = r.u64_le()?;
                r.finish()?;
                Command::Transaction(TransactionBody {
                    order_id,
                    src_addr,
                    src_currency,
                    src_amount,
                    dst_addr,
                    dst_currency,
                    dst_amount,
                })
            }
            CommandCode::TransactionHold => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let old_order_id = r.hash()?;
                let hub_id = r.hash()?;
                r.finish()?;
                Command::TransactionHold(TransactionHoldBody {
                    dest,
                    hub,
                    old_order_id,
                    hub_id,
                })
            }
            CommandCode::TransactionHoldApply
            | CommandCode::TransactionInitialized
            | CommandCode::TransactionConfirm => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let hub_id = r.hash()?;
                r.finish()?;
                let body = HubIdBody { dest, hub, hub_id };
                match code {
                    CommandCode::TransactionHoldApply => Command::TransactionHoldApply(body),
                    CommandCode::TransactionInitialized => Command::TransactionInitialized(body),
                    _ => Command::TransactionConfirm(body),
                }
            }
            CommandCode::TransactionInit => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let hub_id = r.hash()?;
                let from_addr = Address::new(r.id()?);
                let from_currency = r.currency()?;
                let from_amount = r.u64_le()?;
                let to_addr = Address::new(r.id()?);
                let to_currency = r.currency()?;
                let to_amount = r.u64_le()?;
                r.finish()?;
                Command::TransactionInit(TransactionInitBody {
                    dest,
                    hub,
                    hub_id,
                    from_addr,
                    from_currency,
                    from_amount,
                    to_addr,
                    to_currency,
                    to_amount,
                })
            }
            CommandCode::TransactionCreate => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let hub_id = r.hash()?;
                let counterparty_dest_addr = Address::new(r.id()?);
                let lock_time_seconds = r.u32_le()?;
                let revert_delay_seconds = r.u32_le()?;
                r.finish()?;
                Command::TransactionCreate(TransactionCreateBody {
                    dest,
                    hub,
                    hub_id,
                    counterparty_dest_addr,
                    lock_time_seconds,
                    revert_delay_seconds,
                })
            }
            CommandCode::TransactionCreated | CommandCode::TransactionSign => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let hub_id = r.hash()?;
                let raw_pay = r.cstr()?;
                let raw_revert = r.cstr_or_rest()?;
                let body = TxPairBody {
                    dest,
                    hub,
                    hub_id,
                    raw_pay,
                    raw_revert,
                };
                if code == CommandCode::TransactionCreated {
                    Command::TransactionCreated(body)
                } else {
                    Command::TransactionSign(body)
                }
            }
            CommandCode::TransactionSigned | CommandCode::TransactionCommit => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let hub_id = r.hash()?;
                let raw_tx = r.cstr_or_rest()?;
                let body = TxSingleBody {
                    dest,
                    hub,
                    hub_id,
                    raw_tx,
                };
                if code == CommandCode::TransactionSigned {
                    Command::TransactionSigned(body)
                } else {
                    Command::TransactionCommit(body)
                }
            }
            CommandCode::TransactionCommited => {
                let dest = Address::new(r.id()?);
                let hub = Address::new(r.id()?);
                let hub_id = r.hash()?;
                let observed_tx_hash = r.hash()?;
                r.finish()?;
                Command::TransactionCommited(TransactionCommitedBody {
                    dest,
                    hub,
                    hub_id,
                    observed_tx_hash,
                })
            }
            CommandCode::TransactionFinished
            | CommandCode::TransactionCancel
            | CommandCode::TransactionDropped => {
                let id = r.hash()?;
                r.finish()?;
                let body = IdBody { id };
                match code {
                    CommandCode::TransactionFinished => Command::TransactionFinished(body),
                    CommandCode::TransactionCancel => Command::TransactionCancel(body),
                    _ => Command::TransactionDropped(body),
                }
            }
            CommandCode::TransactionRollback => {
                let dest = Address::new(r.id()?);
                let hub_id = r.hash()?;
                r.finish()?;
                Command::TransactionRollback(TransactionRollbackBody { dest, hub_id })
            }
            CommandCode::ReceivedTransaction => {
                let tx_hash = r.hash()?;
                r.finish()?;
                Command::ReceivedTransaction(ReceivedTransactionBody { tx_hash })
            }
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::new([b; ID_LEN])
    }

    fn hash(b: u8) -> Hash256 {
        [b; HASH_LEN]
    }

    #[test]
    fn transaction_round_trips() {
        let cmd = Command::Transaction(TransactionBody {
            order_id: hash(0xAA),
            src_addr: addr(1),
            src_currency: Currency::new("BTC"),
            src_amount: 100_000_000,
            dst_addr: addr(2),
            dst_currency: Currency::new("LTC"),
            dst_amount: 5_000_000_000,
        });
        let body = cmd.encode_body();
        assert_eq!(body.len(), 104);
        let decoded = Command::decode(CommandCode::Transaction, &body).unwrap();
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn transaction_hold_round_trips_and_sizes_104() {
        let cmd = Command::TransactionHold(TransactionHoldBody {
            dest: addr(1),
            hub: addr(2),
            old_order_id: hash(3),
            hub_id: hash(4),
        });
        let body = cmd.encode_body();
        assert_eq!(body.len(), 104);
        assert_eq!(Command::decode(CommandCode::TransactionHold, &body).unwrap(), cmd);
    }

    #[test]
    fn hub_id_body_sizes_72() {
        let cmd = Command::TransactionHoldApply(HubIdBody {
            dest: addr(1),
            hub: addr(2),
            hub_id: hash(3),
        });
        assert_eq!(cmd.encode_body().len(), 72);
    }

    #[test]
    fn transaction_init_sizes_144() {
        let cmd = Command::TransactionInit(TransactionInitBody {
            dest: addr(1),
            hub: addr(2),
            hub_id: hash(3),
            from_addr: addr(4),
            from_currency: Currency::new("BTC"),
            from_amount: 1,
            to_addr: addr(5),
            to_currency: Currency::new("LTC"),
            to_amount: 2,
        });
        assert_eq!(cmd.encode_body().len(), 144);
    }

    #[test]
    fn transaction_create_sizes_100() {
        let cmd = Command::TransactionCreate(TransactionCreateBody {
            dest: addr(1),
            hub: addr(2),
            hub_id: hash(3),
            counterparty_dest_addr: addr(4),
            lock_time_seconds: 300,
            revert_delay_seconds: 86_400,
        });
        assert_eq!(cmd.encode_body().len(), 100);
    }

    #[test]
    fn tx_pair_round_trips_variable_length() {
        let cmd = Command::TransactionCreated(TxPairBody {
            dest: addr(1),
            hub: addr(2),
            hub_id: hash(3),
            raw_pay: "deadbeef".into(),
            raw_revert: "cafebabe".into(),
        });
        let body = cmd.encode_body();
        assert_eq!(
            Command::decode(CommandCode::TransactionCreated, &body).unwrap(),
            cmd
        );
    }

    #[test]
    fn pending_transaction_sizes_64() {
        let cmd = Command::PendingTransaction(PendingTransactionBody {
            id: hash(1),
            from_currency: Currency::new("BTC"),
            from_amount: 1,
            to_currency: Currency::new("LTC"),
            to_amount: 2,
        });
        assert_eq!(cmd.encode_body().len(), 64);
    }

    #[test]
    fn address_book_entry_round_trips() {
        let cmd = Command::AddressBookEntry(AddressBookEntryBody {
            currency: "BTC".into(),
            name: "savings".into(),
            address_base64: "YWJjZA==".into(),
        });
        let body = cmd.encode_body();
        assert_eq!(
            Command::decode(CommandCode::AddressBookEntry, &body).unwrap(),
            cmd
        );
    }

    #[test]
    fn unknown_command_code_rejected() {
        assert_eq!(CommandCode::from_u32(9999), None);
    }

    #[test]
    fn malformed_body_reports_command_and_reason() {
        let err = Command::decode(CommandCode::Transaction, &[0u8; 10]).unwrap_err();
        match err {
            PacketError::MalformedBody { command, .. } => {
                assert_eq!(command, CommandCode::Transaction as u32)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
