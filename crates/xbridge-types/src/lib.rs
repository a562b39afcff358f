//! # XBridge Types
//!
//! Wire packet framing and the command vocabulary shared by every other
//! crate in the workspace. Nothing here touches sockets, wallets, or the
//! swap state machine — it is purely "bytes in, typed `Command` out" and
//! back.
//!
//! ## Design Principles
//!
//! - **Typed bodies, not an accreted buffer**: every command is a distinct
//!   struct; `Command::decode` is an exhaustive match over `CommandCode`.
//! - **Framing and vocabulary are separate layers**: `RawPacket` knows the
//!   16-byte header, `Command` knows the bodies. A new command never
//!   touches the framing code.

pub mod command;
pub mod currency;
pub mod errors;
pub mod ids;
pub mod packet;

pub use command::{
    AddressBookEntryBody, AnnounceAddressesBody, Command, CommandCode, ExchangeWalletsBody,
    HubIdBody, IdBody, PendingTransactionBody, ReceivedTransactionBody, TransactionBody,
    TransactionCommitedBody, TransactionCreateBody, TransactionHoldBody, TransactionInitBody,
    TransactionRollbackBody, TxPairBody, TxSingleBody, XChatMessageBody,
};
pub use currency::Currency;
pub use errors::PacketError;
pub use ids::{Address, Hash256, NodeId, HASH_LEN, ID_LEN};
pub use packet::{ChecksumPolicy, RawPacket, HEADER_LEN, PROTOCOL_VERSION};
