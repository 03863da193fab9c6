//! Message-channel boundary.
//!
//! The bot core never addresses a user or wire protocol directly; it sees
//! conversations through this crate:
//! - **Events** (`events`) - inbound activities wrapped in acknowledgeable
//!   envelopes
//! - **Transport** (`transport`) - the `ChannelTransport` trait a concrete
//!   channel binding implements, plus the reconnect policy
//! - **Runner** (`runner`) - the pump loop that feeds activities to a
//!   `TurnHandler` and ships its replies back out
//!
//! Concrete bindings (web chat, Teams, console) live with the hosting
//! process; `NoopChannelTransport` keeps the runner inert when none is wired.

pub mod events;
pub mod runner;
pub mod transport;

pub use events::{Activity, ChannelEnvelope, MessageActivity};
pub use runner::{ChannelRunner, TurnHandler};
pub use transport::{ChannelTransport, NoopChannelTransport, ReconnectPolicy, TransportError};
