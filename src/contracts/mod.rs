//! Contract client facades.
//!
//! Each client is a stateless wrapper over a node handle: write methods
//! (bounded by [`crate::node::Transactor`]) assemble action lists and hand
//! them to the submit layer, read methods (bounded by
//! [`crate::node::TableReader`]) issue table queries and validate every
//! returned row's field set before decoding. Row types live beside the
//! client that serves them.

pub mod governance;
pub mod liquidator;
pub mod positions;
pub mod savings;
pub mod swap;

pub use governance::GovernanceClient;
pub use liquidator::LiquidatorClient;
pub use positions::PositionsClient;
pub use savings::SavingsClient;
pub use swap::SwapClient;
