//! Transfer workflow: validate, check balance, fund, simulate, build, broadcast.
//!
//! ```text
//! TransferRequest
//!     │
//!     ├── validate_request      MissingFields | InvalidAddress      (no I/O)
//!     ├── WalletSession         NoWallet | WrongNetwork
//!     ├── verify_balance        InvalidAmount | Query | InsufficientBalance
//!     ├── fetch_utxos           Query | InsufficientUtxos
//!     ├── simulate_transfer     Simulation | MissingCalldata | Query
//!     ├── build_parameters      (pure)
//!     ├── DualBroadcaster::run  Signing | Broadcast
//!     └── confirm_pair          IncompleteBroadcast
//!             │
//!             ▼
//!     TransferReceipt → Feedback
//! ```
//!
//! Each stage runs only after the previous one succeeded.

mod balance;
mod broadcast;
mod builder;
mod feedback;
mod funding;
mod orchestrator;
mod validate;

pub use balance::verify_balance;
pub use broadcast::{confirm_pair, BroadcastPair, BroadcastStage, DualBroadcaster};
pub use builder::{build_parameters, simulate_transfer, FeePolicy};
pub use feedback::{Feedback, TransferReceipt, TransferRequest};
pub use funding::fetch_utxos;
pub use orchestrator::{TransferOrchestrator, TransferSettings};
pub use validate::{validate_request, ValidatedRequest};
