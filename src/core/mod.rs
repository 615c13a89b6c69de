//! Shared building blocks: amounts, protocol paths, user-facing messages.

pub mod amount;
pub mod messages;
pub mod paths;

pub use amount::Amount;
