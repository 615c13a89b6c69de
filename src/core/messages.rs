//! User-facing feedback strings.

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";
pub const INVALID_AMOUNT: &str = "Invalid transfer amount.";
pub const INVALID_TRANSFER_ADDRESS: &str = "Invalid transfer address.";
pub const UNSUPPORTED_WALLET: &str =
    "Oops, unsupported wallet extension detected. Please install Unisat or Xverse.";
pub const INVALID_NETWORK: &str = "Invalid network. Please make sure you are on the right network.";
pub const INSUFFICIENT_FUNDS: &str = "Insufficient funds.";
pub const TRANSACTION_FAILED: &str = "Transaction failed.";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
pub const TRANSFER_IN_PROGRESS: &str = "A transfer is already in progress.";

pub const WALLET_NOT_DETECTED: &str =
    "Unsupported wallet extension detected. Please install Unisat or Xverse.";
pub const BALANCE_FETCH_FAILED: &str = "Something went wrong";
pub const INVALID_WALLET_ADDRESS: &str = "Please enter a valid wallet address";
pub const SUPPLY_FETCH_FAILED: &str = "Something went wrong while fetching the total supply";
