pub mod bank;
pub mod channel;
pub mod ledger;
pub mod network;
pub mod transaction;
