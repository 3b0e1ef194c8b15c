//! # cashflow-engine
//!
//! Channel-aware cash flow minimization for multi-bank debt settlement.
//!
//! Given a set of banks, each supporting some payment channels, and a list
//! of debts between them, this engine computes a small set of net payments
//! that settles every bank. Banks can only pay each other over a channel
//! both support; a designated hub supports every channel and intermediates
//! when no direct match exists.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: banks, channels, transactions, networks, net positions
//! - **graph**: Debt matrix built from raw transactions
//! - **optimization**: Greedy settlement, pairwise netting, reporting, liquidity analysis
//! - **simulation**: Random network generation for stress testing

pub mod core;
pub mod graph;
pub mod optimization;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::bank::{Bank, BankId};
    pub use crate::core::channel::{ChannelId, ChannelSet};
    pub use crate::core::ledger::{Ledger, NetPosition};
    pub use crate::core::network::BankNetwork;
    pub use crate::core::transaction::{Transaction, TransactionSet};
    pub use crate::graph::debt_matrix::DebtMatrix;
    pub use crate::optimization::engine::{
        SettlementConfig, SettlementEngine, SettlementReport, UnresolvedPolicy,
    };
    pub use crate::optimization::netting::Payment;
    pub use crate::optimization::settlement::{SettlementError, SettlementMatrix};
}
