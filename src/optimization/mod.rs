pub mod engine;
pub mod liquidity;
pub mod netting;
pub mod settlement;
