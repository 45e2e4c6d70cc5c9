//! Solana RPC integration

pub mod rpc;
pub mod types;

pub use rpc::{SolanaRpcClient, TransactionSource};
pub use types::DecodedInstruction;
