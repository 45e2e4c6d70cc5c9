//! Protocol constants

/// Meteora DLMM program id on mainnet
pub const METEORA_DLMM_PROGRAM: &str = "LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo";

/// Verified creator of the Meteora LP Army certificate cNFT collection
pub const CERTIFICATE_CREATOR: &str = "BC11Rk2ZoLxb7tjSpycXDyHnyTdYeaYMgbMwimh8DThX";

/// Display name of the certificate cNFT
pub const CERTIFICATE_NAME: &str = "Meteora LP Army Certificate";

/// Account position of the LB pair address in DLMM instructions
pub const DLMM_POOL_ACCOUNT_INDEX: usize = 2;
