//! Service layer
//!
//! External API clients (Solana RPC, Helius DAS, Meteora DLMM), the wallet
//! analysis pipeline and the report renderers.

pub mod analyzer;
pub mod endpoints;
pub mod helius;
pub mod meteora;
pub mod report;
pub mod solana;

pub use analyzer::{WalletAnalyzer, WalletQueue};
pub use endpoints::EndpointRotator;
pub use helius::HeliusClient;
pub use meteora::MeteoraClient;
