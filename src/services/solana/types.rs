//! Solana data types shared by the RPC layer and the analyzer

use serde::{Deserialize, Serialize};

/// A single instruction as seen in a jsonParsed transaction, reduced to the
/// fields the analyzer cares about
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Program the instruction was dispatched to, base58
    pub program_id: String,

    /// Account addresses referenced by the instruction, in instruction order
    pub accounts: Vec<String>,
}

impl DecodedInstruction {
    pub fn new(program_id: impl Into<String>, accounts: Vec<String>) -> Self {
        Self {
            program_id: program_id.into(),
            accounts,
        }
    }

    /// Account at a given index in the instruction's account list
    pub fn account_at(&self, index: usize) -> Option<&str> {
        self.accounts.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_at() {
        let ix = DecodedInstruction::new(
            "LBUZKhRxPF3XUpBCjp4YzTKgLccjZhTSDM9YuVaPwxo",
            vec!["one".to_string(), "two".to_string(), "three".to_string()],
        );
        assert_eq!(ix.account_at(2), Some("three"));
        assert_eq!(ix.account_at(3), None);
    }
}
