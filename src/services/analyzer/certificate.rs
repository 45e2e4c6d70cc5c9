//! Meteora LP Army certificate detection
//!
//! Decides whether a wallet holds the LP Army certificate cNFT based on its
//! DAS asset inventory. DAS indexers disagree on where creators and names
//! live in the asset JSON, so detection runs an ordered list of matching
//! strategies from strict to lenient:
//!
//! 1. verified creator AND certificate name (name checked at
//!    `content.metadata.name`, then `name`, then `content.name`)
//! 2. verified creator AND the word "meteora" anywhere in the asset content
//! 3. verified creator alone, as a last resort
//!
//! The lenient fallbacks deliberately trade precision for recall: a wallet
//! holding any cNFT from the certificate creator is counted as certified.

use serde_json::Value;
use tracing::debug;

use crate::core::constants::{CERTIFICATE_CREATOR, CERTIFICATE_NAME};

/// Whether any asset in the inventory is the LP Army certificate
pub fn holds_certificate(assets: &[Value]) -> bool {
    for (index, asset) in assets.iter().enumerate() {
        let creator = creator_matches(asset);
        let name = name_matches(asset);

        if creator && name {
            debug!(index, "Certificate matched on creator and name");
            return true;
        }

        if creator && content_mentions_meteora(asset) {
            debug!(index, "Certificate matched on creator and content keyword");
            return true;
        }
    }

    // Last resort: a creator match alone counts
    for (index, asset) in assets.iter().enumerate() {
        if top_level_creator_matches(asset) {
            debug!(index, "Certificate matched on creator only");
            return true;
        }
    }

    false
}

/// Creator match at the top-level `creators` array or under `content.creators`
fn creator_matches(asset: &Value) -> bool {
    top_level_creator_matches(asset)
        || asset
            .get("content")
            .and_then(|content| content.get("creators"))
            .map(creator_list_matches)
            .unwrap_or(false)
}

fn top_level_creator_matches(asset: &Value) -> bool {
    asset
        .get("creators")
        .map(creator_list_matches)
        .unwrap_or(false)
}

fn creator_list_matches(creators: &Value) -> bool {
    creators
        .as_array()
        .map(|list| {
            list.iter().any(|creator| {
                creator.get("address").and_then(Value::as_str) == Some(CERTIFICATE_CREATOR)
            })
        })
        .unwrap_or(false)
}

/// Certificate name match, checking the known name locations in order
fn name_matches(asset: &Value) -> bool {
    extract_name(asset)
        .map(|name| name.contains(CERTIFICATE_NAME))
        .unwrap_or(false)
}

/// Asset display name from the first location that has one
fn extract_name(asset: &Value) -> Option<&str> {
    asset
        .pointer("/content/metadata/name")
        .and_then(Value::as_str)
        .or_else(|| asset.get("name").and_then(Value::as_str))
        .or_else(|| asset.pointer("/content/name").and_then(Value::as_str))
}

/// Whether the asset content mentions the protocol at all
fn content_mentions_meteora(asset: &Value) -> bool {
    asset
        .get("content")
        .map(|content| content.to_string().to_lowercase().contains("meteora"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn certified_asset() -> Value {
        json!({
            "id": "asset-1",
            "creators": [ { "address": CERTIFICATE_CREATOR, "verified": true } ],
            "content": {
                "metadata": { "name": "Meteora LP Army Certificate #123" }
            }
        })
    }

    #[test]
    fn test_creator_and_name_match() {
        assert!(holds_certificate(&[certified_asset()]));
    }

    #[test]
    fn test_name_without_creator_does_not_match() {
        let asset = json!({
            "creators": [ { "address": "SomeoneElse" } ],
            "content": { "metadata": { "name": CERTIFICATE_NAME } }
        });
        assert!(!holds_certificate(&[asset]));
    }

    #[test]
    fn test_name_at_alternate_locations() {
        let direct = json!({
            "creators": [ { "address": CERTIFICATE_CREATOR } ],
            "name": "Meteora LP Army Certificate"
        });
        let content_name = json!({
            "creators": [ { "address": CERTIFICATE_CREATOR } ],
            "content": { "name": "Meteora LP Army Certificate" }
        });
        assert!(holds_certificate(&[direct]));
        assert!(holds_certificate(&[content_name]));
    }

    #[test]
    fn test_creators_under_content() {
        let asset = json!({
            "content": {
                "creators": [ { "address": CERTIFICATE_CREATOR } ],
                "metadata": { "name": "Meteora LP Army Certificate" }
            }
        });
        assert!(holds_certificate(&[asset]));
    }

    #[test]
    fn test_content_keyword_fallback() {
        let asset = json!({
            "creators": [ { "address": CERTIFICATE_CREATOR } ],
            "content": {
                "metadata": { "name": "Unnamed", "description": "Proof of Meteora LP" }
            }
        });
        assert!(holds_certificate(&[asset]));
    }

    #[test]
    fn test_creator_only_fallback() {
        let asset = json!({
            "creators": [ { "address": CERTIFICATE_CREATOR } ],
            "content": { "metadata": { "name": "Something unrelated" } }
        });
        assert!(holds_certificate(&[asset]));
    }

    #[test]
    fn test_empty_inventory() {
        assert!(!holds_certificate(&[]));
    }

    #[test]
    fn test_unrelated_assets() {
        let assets = vec![
            json!({ "id": "a", "creators": [ { "address": "X" } ] }),
            json!({ "id": "b", "content": { "metadata": { "name": "Cool Ape" } } }),
        ];
        assert!(!holds_certificate(&assets));
    }
}
