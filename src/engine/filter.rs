//! Candidate filter for regionally tagged nodes.
//!
//! Nodes carrying a Hong Kong marker are excluded from automatic selection
//! when the regional filter is enabled. Matching is case-insensitive across
//! the script marker, the English phrase, and the token-boundary
//! abbreviation.

use regex::Regex;
use std::sync::LazyLock;

// Token-boundary match on the abbreviation, over lowercased input, so
// "HK-2" and "us hk 3" match while "hkg" and "shk" do not.
static REGION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^a-z0-9])hk([^a-z0-9]|$)").expect("static pattern"));

/// Whether a node name is excluded from automatic selection.
pub fn is_excluded(name: &str) -> bool {
    if name.contains("香港") {
        return true;
    }
    let lowered = name.to_lowercase();
    lowered.contains("hong kong") || REGION_TOKEN.is_match(&lowered)
}
