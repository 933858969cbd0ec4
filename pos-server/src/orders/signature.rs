//! Customization signature
//!
//! A derived key identifying a line's exact set of selected options.
//! Selections are sorted before hashing so the same set always produces
//! the same signature regardless of input order.

use sha2::{Digest, Sha256};
use shared::models::OptionSelection;

/// Signature over a set of option selections
pub fn customization_signature(selections: &[OptionSelection]) -> String {
    if selections.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&OptionSelection> = selections.iter().collect();
    sorted.sort_by_key(|s| (s.group_id, s.option_id));

    let mut hasher = Sha256::new();
    for s in sorted {
        hasher.update(format!("{}:{}:{};", s.group_id, s.option_id, s.qty));
    }
    format!("{:x}", hasher.finalize())
}
