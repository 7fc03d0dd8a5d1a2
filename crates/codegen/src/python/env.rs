//! `.env` file emission
//!
//! One `KEY="value"` line per configured variable. Keys are uppercased; the
//! sorted source map keeps output stable across runs.

use std::collections::BTreeMap;

/// Emit the `.env` file body.
pub fn emit_env(env: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in env {
        out.push_str(&format!("{}=\"{}\"\n", key.to_uppercase(), value));
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
