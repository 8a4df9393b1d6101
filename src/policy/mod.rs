//! Policy matching for the link checker
//!
//! This module resolves, for a given URI, whether it is ignored, whether
//! its fragment is exempt from anchor validation, which credential
//! applies, and which request headers apply.

mod rules;

pub use rules::{Credential, Policy, DEFAULT_ACCEPT};
