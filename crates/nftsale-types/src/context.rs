//! Per-call execution context.
//!
//! Every registry and settlement operation receives the caller, the call
//! time and the attached payment explicitly instead of reading ambient
//! environment state.

use serde::{Deserialize, Serialize};

use crate::Address;

/// Who is calling, when, and with how much attached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The account invoking the operation.
    pub caller: Address,
    /// Call time in unix seconds.
    pub timestamp: u64,
    /// Attached payment in smallest currency units.
    pub value: u128,
}

impl CallContext {
    /// A context with no attached value.
    #[must_use]
    pub fn new(caller: Address, timestamp: u64) -> Self {
        Self {
            caller,
            timestamp,
            value: 0,
        }
    }

    /// The same context with `value` attached.
    #[must_use]
    pub fn with_value(self, value: u128) -> Self {
        Self { value, ..self }
    }
}
