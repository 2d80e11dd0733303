//! A management model of typed attributes for server subsystems.
//!

pub use mgmt_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use mgmt_internal::prelude::*;
}
