//! Attribute flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Flags describing how changes to an attribute take effect and where
    /// its value is stored.
    ///
    /// At most one `RESTART_*` flag may be set on a definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AttributeFlags: u8 {
        /// Changes apply immediately.
        const RESTART_NONE = 1;
        /// Changes apply after the owning resource's services restart.
        const RESTART_RESOURCE_SERVICES = 1 << 1;
        /// Changes apply after all services restart.
        const RESTART_ALL_SERVICES = 1 << 2;
        /// Changes apply after a full process restart.
        const RESTART_JVM = 1 << 3;
        /// The value is runtime state rather than persisted configuration.
        const STORAGE_RUNTIME = 1 << 4;
    }
}

impl AttributeFlags {
    /// Every restart flag.
    pub const RESTART_MASK: Self = Self::RESTART_NONE
        .union(Self::RESTART_RESOURCE_SERVICES)
        .union(Self::RESTART_ALL_SERVICES)
        .union(Self::RESTART_JVM);

    /// Returns true when the value is runtime state.
    #[must_use]
    pub fn is_runtime_only(self) -> bool {
        self.contains(Self::STORAGE_RUNTIME)
    }

    /// Returns true when a change needs some service restart to take effect.
    #[must_use]
    pub fn requires_restart(self) -> bool {
        self.intersects(
            Self::RESTART_RESOURCE_SERVICES | Self::RESTART_ALL_SERVICES | Self::RESTART_JVM,
        )
    }

    /// Returns true when more than one restart flag is set.
    #[must_use]
    pub fn has_conflicting_restart(self) -> bool {
        self.intersection(Self::RESTART_MASK).bits().count_ones() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_storage() {
        assert!(!AttributeFlags::RESTART_NONE.is_runtime_only());
        assert!((AttributeFlags::RESTART_NONE | AttributeFlags::STORAGE_RUNTIME).is_runtime_only());
    }

    #[test]
    fn restart_conflicts() {
        assert!(!AttributeFlags::RESTART_NONE.has_conflicting_restart());
        assert!(
            (AttributeFlags::RESTART_NONE | AttributeFlags::RESTART_JVM).has_conflicting_restart()
        );
        assert!(!(AttributeFlags::RESTART_JVM | AttributeFlags::STORAGE_RUNTIME)
            .has_conflicting_restart());
    }

    #[test]
    fn restart_requirement() {
        assert!(!AttributeFlags::RESTART_NONE.requires_restart());
        assert!(AttributeFlags::RESTART_ALL_SERVICES.requires_restart());
        assert!(!AttributeFlags::empty().requires_restart());
    }
}
