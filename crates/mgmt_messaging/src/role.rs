//! The security role domain object.

use core::fmt;

use bitflags::bitflags;
use mgmt_model::value::{ModelMap, ModelNode};

bitflags! {
    /// Operations a role grants on matching addresses.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u8 {
        /// Send messages.
        const SEND = 1;
        /// Consume messages.
        const CONSUME = 1 << 1;
        /// Create durable queues.
        const CREATE_DURABLE_QUEUE = 1 << 2;
        /// Delete durable queues.
        const DELETE_DURABLE_QUEUE = 1 << 3;
        /// Create non-durable (temporary) queues.
        const CREATE_NON_DURABLE_QUEUE = 1 << 4;
        /// Delete non-durable (temporary) queues.
        const DELETE_NON_DURABLE_QUEUE = 1 << 5;
        /// Invoke management operations.
        const MANAGE = 1 << 6;
    }
}

/// Canonical attribute name, XML name and permission of every role
/// attribute, in declaration order.
pub const PERMISSIONS: [(&str, &str, Permissions); 7] = [
    ("send", "send", Permissions::SEND),
    ("consume", "consume", Permissions::CONSUME),
    (
        "create-durable-queue",
        "createDurableQueue",
        Permissions::CREATE_DURABLE_QUEUE,
    ),
    (
        "delete-durable-queue",
        "deleteDurableQueue",
        Permissions::DELETE_DURABLE_QUEUE,
    ),
    (
        "create-non-durable-queue",
        "createNonDurableQueue",
        Permissions::CREATE_NON_DURABLE_QUEUE,
    ),
    (
        "delete-non-durable-queue",
        "deleteNonDurableQueue",
        Permissions::DELETE_NON_DURABLE_QUEUE,
    ),
    ("manage", "manage", Permissions::MANAGE),
];

impl Permissions {
    /// The permission controlled by a canonical attribute name.
    #[must_use]
    pub fn for_attribute(name: &str) -> Option<Self> {
        PERMISSIONS
            .iter()
            .find(|(canonical, _, _)| *canonical == name)
            .map(|&(_, _, permission)| permission)
    }
}

/// A named set of messaging permissions.
///
/// Roles are recomputed from the management model whenever it changes and
/// are never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecurityRole {
    name: String,
    permissions: Permissions,
}

impl SecurityRole {
    /// Creates a role granting `permissions`.
    #[must_use]
    pub fn new(name: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            name: name.into(),
            permissions,
        }
    }

    /// The role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every granted permission.
    #[must_use]
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Whether the role may send.
    #[must_use]
    pub fn send(&self) -> bool {
        self.permissions.contains(Permissions::SEND)
    }

    /// Whether the role may consume.
    #[must_use]
    pub fn consume(&self) -> bool {
        self.permissions.contains(Permissions::CONSUME)
    }

    /// Whether the role may create durable queues.
    #[must_use]
    pub fn create_durable_queue(&self) -> bool {
        self.permissions.contains(Permissions::CREATE_DURABLE_QUEUE)
    }

    /// Whether the role may delete durable queues.
    #[must_use]
    pub fn delete_durable_queue(&self) -> bool {
        self.permissions.contains(Permissions::DELETE_DURABLE_QUEUE)
    }

    /// Whether the role may create non-durable queues.
    #[must_use]
    pub fn create_non_durable_queue(&self) -> bool {
        self.permissions.contains(Permissions::CREATE_NON_DURABLE_QUEUE)
    }

    /// Whether the role may delete non-durable queues.
    #[must_use]
    pub fn delete_non_durable_queue(&self) -> bool {
        self.permissions.contains(Permissions::DELETE_NON_DURABLE_QUEUE)
    }

    /// Whether the role may manage.
    #[must_use]
    pub fn manage(&self) -> bool {
        self.permissions.contains(Permissions::MANAGE)
    }

    /// The value of a role attribute by canonical name.
    #[must_use]
    pub fn permission(&self, attribute: &str) -> Option<bool> {
        Permissions::for_attribute(attribute).map(|p| self.permissions.contains(p))
    }

    /// The role as model values keyed by canonical attribute name.
    #[must_use]
    pub fn to_model(&self) -> ModelMap {
        PERMISSIONS
            .iter()
            .map(|&(canonical, _, permission)| {
                (
                    canonical.to_string(),
                    ModelNode::Bool(self.permissions.contains(permission)),
                )
            })
            .collect()
    }
}

impl fmt::Display for SecurityRole {
    /// `name{send=true, consume=false, ...}` using XML attribute names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.name)?;
        for (i, &(_, xml_name, permission)) in PERMISSIONS.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{xml_name}={}", self.permissions.contains(permission))?;
        }
        f.write_str("}")
    }
}
