//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every body the sandbox creates (particle, zone, or boundary) is keyed by
//! an [`EntityId`]. The physics backend stores the same identifier on its
//! internal bodies so contact events can be mapped back without the world
//! knowing anything about the backend's own handle types.
//!
//! IDs use UUID v7 (time-ordered), which keeps them sortable by creation
//! time in logs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }

            /// Return the identifier as a `u128`, the representation
            /// physics backends store in their per-body user data.
            pub const fn as_u128(self) -> u128 {
                self.0.as_u128()
            }

            /// Rebuild an identifier from its `u128` representation.
            pub const fn from_u128(raw: u128) -> Self {
                Self(Uuid::from_u128(raw))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a body owned by the world: a particle, a zone,
    /// or one of the permanent boundaries.
    EntityId
);
