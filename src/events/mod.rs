//! Catalog of platform event types.
//!
//! Every wire event key the platform emits maps to one [`EventTypeDefinition`],
//! which also names the channel families the event can arrive on. The catalog
//! is built once and never mutated, so lookups need no synchronization.
//!
//! # Example
//!
//! ```
//! use platform_notifications::events;
//! use platform_notifications::EventCategory;
//!
//! let def = events::lookup_by_key("Platform\\Events\\AssetMinted");
//! assert_eq!(def.category, EventCategory::AssetMinted);
//!
//! // Keys that match nothing resolve to the Unknown definition.
//! assert!(events::lookup_by_key("nope").category.is_unknown());
//! ```

mod registry;

pub use registry::{
    all, definition_for, filter_by_channel_families, lookup_by_key, lookup_by_name,
    EventTypeDefinition, ASSET_FAMILY, PLAYER_FAMILY, PROJECT_FAMILY, WALLET_FAMILY,
    WIRE_KEY_PREFIX,
};
