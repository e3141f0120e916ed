//! Static event type catalog and lookups.

use crate::types::EventCategory;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Prefix shared by every wire event key.
pub const WIRE_KEY_PREFIX: &str = "Platform\\Events\\";

pub const PROJECT_FAMILY: &str = "project";
pub const PLAYER_FAMILY: &str = "player";
pub const ASSET_FAMILY: &str = "asset";
pub const WALLET_FAMILY: &str = "wallet";

const PROJECT: &[&str] = &[PROJECT_FAMILY];
const PROJECT_WALLET: &[&str] = &[PROJECT_FAMILY, WALLET_FAMILY];
const PROJECT_PLAYER: &[&str] = &[PROJECT_FAMILY, PLAYER_FAMILY];
const PROJECT_PLAYER_WALLET: &[&str] = &[PROJECT_FAMILY, PLAYER_FAMILY, WALLET_FAMILY];
const PROJECT_ASSET_WALLET: &[&str] = &[PROJECT_FAMILY, ASSET_FAMILY, WALLET_FAMILY];

/// One entry in the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventTypeDefinition {
    pub category: EventCategory,
    /// Event name as sent on the wire. Empty only for `Unknown`.
    pub wire_key: String,
    /// Human name, e.g. `ASSET_MINTED`.
    pub name: &'static str,
    /// Channel families the event may arrive on.
    pub channel_families: &'static [&'static str],
}

impl EventTypeDefinition {
    fn new(category: EventCategory, suffix: &str, channel_families: &'static [&'static str]) -> Self {
        let wire_key = if suffix.is_empty() {
            String::new()
        } else {
            format!("{}{}", WIRE_KEY_PREFIX, suffix)
        };

        Self {
            category,
            wire_key,
            name: category.as_str(),
            channel_families,
        }
    }

    /// Whether this event can arrive on channels of the given family.
    pub fn applies_to(&self, family: &str) -> bool {
        self.channel_families.contains(&family)
    }
}

struct Catalog {
    /// Declaration order; index 0 is `Unknown`.
    definitions: Vec<EventTypeDefinition>,
    by_key: HashMap<String, usize>,
    by_name: HashMap<&'static str, usize>,
    by_category: HashMap<EventCategory, usize>,
}

impl Catalog {
    fn build() -> Self {
        use EventCategory::*;

        let definitions = vec![
            EventTypeDefinition::new(Unknown, "", &[]),
            EventTypeDefinition::new(ProjectCreated, "ProjectCreated", PROJECT),
            EventTypeDefinition::new(ProjectDeleted, "ProjectDeleted", PROJECT),
            EventTypeDefinition::new(ProjectLinked, "ProjectLinked", PROJECT_WALLET),
            EventTypeDefinition::new(ProjectLocked, "ProjectLocked", PROJECT),
            EventTypeDefinition::new(ProjectUnlinked, "ProjectUnlinked", PROJECT_WALLET),
            EventTypeDefinition::new(ProjectUnlocked, "ProjectUnlocked", PROJECT),
            EventTypeDefinition::new(ProjectUpdated, "ProjectUpdated", PROJECT),
            EventTypeDefinition::new(
                BlockchainLogProcessed,
                "BlockchainLogProcessed",
                PROJECT_ASSET_WALLET,
            ),
            EventTypeDefinition::new(MessageProcessed, "MessageProcessed", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(PlayerCreated, "PlayerCreated", PROJECT_PLAYER),
            EventTypeDefinition::new(PlayerDeleted, "PlayerDeleted", PROJECT_PLAYER),
            EventTypeDefinition::new(PlayerLinked, "PlayerLinked", PROJECT_PLAYER_WALLET),
            EventTypeDefinition::new(PlayerUnlinked, "PlayerUnlinked", PROJECT_PLAYER_WALLET),
            EventTypeDefinition::new(PlayerUpdated, "PlayerUpdated", PROJECT_PLAYER),
            EventTypeDefinition::new(AssetCreated, "AssetCreated", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(AssetMelted, "AssetMelted", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(AssetMinted, "AssetMinted", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(AssetTransferred, "AssetTransferred", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(AssetUpdated, "AssetUpdated", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(TradeCompleted, "TradeCompleted", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(TradeCreated, "TradeCreated", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(
                TransactionBroadcast,
                "TransactionBroadcast",
                PROJECT_ASSET_WALLET,
            ),
            EventTypeDefinition::new(
                TransactionCanceled,
                "TransactionCanceled",
                PROJECT_ASSET_WALLET,
            ),
            EventTypeDefinition::new(TransactionDropped, "TransactionDropped", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(
                TransactionExecuted,
                "TransactionExecuted",
                PROJECT_ASSET_WALLET,
            ),
            EventTypeDefinition::new(TransactionFailed, "TransactionFailed", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(TransactionPending, "TransactionPending", PROJECT_ASSET_WALLET),
            EventTypeDefinition::new(
                TransactionProcessing,
                "TransactionProcessing",
                PROJECT_ASSET_WALLET,
            ),
            EventTypeDefinition::new(TransactionUpdated, "TransactionUpdated", PROJECT_ASSET_WALLET),
        ];

        let mut by_key = HashMap::with_capacity(definitions.len());
        let mut by_name = HashMap::with_capacity(definitions.len());
        let mut by_category = HashMap::with_capacity(definitions.len());

        for (i, def) in definitions.iter().enumerate() {
            // The empty key stays unindexed so it can never match a wire event.
            if !def.wire_key.is_empty() {
                by_key.insert(def.wire_key.clone(), i);
            }
            by_name.insert(def.name, i);
            by_category.insert(def.category, i);
        }

        Self {
            definitions,
            by_key,
            by_name,
            by_category,
        }
    }

    fn unknown(&self) -> &EventTypeDefinition {
        &self.definitions[0]
    }
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::build);

/// Definition for a wire key, or the `Unknown` definition.
pub fn lookup_by_key(key: &str) -> &'static EventTypeDefinition {
    let catalog = &*CATALOG;
    match catalog.by_key.get(key) {
        Some(&i) => &catalog.definitions[i],
        None => catalog.unknown(),
    }
}

/// Definition for a human name, or the `Unknown` definition.
pub fn lookup_by_name(name: &str) -> &'static EventTypeDefinition {
    let catalog = &*CATALOG;
    match catalog.by_name.get(name) {
        Some(&i) => &catalog.definitions[i],
        None => catalog.unknown(),
    }
}

/// Definition owned by a category.
pub fn definition_for(category: EventCategory) -> &'static EventTypeDefinition {
    let catalog = &*CATALOG;
    match catalog.by_category.get(&category) {
        Some(&i) => &catalog.definitions[i],
        None => catalog.unknown(),
    }
}

/// All definitions in declaration order, `Unknown` first.
pub fn all() -> &'static [EventTypeDefinition] {
    &CATALOG.definitions
}

/// Every non-Unknown definition applying to at least one of `families`,
/// in declaration order.
pub fn filter_by_channel_families<I, S>(families: I) -> Vec<&'static EventTypeDefinition>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let families: Vec<S> = families.into_iter().collect();

    CATALOG
        .definitions
        .iter()
        .filter(|def| !def.category.is_unknown())
        .filter(|def| families.iter().any(|f| def.applies_to(f.as_ref())))
        .collect()
}
