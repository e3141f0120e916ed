//! Deterministic channel (topic) names.
//!
//! Every topic renders as `<family>.<platform>.<identifier-path>`. Two channels
//! built from the same logical identity render byte-identical topics, which is
//! what subscription deduplication keys on.

use crate::error::{NotificationError, Result};
use crate::events::{ASSET_FAMILY, PLAYER_FAMILY, PROJECT_FAMILY, WALLET_FAMILY};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A publish/subscribe topic.
#[derive(Clone)]
pub struct Channel {
    family: &'static str,
    topic: String,
}

impl Channel {
    /// `project.<platform>.<project_id>`
    pub fn project(platform: &str, project_id: i64) -> Result<Self> {
        validate_segment(PROJECT_FAMILY, "platform id", platform)?;
        validate_project_id(PROJECT_FAMILY, project_id)?;

        Ok(Self::render(PROJECT_FAMILY, platform, &[project_id.to_string().as_str()]))
    }

    /// `player.<platform>.<project_id>.<player_id>`
    pub fn player(platform: &str, project_id: i64, player_id: &str) -> Result<Self> {
        validate_segment(PLAYER_FAMILY, "platform id", platform)?;
        validate_project_id(PLAYER_FAMILY, project_id)?;
        validate_segment(PLAYER_FAMILY, "player id", player_id)?;

        Ok(Self::render(
            PLAYER_FAMILY,
            platform,
            &[project_id.to_string().as_str(), player_id],
        ))
    }

    /// `asset.<platform>.<asset_id>`
    pub fn asset(platform: &str, asset_id: &str) -> Result<Self> {
        validate_segment(ASSET_FAMILY, "platform id", platform)?;
        validate_segment(ASSET_FAMILY, "asset id", asset_id)?;

        Ok(Self::render(ASSET_FAMILY, platform, &[asset_id]))
    }

    /// `wallet.<platform>.<address>`
    pub fn wallet(platform: &str, address: &str) -> Result<Self> {
        validate_segment(WALLET_FAMILY, "platform id", platform)?;
        validate_segment(WALLET_FAMILY, "wallet address", address)?;

        Ok(Self::render(WALLET_FAMILY, platform, &[address]))
    }

    fn render(family: &'static str, platform: &str, path: &[&str]) -> Self {
        let mut topic = format!("{}.{}", family, platform);
        for segment in path {
            topic.push('.');
            topic.push_str(segment);
        }
        Self { family, topic }
    }

    /// Family the channel belongs to, e.g. `"asset"`.
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Rendered topic string.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

fn validate_project_id(kind: &'static str, project_id: i64) -> Result<()> {
    if project_id <= 0 {
        return Err(NotificationError::invalid_channel(
            kind,
            format!("project id must be positive, got {}", project_id),
        ));
    }
    Ok(())
}

fn validate_segment(kind: &'static str, what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NotificationError::invalid_channel(
            kind,
            format!("{} must not be blank", what),
        ));
    }
    if value.contains('.') || value.chars().any(char::is_whitespace) {
        return Err(NotificationError::invalid_channel(
            kind,
            format!("{} {:?} contains '.' or whitespace", what, value),
        ));
    }
    Ok(())
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.topic == other.topic
    }
}

impl Eq for Channel {}

impl Hash for Channel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.topic.hash(state);
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Channel({})", self.topic)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.topic)
    }
}

impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.topic
    }
}
