//! Platform configuration and derived connection parameters.
//!
//! The platform describes its notification driver in the same document it
//! returns for every other platform query. Notifications are optional: a
//! platform without a complete driver block simply has nothing to start.

use serde::{Deserialize, Serialize};

/// Platform details relevant to notifications.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    /// Platform identity used in every channel topic (e.g. `mainnet`).
    pub network: String,

    /// Notification driver settings (None = notifications disabled).
    #[serde(default)]
    pub notifications: Option<NotificationsConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsConfig {
    #[serde(default)]
    pub pusher: Option<PusherConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PusherConfig {
    /// Application key used to authenticate the connection.
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub options: Option<PusherOptions>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PusherOptions {
    /// Cluster/region hosting the application.
    #[serde(default)]
    pub cluster: Option<String>,

    /// Whether channels use encrypted transport.
    #[serde(default)]
    pub encrypted: Option<bool>,
}

impl PlatformConfig {
    /// Platform with notifications disabled.
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            notifications: None,
        }
    }

    /// Add a complete notification driver block.
    pub fn with_pusher(
        mut self,
        key: impl Into<String>,
        cluster: impl Into<String>,
        encrypted: bool,
    ) -> Self {
        self.notifications = Some(NotificationsConfig {
            pusher: Some(PusherConfig {
                key: Some(key.into()),
                options: Some(PusherOptions {
                    cluster: Some(cluster.into()),
                    encrypted: Some(encrypted),
                }),
            }),
        });
        self
    }
}

/// Everything a transport needs to open a connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionParams {
    pub key: String,
    pub cluster: String,
    pub encrypted: bool,
}

impl ConnectionParams {
    /// Derive parameters from a platform.
    ///
    /// Returns None when the key, cluster or encryption flag is missing, or
    /// the key or cluster is blank.
    pub fn from_platform(platform: &PlatformConfig) -> Option<Self> {
        let pusher = platform.notifications.as_ref()?.pusher.as_ref()?;
        let options = pusher.options.as_ref()?;

        let key = pusher.key.as_deref().filter(|k| !k.trim().is_empty())?;
        let cluster = options.cluster.as_deref().filter(|c| !c.trim().is_empty())?;
        let encrypted = options.encrypted?;

        Some(Self {
            key: key.to_string(),
            cluster: cluster.to_string(),
            encrypted,
        })
    }
}
