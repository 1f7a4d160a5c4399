//! Channel registry
//!
//! Channels come into existence on first reference to their name; the
//! directory owns that lifecycle and hands out shared handles, wiring each
//! new channel to the right backing log, the shared clock, and the core
//! configuration.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::channel::{Channel, ChannelKind};
use super::clock::TimeSource;
use crate::config::Config;
use crate::core_log::MessageLog;

/// Registry of every channel known to this client
pub struct ChannelDirectory {
    config: Arc<Config>,
    clock: Arc<dyn TimeSource>,
    messages: Arc<dyn MessageLog>,
    private_messages: Arc<dyn MessageLog>,
    channels: RwLock<HashMap<String, Arc<Channel>>>,
}

impl ChannelDirectory {
    /// Create a directory over the shared and private-message logs
    pub fn new(
        messages: Arc<dyn MessageLog>,
        private_messages: Arc<dyn MessageLog>,
        clock: Arc<dyn TimeSource>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            config,
            clock,
            messages,
            private_messages,
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// The log-backed channel with this name, created on first reference
    pub async fn channel(&self, name: &str) -> Arc<Channel> {
        self.get_or_create(name, ChannelKind::Persisted).await
    }

    /// A purely local channel with no backing log, created on first reference
    pub async fn virtual_channel(&self, name: &str) -> Arc<Channel> {
        self.get_or_create(name, ChannelKind::Virtual).await
    }

    /// The direct-message channel with `peer`, created on first reference
    pub async fn direct_message(&self, peer: &str) -> Arc<Channel> {
        self.get_or_create(peer, ChannelKind::DirectMessage).await
    }

    /// Names of all known channels, archived ones excluded, sorted
    pub async fn list(&self) -> Vec<String> {
        let channels = self.channels.read().await;
        let mut names = Vec::with_capacity(channels.len());
        for (name, channel) in channels.iter() {
            if !channel.is_archived().await {
                names.push(name.clone());
            }
        }
        names.sort();
        names
    }

    /// Number of known channels, archived ones included
    pub async fn len(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Whether no channel has been referenced yet
    pub async fn is_empty(&self) -> bool {
        self.channels.read().await.is_empty()
    }

    async fn get_or_create(&self, name: &str, kind: ChannelKind) -> Arc<Channel> {
        if let Some(channel) = self.channels.read().await.get(name) {
            return channel.clone();
        }

        let mut channels = self.channels.write().await;
        // a racing creator may have won between the two lock acquisitions
        if let Some(channel) = channels.get(name) {
            return channel.clone();
        }

        let channel = match kind {
            ChannelKind::Persisted => Channel::persisted(
                name,
                self.messages.clone(),
                self.clock.clone(),
                self.config.clone(),
            ),
            ChannelKind::Virtual => {
                Channel::virtual_only(name, self.clock.clone(), self.config.clone())
            }
            ChannelKind::DirectMessage => Channel::direct_message(
                name,
                self.private_messages.clone(),
                self.clock.clone(),
                self.config.clone(),
            ),
        };

        info!(channel = %name, kind = ?kind, "channel created");
        let channel = Arc::new(channel);
        channels.insert(name.to_string(), channel.clone());
        channel
    }
}
