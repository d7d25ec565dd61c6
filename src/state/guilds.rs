//! Per-guild settings: payment key, owner, support team.
//!
//! The whole store is one JSON document keyed by guild id, loaded at startup
//! and rewritten wholesale after every mutation. A crash between a mutation
//! and the rewrite loses that mutation; ticket state is volatile anyway, so
//! the store makes no stronger promise. Write failures are logged and the
//! in-memory state kept, favoring availability.

use balcao_platform::{GuildId, UserId};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Mutable settings of one guild.
///
/// Serialized shape: `{ "pix_key": ..., "owner_id": ..., "equipe": [...] }`.
/// The support team is a set, so repeated adds cannot introduce duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Payment destination string shown in purchase tickets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
    /// The human authorized to approve payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    /// Members granted visibility into every new ticket channel.
    #[serde(default, rename = "equipe")]
    pub support_team: BTreeSet<UserId>,
}

/// Guild-keyed settings store with wholesale JSON persistence.
pub struct GuildStore {
    guilds: DashMap<GuildId, GuildSettings>,
    path: PathBuf,
    // Serializes the rewrite; mutations themselves go through the DashMap.
    write_lock: Mutex<()>,
}

impl GuildStore {
    /// Load the store from `path`. A missing or unreadable document yields an
    /// empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let guilds = DashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, GuildSettings>>(&content) {
                Ok(parsed) => {
                    for (raw_id, settings) in parsed {
                        match raw_id.parse::<u64>() {
                            Ok(id) => {
                                guilds.insert(GuildId(id), settings);
                            }
                            Err(_) => {
                                warn!(key = %raw_id, "Skipping non-numeric guild key");
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Guild settings unreadable, starting empty");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Guild settings unreadable, starting empty");
            }
        }

        Self {
            guilds,
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Snapshot of a guild's settings (defaults if the guild is unknown).
    pub fn settings(&self, guild: GuildId) -> GuildSettings {
        self.guilds
            .get(&guild)
            .map(|s| s.value().clone())
            .unwrap_or_default()
    }

    /// The guild's configured payment key.
    pub fn pix_key(&self, guild: GuildId) -> Option<String> {
        self.guilds.get(&guild).and_then(|s| s.pix_key.clone())
    }

    /// The guild's configured payment approver.
    pub fn owner(&self, guild: GuildId) -> Option<UserId> {
        self.guilds.get(&guild).and_then(|s| s.owner_id)
    }

    /// Set the guild's payment key.
    pub fn set_pix_key(&self, guild: GuildId, key: String) {
        self.guilds.entry(guild).or_default().pix_key = Some(key);
        self.persist();
    }

    /// Register the guild's payment approver.
    pub fn set_owner(&self, guild: GuildId, owner: UserId) {
        self.guilds.entry(guild).or_default().owner_id = Some(owner);
        self.persist();
    }

    /// Add a member to the support team. Returns false if already present
    /// (nothing persisted).
    pub fn add_support(&self, guild: GuildId, user: UserId) -> bool {
        let inserted = self.guilds.entry(guild).or_default().support_team.insert(user);
        if inserted {
            self.persist();
        }
        inserted
    }

    /// Remove a member from the support team. Returns false if not a member
    /// (nothing persisted).
    pub fn remove_support(&self, guild: GuildId, user: UserId) -> bool {
        let removed = match self.guilds.get_mut(&guild) {
            Some(mut settings) => settings.support_team.remove(&user),
            None => false,
        };
        if removed {
            self.persist();
        }
        removed
    }

    /// The guild's support team, in id order.
    pub fn support_team(&self, guild: GuildId) -> Vec<UserId> {
        self.guilds
            .get(&guild)
            .map(|s| s.support_team.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Rewrite the whole document.
    fn persist(&self) {
        let _guard = self.write_lock.lock();
        let snapshot: BTreeMap<String, GuildSettings> = self
            .guilds
            .iter()
            .map(|entry| (entry.key().to_string(), entry.value().clone()))
            .collect();
        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize guild settings");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            error!(path = %self.path.display(), error = %e, "Failed to persist guild settings");
        }
    }
}
