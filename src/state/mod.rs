//! Engine state: the ticket registry, guild settings, and the shared `Desk`.

mod guilds;
mod registry;
mod ticket;

pub use guilds::{GuildSettings, GuildStore};
pub use registry::{OpenSlot, TicketCounts, TicketRegistry};
pub use ticket::{PurchaseInfo, Ticket, TicketCategory, TicketStatus};

use crate::config::Config;

/// Shared engine state, passed as `Arc<Desk>` into every handler.
///
/// Replaces process-global dictionaries with one explicitly owned object so
/// tests can build isolated desks.
pub struct Desk {
    /// Static process configuration.
    pub config: Config,
    /// Volatile ticket state.
    pub registry: TicketRegistry,
    /// Durable per-guild settings.
    pub guilds: GuildStore,
}

impl Desk {
    /// Build a desk from configuration, loading guild settings from disk.
    pub fn new(config: Config) -> Self {
        let guilds = GuildStore::load(&config.storage.guilds_file);
        Self {
            config,
            registry: TicketRegistry::new(),
            guilds,
        }
    }
}
