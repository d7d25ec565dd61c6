//! The ticket registry: channel-keyed ticket records, the one-open-ticket
//! invariant, and sequence numbering for channel names.
//!
//! The open-ticket invariant is enforced with an atomic compare-and-insert on
//! the `(guild, owner)` index: creation reserves the slot before any external
//! call, so two concurrent creation attempts from the same user cannot both
//! pass the duplicate check. A reservation that never gets a channel bound to
//! it (channel creation failed) is released when its [`OpenSlot`] drops.

use crate::error::WorkflowError;
use crate::state::ticket::{Ticket, TicketStatus};
use balcao_platform::{ChannelId, GuildId, UserId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

/// Value of one `(guild, owner)` open-index slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenEntry {
    /// Creation in flight; no channel yet.
    Reserved,
    /// Open ticket bound to this channel.
    Bound(ChannelId),
}

/// Open/closed totals for the stats command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketCounts {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
}

/// Central mapping from channel id to ticket record.
///
/// Shared across all interaction tasks; values are cloned out so no shard
/// guard is ever held across an `.await`.
pub struct TicketRegistry {
    tickets: DashMap<ChannelId, Ticket>,
    open_index: DashMap<(GuildId, UserId), OpenEntry>,
    sequence: AtomicU64,
}

impl Default for TicketRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tickets: DashMap::new(),
            open_index: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Whether the user currently has an open (or in-creation) ticket in the
    /// guild.
    pub fn has_open_ticket(&self, guild: GuildId, user: UserId) -> bool {
        self.open_index.contains_key(&(guild, user))
    }

    /// Next ticket sequence number. Strictly increasing, never reused, even
    /// across closures.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Atomically reserve the open-ticket slot for `(guild, user)`.
    ///
    /// Fails with [`WorkflowError::DuplicateOpenTicket`] if the user already
    /// holds an open ticket or another creation is in flight. The returned
    /// guard releases the reservation on drop unless a ticket is registered
    /// against it.
    pub fn reserve(&self, guild: GuildId, user: UserId) -> Result<OpenSlot<'_>, WorkflowError> {
        match self.open_index.entry((guild, user)) {
            Entry::Occupied(_) => Err(WorkflowError::DuplicateOpenTicket),
            Entry::Vacant(slot) => {
                slot.insert(OpenEntry::Reserved);
                Ok(OpenSlot {
                    registry: self,
                    key: (guild, user),
                    bound: false,
                })
            }
        }
    }

    /// Insert a freshly created ticket and bind it to its reservation.
    ///
    /// The channel id must be unused; a collision means the platform handed
    /// out a duplicate channel and the ticket is rejected.
    pub fn register(&self, ticket: Ticket, mut slot: OpenSlot<'_>) -> Result<(), WorkflowError> {
        debug_assert_eq!(slot.key, (ticket.guild, ticket.owner));
        let channel = ticket.channel;
        match self.tickets.entry(channel) {
            Entry::Occupied(_) => Err(WorkflowError::DuplicateChannel(channel)),
            Entry::Vacant(entry) => {
                entry.insert(ticket);
                self.open_index.insert(slot.key, OpenEntry::Bound(channel));
                slot.bound = true;
                Ok(())
            }
        }
    }

    /// Look up a ticket by channel id.
    pub fn get(&self, channel: ChannelId) -> Option<Ticket> {
        self.tickets.get(&channel).map(|t| t.value().clone())
    }

    /// Transition a ticket's status, maintaining the open index.
    ///
    /// Reopening re-reserves the owner's slot and fails with
    /// [`WorkflowError::DuplicateOpenTicket`] if the owner opened another
    /// ticket after this one was closed.
    pub fn set_status(
        &self,
        channel: ChannelId,
        status: TicketStatus,
    ) -> Result<Ticket, WorkflowError> {
        let (guild, owner) = {
            let ticket = self
                .tickets
                .get(&channel)
                .ok_or(WorkflowError::UnknownTicket(channel))?;
            (ticket.guild, ticket.owner)
        };

        match status {
            TicketStatus::Open => match self.open_index.entry((guild, owner)) {
                Entry::Occupied(entry) if *entry.get() != OpenEntry::Bound(channel) => {
                    return Err(WorkflowError::DuplicateOpenTicket);
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(OpenEntry::Bound(channel));
                }
            },
            TicketStatus::Closed => {
                self.open_index
                    .remove_if(&(guild, owner), |_, entry| *entry == OpenEntry::Bound(channel));
            }
        }

        let mut ticket = self
            .tickets
            .get_mut(&channel)
            .ok_or(WorkflowError::UnknownTicket(channel))?;
        ticket.status = status;
        Ok(ticket.value().clone())
    }

    /// Open/closed totals across the registry.
    pub fn counts(&self) -> TicketCounts {
        let total = self.tickets.len();
        let open = self
            .tickets
            .iter()
            .filter(|t| t.value().status == TicketStatus::Open)
            .count();
        TicketCounts {
            total,
            open,
            closed: total - open,
        }
    }
}

/// Reservation of a `(guild, user)` open-ticket slot during creation.
///
/// Released on drop unless [`TicketRegistry::register`] bound a ticket to it.
pub struct OpenSlot<'a> {
    registry: &'a TicketRegistry,
    key: (GuildId, UserId),
    bound: bool,
}

impl Drop for OpenSlot<'_> {
    fn drop(&mut self) {
        if !self.bound {
            self.registry
                .open_index
                .remove_if(&self.key, |_, entry| *entry == OpenEntry::Reserved);
        }
    }
}
