//! Ticket records.

use balcao_platform::{ChannelId, GuildId, UserId};
use chrono::{DateTime, Utc};

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    /// The ticket channel is active.
    Open,
    /// The ticket has been closed and its channel archived.
    Closed,
}

impl TicketStatus {
    /// User-visible status label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "🟢 Aberto",
            Self::Closed => "🔴 Fechado",
        }
    }
}

/// What a ticket is about.
///
/// The panel buttons map to the fixed categories; tickets opened through the
/// structured prompt carry the requester's free-text subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketCategory {
    Duvida,
    Atendimento,
    Suporte,
    Reclamacao,
    PedirUper,
    Compra,
    /// Free-text subject from the ticket prompt.
    Livre(String),
}

impl TicketCategory {
    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Duvida => "Dúvida",
            Self::Atendimento => "Atendimento",
            Self::Suporte => "Suporte",
            Self::Reclamacao => "Reclamação",
            Self::PedirUper => "Pedir Uper",
            Self::Compra => "Compra",
            Self::Livre(subject) => subject,
        }
    }

    /// Emoji shown next to the label.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Duvida => "❓",
            Self::Atendimento => "👤",
            Self::Suporte => "🛠️",
            Self::Reclamacao => "⚠️",
            Self::PedirUper => "👑",
            Self::Compra => "💳",
            Self::Livre(_) => "🎫",
        }
    }

    /// Stable slug carried in panel-button actions.
    pub fn slug(&self) -> &str {
        match self {
            Self::Duvida => "duvida",
            Self::Atendimento => "atendimento",
            Self::Suporte => "suporte",
            Self::Reclamacao => "reclamacao",
            Self::PedirUper => "pedir_uper",
            Self::Compra => "compra",
            Self::Livre(subject) => subject,
        }
    }

    /// Resolve a panel-button slug back to its category.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "duvida" => Some(Self::Duvida),
            "atendimento" => Some(Self::Atendimento),
            "suporte" => Some(Self::Suporte),
            "reclamacao" => Some(Self::Reclamacao),
            "pedir_uper" => Some(Self::PedirUper),
            "compra" => Some(Self::Compra),
            _ => None,
        }
    }

    /// Channel name prefix; purchase channels get their own namespace.
    pub fn channel_prefix(&self) -> &'static str {
        match self {
            Self::Compra => "pix",
            _ => "ticket",
        }
    }
}

/// Purchase payload of a paid-role ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseInfo {
    /// Name of the role being sold.
    pub role_name: String,
    /// Subscription length in months.
    pub months: u32,
    /// Display price, if the seller set one.
    pub price_label: Option<String>,
}

/// One ticket: a dedicated channel tracking one user's request.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// The dedicated channel, primary key in the registry.
    pub channel: ChannelId,
    /// Guild the ticket belongs to.
    pub guild: GuildId,
    /// The requester.
    pub owner: UserId,
    /// The requester's display name at creation time.
    pub owner_name: String,
    /// What the ticket is about.
    pub category: TicketCategory,
    /// Free-text description from the structured prompt.
    pub description: Option<String>,
    /// Lifecycle state.
    pub status: TicketStatus,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Purchase payload, present on paid-role tickets only.
    pub purchase: Option<PurchaseInfo>,
}
