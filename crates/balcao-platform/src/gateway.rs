//! The gateway capability trait: every platform primitive the engine invokes.

use crate::ids::{ChannelId, GuildId, InteractionId, RoleId, UserId};
use crate::message::{Color, OutboundMessage};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a platform call.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform rejected or failed the request.
    #[error("platform request failed: {0}")]
    Request(String),
    /// The message target cannot be reached (e.g. the user disabled direct
    /// messages).
    #[error("message target unreachable")]
    Unreachable,
    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Destination of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTarget {
    /// A guild text channel.
    Channel(ChannelId),
    /// A user's direct-message channel.
    User(UserId),
}

/// Principal a channel permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionTarget {
    /// The guild's default role (everyone).
    Everyone,
    /// A single member.
    User(UserId),
}

/// View/send access granted or denied as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelAccess {
    /// Allow viewing the channel and sending messages.
    Allow,
    /// Deny viewing the channel and sending messages.
    Deny,
}

/// Basic profile of a resolved user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// The user's id.
    pub id: UserId,
    /// The user's account name.
    pub name: String,
}

/// Platform primitives consumed by the workflow engine.
///
/// Every method is an opaque capability call with a success/failure outcome;
/// the engine decides per call site whether a failure aborts, degrades, or is
/// swallowed.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Create a guild text channel with a descriptive topic.
    async fn create_text_channel(
        &self,
        guild: GuildId,
        name: &str,
        topic: &str,
    ) -> Result<ChannelId, PlatformError>;

    /// Set view/send access on a channel for one principal.
    async fn set_permission(
        &self,
        channel: ChannelId,
        target: PermissionTarget,
        access: ChannelAccess,
    ) -> Result<(), PlatformError>;

    /// Archive or un-archive a channel.
    async fn set_archived(&self, channel: ChannelId, archived: bool) -> Result<(), PlatformError>;

    /// Deliver a message to a channel or a user's DMs.
    async fn send(&self, target: MessageTarget, message: OutboundMessage)
    -> Result<(), PlatformError>;

    /// Respond to an inbound interaction, optionally visible only to the
    /// invoker.
    async fn respond(
        &self,
        interaction: InteractionId,
        message: OutboundMessage,
        ephemeral: bool,
    ) -> Result<(), PlatformError>;

    /// Resolve a user's profile by id.
    async fn resolve_user(&self, user: UserId) -> Result<UserProfile, PlatformError>;

    /// Whether the user is currently a member of the guild.
    async fn member_exists(&self, guild: GuildId, user: UserId) -> Result<bool, PlatformError>;

    /// Find a guild role by exact name.
    async fn find_role(&self, guild: GuildId, name: &str)
    -> Result<Option<RoleId>, PlatformError>;

    /// Create a guild role.
    async fn create_role(
        &self,
        guild: GuildId,
        name: &str,
        color: Color,
    ) -> Result<RoleId, PlatformError>;

    /// Grant a role to a guild member.
    async fn grant_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> Result<(), PlatformError>;
}
