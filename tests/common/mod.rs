//! Integration test common infrastructure.
//!
//! Provides an in-memory gateway that records every platform call the engine
//! makes, plus a harness that builds an isolated desk per test.

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use balcao::handlers::Context;
use balcao::platform::{
    ChannelAccess, ChannelId, Color, Gateway, GuildId, InteractionId, MessageTarget,
    OutboundMessage, PermissionTarget, PlatformError, RoleId, UserId, UserProfile,
};
use balcao::{Config, Desk};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A channel the fake platform created.
#[derive(Debug, Clone)]
pub struct CreatedChannel {
    pub guild: GuildId,
    pub id: ChannelId,
    pub name: String,
    pub topic: String,
}

/// One recorded permission call.
#[derive(Debug, Clone)]
pub struct PermissionCall {
    pub channel: ChannelId,
    pub target: PermissionTarget,
    pub access: ChannelAccess,
}

/// One recorded channel/DM delivery.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub target: MessageTarget,
    pub message: OutboundMessage,
}

/// One recorded interaction response.
#[derive(Debug, Clone)]
pub struct RecordedResponse {
    pub interaction: InteractionId,
    pub message: OutboundMessage,
    pub ephemeral: bool,
}

/// In-memory platform double. Records every call; failure switches make
/// individual capabilities refuse.
#[derive(Default)]
pub struct FakeGateway {
    channel_counter: AtomicU64,
    role_counter: AtomicU64,

    pub channels: Mutex<Vec<CreatedChannel>>,
    pub permissions: Mutex<Vec<PermissionCall>>,
    pub archived: Mutex<Vec<(ChannelId, bool)>>,
    pub sent: Mutex<Vec<SentMessage>>,
    pub responses: Mutex<Vec<RecordedResponse>>,
    pub granted: Mutex<Vec<(GuildId, UserId, RoleId)>>,

    /// Resolvable user profiles.
    pub users: Mutex<HashMap<UserId, String>>,
    /// Current guild members.
    pub members: Mutex<HashSet<(GuildId, UserId)>>,
    /// Existing roles by (guild, exact name).
    pub roles: Mutex<HashMap<(GuildId, String), RoleId>>,

    pub fail_channel_create: AtomicBool,
    pub fail_role_create: AtomicBool,
    pub fail_role_grant: AtomicBool,
    /// Refuse any send carrying an attachment (banner-upload failure).
    pub fail_attachment_sends: AtomicBool,
    /// Users whose DMs are closed.
    pub unreachable_dms: Mutex<HashSet<UserId>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&self, guild: GuildId, user: UserId, name: &str) {
        self.members.lock().insert((guild, user));
        self.users.lock().insert(user, name.to_string());
    }

    pub fn add_role(&self, guild: GuildId, name: &str, role: RoleId) {
        self.roles.lock().insert((guild, name.to_string()), role);
    }

    /// Last interaction response, panicking if none was recorded.
    pub fn last_response(&self) -> RecordedResponse {
        self.responses
            .lock()
            .last()
            .cloned()
            .expect("no response recorded")
    }

    /// Text of the last response (plain text or notice title).
    pub fn last_response_text(&self) -> String {
        let response = self.last_response();
        if let Some(text) = response.message.text {
            return text;
        }
        if let Some(notice) = response.message.notice {
            return notice.title;
        }
        String::new()
    }

    /// Messages delivered to a user's DMs.
    pub fn dms_to(&self, user: UserId) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|s| s.target == MessageTarget::User(user))
            .map(|s| s.message.clone())
            .collect()
    }

    /// Messages posted into a channel.
    pub fn channel_messages(&self, channel: ChannelId) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|s| s.target == MessageTarget::Channel(channel))
            .map(|s| s.message.clone())
            .collect()
    }
}

fn has_attachment(message: &OutboundMessage) -> bool {
    message
        .notice
        .as_ref()
        .is_some_and(|n| n.attachment.is_some())
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn create_text_channel(
        &self,
        guild: GuildId,
        name: &str,
        topic: &str,
    ) -> Result<ChannelId, PlatformError> {
        if self.fail_channel_create.load(Ordering::Relaxed) {
            return Err(PlatformError::Request("channel creation refused".into()));
        }
        let id = ChannelId(1000 + self.channel_counter.fetch_add(1, Ordering::Relaxed));
        self.channels.lock().push(CreatedChannel {
            guild,
            id,
            name: name.to_string(),
            topic: topic.to_string(),
        });
        Ok(id)
    }

    async fn set_permission(
        &self,
        channel: ChannelId,
        target: PermissionTarget,
        access: ChannelAccess,
    ) -> Result<(), PlatformError> {
        self.permissions.lock().push(PermissionCall {
            channel,
            target,
            access,
        });
        Ok(())
    }

    async fn set_archived(&self, channel: ChannelId, archived: bool) -> Result<(), PlatformError> {
        self.archived.lock().push((channel, archived));
        Ok(())
    }

    async fn send(
        &self,
        target: MessageTarget,
        message: OutboundMessage,
    ) -> Result<(), PlatformError> {
        if self.fail_attachment_sends.load(Ordering::Relaxed) && has_attachment(&message) {
            return Err(PlatformError::Request("attachment upload failed".into()));
        }
        if let MessageTarget::User(user) = target {
            if self.unreachable_dms.lock().contains(&user) {
                return Err(PlatformError::Unreachable);
            }
        }
        self.sent.lock().push(SentMessage { target, message });
        Ok(())
    }

    async fn respond(
        &self,
        interaction: InteractionId,
        message: OutboundMessage,
        ephemeral: bool,
    ) -> Result<(), PlatformError> {
        self.responses.lock().push(RecordedResponse {
            interaction,
            message,
            ephemeral,
        });
        Ok(())
    }

    async fn resolve_user(&self, user: UserId) -> Result<UserProfile, PlatformError> {
        match self.users.lock().get(&user) {
            Some(name) => Ok(UserProfile {
                id: user,
                name: name.clone(),
            }),
            None => Err(PlatformError::NotFound(user.to_string())),
        }
    }

    async fn member_exists(&self, guild: GuildId, user: UserId) -> Result<bool, PlatformError> {
        Ok(self.members.lock().contains(&(guild, user)))
    }

    async fn find_role(
        &self,
        guild: GuildId,
        name: &str,
    ) -> Result<Option<RoleId>, PlatformError> {
        Ok(self.roles.lock().get(&(guild, name.to_string())).copied())
    }

    async fn create_role(
        &self,
        guild: GuildId,
        name: &str,
        _color: Color,
    ) -> Result<RoleId, PlatformError> {
        if self.fail_role_create.load(Ordering::Relaxed) {
            return Err(PlatformError::Request("role creation refused".into()));
        }
        let id = RoleId(500 + self.role_counter.fetch_add(1, Ordering::Relaxed));
        self.roles.lock().insert((guild, name.to_string()), id);
        Ok(id)
    }

    async fn grant_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> Result<(), PlatformError> {
        if self.fail_role_grant.load(Ordering::Relaxed) {
            return Err(PlatformError::Request("role grant refused".into()));
        }
        self.granted.lock().push((guild, user, role));
        Ok(())
    }
}

/// One isolated desk + gateway per test.
pub struct Harness {
    pub desk: Desk,
    pub gateway: FakeGateway,
    interaction_counter: AtomicU64,
    _dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        // RUST_LOG=debug surfaces engine logs for a failing test.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();

        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = Config::default();
        config.storage.guilds_file = dir.path().join("guilds.json");
        tweak(&mut config);
        Self {
            desk: Desk::new(config),
            gateway: FakeGateway::new(),
            interaction_counter: AtomicU64::new(0),
            _dir: dir,
        }
    }

    /// Context for a regular member interacting from `channel`.
    pub fn ctx_in(&self, guild: GuildId, user: UserId, name: &str, channel: ChannelId) -> Context<'_> {
        Context {
            desk: &self.desk,
            gateway: &self.gateway,
            interaction: InteractionId(self.interaction_counter.fetch_add(1, Ordering::Relaxed)),
            guild,
            channel,
            invoker: user,
            invoker_name: name.to_string(),
            invoker_is_admin: false,
        }
    }

    /// Context for a regular member (channel irrelevant).
    pub fn ctx(&self, guild: GuildId, user: UserId, name: &str) -> Context<'_> {
        self.ctx_in(guild, user, name, ChannelId(1))
    }

    /// Context for a guild administrator.
    pub fn admin_ctx(&self, guild: GuildId, user: UserId, name: &str) -> Context<'_> {
        let mut ctx = self.ctx(guild, user, name);
        ctx.invoker_is_admin = true;
        ctx
    }
}
