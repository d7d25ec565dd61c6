//! # balcao-platform
//!
//! Platform vocabulary for the Balcao workflow engine.
//!
//! The engine never talks to a messaging platform directly. It speaks in
//! terms of the types in this crate — opaque identifiers, notices and
//! interactive controls, typed interaction actions — and invokes platform
//! primitives through the [`Gateway`] capability trait. A deployment plugs in
//! a gateway backed by a real platform client; the engine's test suite plugs
//! in an in-memory recorder.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod action;
mod gateway;
mod ids;
mod message;

pub use action::{Action, ActionParseError, PaymentClaim};
pub use gateway::{
    ChannelAccess, Gateway, MessageTarget, PermissionTarget, PlatformError, UserProfile,
};
pub use ids::{ChannelId, GuildId, InteractionId, RoleId, UserId};
pub use message::{Attachment, Color, Control, ControlStyle, Notice, NoticeField, OutboundMessage};
