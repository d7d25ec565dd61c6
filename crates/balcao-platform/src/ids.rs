//! Opaque platform identifiers.
//!
//! All platform entities are addressed by numeric snowflake-style ids. The
//! newtypes keep guild, channel, user and role ids from being mixed up at
//! call sites; the `mention()` helpers render the platform's inline mention
//! syntax for user-visible text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! platform_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map($name)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }
    };
}

platform_id! {
    /// Identifier of a guild (a served community).
    GuildId
}

platform_id! {
    /// Identifier of a text channel inside a guild.
    ChannelId
}

platform_id! {
    /// Identifier of a platform user.
    UserId
}

platform_id! {
    /// Identifier of a guild role.
    RoleId
}

platform_id! {
    /// Identifier of one inbound interaction (command invocation or control
    /// click); responses are addressed to it.
    InteractionId
}

impl UserId {
    /// Inline mention for user-visible text.
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}

impl ChannelId {
    /// Inline mention for user-visible text.
    pub fn mention(self) -> String {
        format!("<#{}>", self.0)
    }
}
