//! Unified error handling for the workflow engine.
//!
//! Every top-level interaction handler resolves a `WorkflowError` at its own
//! boundary: the error is logged with its `error_code()` label and converted
//! into a private, human-readable notice to the invoker. Nothing propagates
//! past the dispatcher.

use balcao_platform::{ActionParseError, ChannelId, PlatformError};
use thiserror::Error;

/// Errors that can occur while driving a ticket or payment workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requester already has an open ticket in this guild.
    #[error("requester already has an open ticket")]
    DuplicateOpenTicket,

    /// The operation was invoked outside a ticket channel.
    #[error("channel {0} is not a ticket")]
    UnknownTicket(ChannelId),

    /// A ticket is already registered under this channel id.
    #[error("channel {0} is already registered")]
    DuplicateChannel(ChannelId),

    /// An external platform call failed.
    #[error("platform call failed: {0}")]
    Platform(#[from] PlatformError),

    /// A required guild setting is absent.
    #[error("missing configuration: {0}")]
    ConfigurationMissing(&'static str),

    /// Malformed invoker-supplied input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<ActionParseError> for WorkflowError {
    fn from(err: ActionParseError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl WorkflowError {
    /// Static error code for log labeling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateOpenTicket => "duplicate_open_ticket",
            Self::UnknownTicket(_) => "unknown_ticket",
            Self::DuplicateChannel(_) => "duplicate_channel",
            Self::Platform(_) => "platform_error",
            Self::ConfigurationMissing(_) => "configuration_missing",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    /// The private notice shown to the invoker when this error reaches the
    /// dispatch boundary.
    pub fn user_notice(&self) -> String {
        match self {
            Self::DuplicateOpenTicket => "❌ Você já tem um ticket aberto!".to_string(),
            Self::UnknownTicket(_) => "❌ Este não é um canal de ticket!".to_string(),
            Self::DuplicateChannel(_) | Self::Platform(_) => {
                "❌ Erro ao processar! Tente novamente.".to_string()
            }
            Self::ConfigurationMissing(what) => format!("❌ Nenhuma {what} configurada!"),
            Self::InvalidInput(msg) => format!("❌ {msg}"),
        }
    }
}
