//! Interaction handlers.
//!
//! One inbound interaction — a slash command or a control click — is one unit
//! of work. The platform collaborator decodes its event into an
//! [`Interaction`], builds a [`Context`] with the shared [`Desk`] and its
//! gateway, and calls [`dispatch`]. Every failure is resolved here: logged
//! with its error code and converted into a private notice to the invoker.
//! Nothing propagates past this boundary.

mod admin;
mod approval;
mod panels;
mod purchase;
mod ticket;

pub use approval::expiry_after;

use crate::error::WorkflowError;
use crate::state::{Desk, TicketCategory};
use balcao_platform::{
    Action, ChannelId, Gateway, GuildId, InteractionId, OutboundMessage, UserId,
};
use tracing::{debug, warn};

/// Handler context passed to each interaction handler.
pub struct Context<'a> {
    /// Shared engine state.
    pub desk: &'a Desk,
    /// Platform capabilities.
    pub gateway: &'a dyn Gateway,
    /// The inbound interaction being answered.
    pub interaction: InteractionId,
    /// Guild the interaction came from.
    pub guild: GuildId,
    /// Channel the interaction came from.
    pub channel: ChannelId,
    /// The invoking user.
    pub invoker: UserId,
    /// The invoking user's display name.
    pub invoker_name: String,
    /// Whether the invoker holds administrator privilege in the guild.
    pub invoker_is_admin: bool,
}

impl Context<'_> {
    /// Respond to the interaction with plain text.
    pub async fn respond_text(
        &self,
        text: impl Into<String>,
        ephemeral: bool,
    ) -> Result<(), WorkflowError> {
        self.respond(OutboundMessage::text(text), ephemeral).await
    }

    /// Respond to the interaction.
    pub async fn respond(
        &self,
        message: OutboundMessage,
        ephemeral: bool,
    ) -> Result<(), WorkflowError> {
        self.gateway
            .respond(self.interaction, message, ephemeral)
            .await?;
        Ok(())
    }
}

/// A slash command, already decoded by the platform collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `painel` — post the category panel.
    ShowTicketPanel,
    /// `pedir_uper` — post the uper panel.
    ShowUperPanel,
    /// `criar_ticket` prompt submission.
    OpenTicket {
        subject: String,
        description: String,
    },
    /// `fechar_ticket` — close the current ticket.
    CloseTicket,
    /// `reabrir` — reopen the current ticket.
    ReopenTicket,
    /// `stats` — open/closed counts.
    Stats,
    /// `pix` — post a purchase panel.
    ShowPurchasePanel {
        role_name: String,
        months: u32,
        price_label: Option<String>,
    },
    /// `configurar_pix` — set the guild payment key.
    SetPixKey { key: String },
    /// `registrar_dono` — register the payment approver.
    RegisterOwner { raw_id: String },
    /// `adicionar_equipe` — add a support-team member.
    AddSupport { user: UserId },
    /// `remover_equipe` — remove a support-team member.
    RemoveSupport { user: UserId },
    /// `listar_equipe` — list the support team.
    ListSupport,
    /// `mensagem` — post a custom message in the current channel.
    Broadcast {
        title: String,
        text: String,
        as_notice: bool,
    },
}

/// One inbound interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Slash command invocation.
    Command(Command),
    /// Control click with its decoded action.
    Control(Action),
}

impl Interaction {
    /// Decode a raw control id into an interaction.
    pub fn from_control_id(raw: &str) -> Result<Self, WorkflowError> {
        Ok(Self::Control(raw.parse::<Action>()?))
    }
}

/// Dispatch one interaction, resolving every failure at this boundary.
pub async fn dispatch(ctx: &Context<'_>, interaction: Interaction) {
    if let Err(e) = route(ctx, interaction).await {
        warn!(
            code = e.error_code(),
            guild = %ctx.guild,
            invoker = %ctx.invoker,
            error = %e,
            "Interaction failed"
        );
        if let Err(notice_err) = ctx.respond_text(e.user_notice(), true).await {
            debug!(error = %notice_err, "Failed to deliver failure notice");
        }
    }
}

async fn route(ctx: &Context<'_>, interaction: Interaction) -> Result<(), WorkflowError> {
    match interaction {
        Interaction::Command(command) => route_command(ctx, command).await,
        Interaction::Control(action) => route_action(ctx, action).await,
    }
}

async fn route_command(ctx: &Context<'_>, command: Command) -> Result<(), WorkflowError> {
    match command {
        Command::ShowTicketPanel => panels::ticket_panel(ctx).await,
        Command::ShowUperPanel => panels::uper_panel(ctx).await,
        Command::OpenTicket {
            subject,
            description,
        } => ticket::open_from_prompt(ctx, subject, description).await,
        Command::CloseTicket => ticket::close(ctx).await,
        Command::ReopenTicket => ticket::reopen(ctx).await,
        Command::Stats => {
            if !require_admin(ctx).await? {
                return Ok(());
            }
            ticket::stats(ctx).await
        }
        Command::ShowPurchasePanel {
            role_name,
            months,
            price_label,
        } => {
            if !require_admin(ctx).await? {
                return Ok(());
            }
            panels::purchase_panel(ctx, role_name, months, price_label).await
        }
        Command::SetPixKey { key } => {
            if !require_admin(ctx).await? {
                return Ok(());
            }
            admin::set_pix_key(ctx, key).await
        }
        Command::RegisterOwner { raw_id } => {
            if !require_admin(ctx).await? {
                return Ok(());
            }
            admin::register_owner(ctx, &raw_id).await
        }
        Command::AddSupport { user } => {
            if !require_admin(ctx).await? {
                return Ok(());
            }
            admin::add_support(ctx, user).await
        }
        Command::RemoveSupport { user } => {
            if !require_admin(ctx).await? {
                return Ok(());
            }
            admin::remove_support(ctx, user).await
        }
        Command::ListSupport => admin::list_support(ctx).await,
        Command::Broadcast {
            title,
            text,
            as_notice,
        } => {
            if !require_admin(ctx).await? {
                return Ok(());
            }
            admin::broadcast(ctx, title, text, as_notice).await
        }
    }
}

async fn route_action(ctx: &Context<'_>, action: Action) -> Result<(), WorkflowError> {
    match action {
        Action::OpenTicket { category } => {
            let category = TicketCategory::from_slug(&category).ok_or_else(|| {
                WorkflowError::InvalidInput("Categoria desconhecida!".to_string())
            })?;
            ticket::open_from_panel(ctx, category).await
        }
        Action::CloseTicket => ticket::close(ctx).await,
        Action::CopyPix => purchase::copy_pix(ctx).await,
        Action::Purchase {
            months,
            price_label,
            role_name,
        } => purchase::start_purchase(ctx, role_name, months, price_label).await,
        Action::ClaimPayment {
            buyer,
            months,
            role_name,
        } => approval::claim(ctx, buyer, months, role_name).await,
        Action::ApprovePayment(claim) => approval::approve(ctx, claim).await,
        Action::RejectPayment(claim) => approval::reject(ctx, claim).await,
    }
}

/// Reject non-administrators with the product notice. Returns whether the
/// invoker may proceed.
async fn require_admin(ctx: &Context<'_>) -> Result<bool, WorkflowError> {
    if ctx.invoker_is_admin {
        return Ok(true);
    }
    ctx.respond_text("❌ Apenas administradores!", true).await?;
    Ok(false)
}
