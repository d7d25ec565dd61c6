//! Ticket lifecycle: creation protocol, close, reopen, counts.

use super::Context;
use crate::error::WorkflowError;
use crate::state::{PurchaseInfo, Ticket, TicketCategory, TicketStatus};
use balcao_platform::{
    Action, ChannelAccess, ChannelId, Color, Control, ControlStyle, MessageTarget, Notice,
    OutboundMessage, PermissionTarget,
};
use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, info, warn};

/// The close-ticket button attached to every intro notice.
fn close_control() -> Control {
    Control::new("Fechar Ticket", ControlStyle::Danger, Action::CloseTicket).emoji("🔒")
}

/// Shared creation protocol for category, prompt and purchase tickets.
///
/// Reserves the invoker's open-ticket slot, creates and registers the
/// channel, then scopes its visibility. The reservation is released
/// automatically if channel creation fails; permission failures are
/// best-effort and leave a registered, possibly over-permissioned ticket.
pub(super) async fn create_ticket_channel(
    ctx: &Context<'_>,
    category: TicketCategory,
    description: Option<String>,
    purchase: Option<PurchaseInfo>,
) -> Result<ChannelId, WorkflowError> {
    let slot = ctx.desk.registry.reserve(ctx.guild, ctx.invoker)?;

    let sequence = ctx.desk.registry.next_sequence();
    let name = format!("{}-{}", category.channel_prefix(), sequence);
    let topic = match (&purchase, &category) {
        (Some(info), _) => format!("Compra de {} - {}", info.role_name, ctx.invoker_name),
        (None, TicketCategory::Livre(subject)) => {
            format!("Ticket do usuário {} - {}", ctx.invoker.mention(), subject)
        }
        (None, _) => format!("{} - {}", category.label(), ctx.invoker.mention()),
    };

    let channel = ctx
        .gateway
        .create_text_channel(ctx.guild, &name, &topic)
        .await?;

    // Register before permission work: a failure past this point still
    // leaves a discoverable ticket.
    let ticket = Ticket {
        channel,
        guild: ctx.guild,
        owner: ctx.invoker,
        owner_name: ctx.invoker_name.clone(),
        category,
        description,
        status: TicketStatus::Open,
        created_at: Utc::now(),
        purchase,
    };
    ctx.desk.registry.register(ticket, slot)?;

    configure_visibility(ctx, channel).await;
    info!(guild = %ctx.guild, owner = %ctx.invoker, channel = %channel, name = %name, "Ticket created");
    Ok(channel)
}

/// Scope the new channel: everyone out, owner and support team in.
///
/// Each grant is attempted independently; one failure never aborts the rest.
async fn configure_visibility(ctx: &Context<'_>, channel: ChannelId) {
    if let Err(e) = ctx
        .gateway
        .set_permission(channel, PermissionTarget::Everyone, ChannelAccess::Deny)
        .await
    {
        warn!(channel = %channel, error = %e, "Failed to lock channel for everyone");
    }

    if let Err(e) = ctx
        .gateway
        .set_permission(
            channel,
            PermissionTarget::User(ctx.invoker),
            ChannelAccess::Allow,
        )
        .await
    {
        warn!(channel = %channel, owner = %ctx.invoker, error = %e, "Failed to grant ticket owner");
    }

    let team = ctx.desk.guilds.support_team(ctx.guild);
    let grants = team.into_iter().map(|member| async move {
        let present = match ctx.gateway.member_exists(ctx.guild, member).await {
            Ok(present) => present,
            Err(e) => {
                warn!(member = %member, error = %e, "Could not resolve support member");
                return;
            }
        };
        if !present {
            return;
        }
        if let Err(e) = ctx
            .gateway
            .set_permission(channel, PermissionTarget::User(member), ChannelAccess::Allow)
            .await
        {
            warn!(channel = %channel, member = %member, error = %e, "Failed to grant support member");
        }
    });
    join_all(grants).await;
}

/// Open a ticket from the structured prompt (subject + description).
pub(super) async fn open_from_prompt(
    ctx: &Context<'_>,
    subject: String,
    description: String,
) -> Result<(), WorkflowError> {
    let created = async {
        let channel = create_ticket_channel(
            ctx,
            TicketCategory::Livre(subject.clone()),
            Some(description.clone()),
            None,
        )
        .await?;

        let notice = Notice::new(format!("🎫 {subject}"), Color::Purple)
            .body(description.clone())
            .field("Usuário", ctx.invoker.mention(), true)
            .field("Status", TicketStatus::Open.label(), true)
            .footer(format!("Ticket ID: {channel}"));
        ctx.gateway
            .send(
                MessageTarget::Channel(channel),
                OutboundMessage::notice(notice).with_controls(vec![close_control()]),
            )
            .await?;
        Ok(channel)
    }
    .await;

    match created {
        Ok(channel) => {
            ctx.respond_text(format!("✅ Ticket criado em {}!", channel.mention()), true)
                .await
        }
        Err(e @ WorkflowError::DuplicateOpenTicket) => Err(e),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "Ticket creation failed");
            ctx.respond_text("❌ Erro ao criar ticket!", true).await
        }
    }
}

/// Open a ticket from a category-panel button.
pub(super) async fn open_from_panel(
    ctx: &Context<'_>,
    category: TicketCategory,
) -> Result<(), WorkflowError> {
    let created = async {
        let channel = create_ticket_channel(ctx, category.clone(), None, None).await?;

        let notice = Notice::new(
            format!("{} {}", category.emoji(), category.label()),
            Color::Purple,
        )
        .body(format!(
            "Bem-vindo ao seu ticket de {}!",
            category.label().to_lowercase()
        ))
        .field("Usuário", ctx.invoker.mention(), true)
        .field("Status", TicketStatus::Open.label(), true)
        .field("📝", "Descreva seu problema ou dúvida abaixo!", false)
        .footer(format!("Ticket ID: {channel}"));
        ctx.gateway
            .send(
                MessageTarget::Channel(channel),
                OutboundMessage::notice(notice).with_controls(vec![close_control()]),
            )
            .await?;
        Ok(channel)
    }
    .await;

    match created {
        Ok(channel) => {
            ctx.respond_text(format!("✅ Ticket criado em {}!", channel.mention()), true)
                .await
        }
        Err(e @ WorkflowError::DuplicateOpenTicket) => Err(e),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "Ticket creation failed");
            ctx.respond_text(format!("❌ Erro ao criar ticket: {e}"), true)
                .await
        }
    }
}

/// Close the current ticket.
///
/// The status transition commits first; the closure notice and the archival
/// request are independent best-effort side effects.
pub(super) async fn close(ctx: &Context<'_>) -> Result<(), WorkflowError> {
    let ticket = ctx
        .desk
        .registry
        .set_status(ctx.channel, TicketStatus::Closed)?;
    info!(channel = %ctx.channel, owner = %ticket.owner, "Ticket closed");

    let notice = Notice::new("🔒 Ticket Fechado", Color::Red).body("Este ticket foi arquivado.");
    if let Err(e) = ctx
        .gateway
        .send(
            MessageTarget::Channel(ctx.channel),
            OutboundMessage::notice(notice),
        )
        .await
    {
        warn!(channel = %ctx.channel, error = %e, "Closure notice not delivered");
    }
    if let Err(e) = ctx.gateway.set_archived(ctx.channel, true).await {
        warn!(channel = %ctx.channel, error = %e, "Archival request failed");
    }
    Ok(())
}

/// Reopen the current ticket.
pub(super) async fn reopen(ctx: &Context<'_>) -> Result<(), WorkflowError> {
    let ticket = ctx
        .desk
        .registry
        .set_status(ctx.channel, TicketStatus::Open)?;
    info!(channel = %ctx.channel, owner = %ticket.owner, "Ticket reopened");

    let notice = Notice::new("🔓 Ticket Reaberto", Color::Green);
    if let Err(e) = ctx
        .gateway
        .send(
            MessageTarget::Channel(ctx.channel),
            OutboundMessage::notice(notice),
        )
        .await
    {
        warn!(channel = %ctx.channel, error = %e, "Reopen notice not delivered");
    }
    if let Err(e) = ctx.gateway.set_archived(ctx.channel, false).await {
        warn!(channel = %ctx.channel, error = %e, "Un-archival request failed");
    }
    Ok(())
}

/// Open/closed counts.
pub(super) async fn stats(ctx: &Context<'_>) -> Result<(), WorkflowError> {
    let counts = ctx.desk.registry.counts();
    debug!(total = counts.total, open = counts.open, "Stats requested");

    let notice = Notice::new("📊 Estatísticas de Tickets", Color::Blurple)
        .field("📌 Total", counts.total.to_string(), true)
        .field("🟢 Abertos", counts.open.to_string(), true)
        .field("🔴 Fechados", counts.closed.to_string(), true);
    ctx.respond(OutboundMessage::notice(notice), false).await
}
