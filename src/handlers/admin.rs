//! Admin operations: payment key, owner registration, support-team roster,
//! custom broadcasts.
//!
//! Privilege is checked by the dispatcher before any of these run.

use super::Context;
use super::panels::store_banner;
use crate::error::WorkflowError;
use balcao_platform::{Color, MessageTarget, Notice, OutboundMessage, UserId};
use tracing::info;

/// `configurar_pix` — set the guild's payment key.
pub(super) async fn set_pix_key(ctx: &Context<'_>, key: String) -> Result<(), WorkflowError> {
    ctx.desk.guilds.set_pix_key(ctx.guild, key.clone());
    info!(guild = %ctx.guild, "Payment key configured");

    let notice = Notice::new("✅ PIX Configurado", Color::Green).body(format!("Chave PIX: `{key}`"));
    ctx.respond(OutboundMessage::notice(notice), true).await
}

/// `registrar_dono` — register the payment approver by raw id.
pub(super) async fn register_owner(ctx: &Context<'_>, raw_id: &str) -> Result<(), WorkflowError> {
    let owner: UserId = raw_id.parse().map_err(|_| {
        WorkflowError::InvalidInput("ID inválido! Use apenas números.".to_string())
    })?;
    ctx.desk.guilds.set_owner(ctx.guild, owner);
    info!(guild = %ctx.guild, owner = %owner, "Owner registered");

    let notice =
        Notice::new("✅ Dono Registrado", Color::Green).body(format!("ID do dono: `{owner}`"));
    ctx.respond(OutboundMessage::notice(notice), true).await
}

/// `adicionar_equipe` — add a member to the support team.
pub(super) async fn add_support(ctx: &Context<'_>, user: UserId) -> Result<(), WorkflowError> {
    if !ctx.desk.guilds.add_support(ctx.guild, user) {
        return ctx
            .respond_text(format!("⚠️ {} já está na equipe!", user.mention()), true)
            .await;
    }
    info!(guild = %ctx.guild, user = %user, "Support member added");

    let notice = Notice::new("✅ Membro Adicionado", Color::Green).body(format!(
        "{} foi adicionado à equipe de suporte!",
        user.mention()
    ));
    ctx.respond(OutboundMessage::notice(notice), true).await
}

/// `remover_equipe` — remove a member from the support team. Removing a
/// non-member is a reported no-op.
pub(super) async fn remove_support(ctx: &Context<'_>, user: UserId) -> Result<(), WorkflowError> {
    if ctx.desk.guilds.support_team(ctx.guild).is_empty() {
        return Err(WorkflowError::ConfigurationMissing("equipe"));
    }
    if !ctx.desk.guilds.remove_support(ctx.guild, user) {
        return ctx
            .respond_text(format!("⚠️ {} não está na equipe!", user.mention()), true)
            .await;
    }
    info!(guild = %ctx.guild, user = %user, "Support member removed");

    let notice = Notice::new("✅ Membro Removido", Color::Red).body(format!(
        "{} foi removido da equipe de suporte!",
        user.mention()
    ));
    ctx.respond(OutboundMessage::notice(notice), true).await
}

/// `listar_equipe` — list the support team, resolving each member's name.
pub(super) async fn list_support(ctx: &Context<'_>) -> Result<(), WorkflowError> {
    let team = ctx.desk.guilds.support_team(ctx.guild);
    if team.is_empty() {
        return Err(WorkflowError::ConfigurationMissing("equipe"));
    }

    let mut members = Vec::with_capacity(team.len());
    for user in &team {
        match ctx.gateway.resolve_user(*user).await {
            Ok(profile) => members.push(format!("• {} ({})", user.mention(), profile.name)),
            Err(_) => members.push(format!("• ID: {user} (Usuário não encontrado)")),
        }
    }

    let notice = Notice::new("👥 Equipe de Suporte", Color::Blue)
        .body(members.join("\n"))
        .footer(format!("Total: {} membros", members.len()));
    ctx.respond(OutboundMessage::notice(notice), true).await
}

/// `mensagem` — post a custom titled message in the current channel, as a
/// notice with the store banner or as plain text.
pub(super) async fn broadcast(
    ctx: &Context<'_>,
    title: String,
    text: String,
    as_notice: bool,
) -> Result<(), WorkflowError> {
    let message = if as_notice {
        let mut notice = Notice::new(title, Color::Purple).body(text);
        if let Some(banner) = store_banner(&ctx.desk.config) {
            notice = notice.attachment(banner);
        }
        OutboundMessage::notice(notice)
    } else {
        OutboundMessage::text(format!("**{title}**\n{text}"))
    };

    ctx.gateway
        .send(MessageTarget::Channel(ctx.channel), message)
        .await?;
    ctx.respond_text("✅ Mensagem enviada!", true).await
}
