//! The buyer/owner payment-approval handshake.
//!
//! A claim never touches the ticket registry: approving or rejecting a
//! purchase does not close its ticket. The claim travels inside the
//! approve/reject control ids, so the handshake needs no server-side session
//! state and survives restarts as far as the platform retains the controls.

use super::Context;
use crate::error::WorkflowError;
use balcao_platform::{
    Action, Color, Control, ControlStyle, MessageTarget, Notice, OutboundMessage, PaymentClaim,
    UserId,
};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

/// Role label substituted when a claim carries an empty role name.
const DEFAULT_ROLE: &str = "Membro VIP";

/// Expiry of a grant of `months` months starting at `from`.
///
/// Calendar-approximate: a month is 30 days, not true month arithmetic.
pub fn expiry_after(from: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    from + chrono::Duration::days(i64::from(months) * 30)
}

fn format_expiry(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// Buyer asserts the payment was made.
///
/// Routes the claim to the configured owner's DMs. With no owner registered
/// the claim goes nowhere; the buyer is told to wait either way.
pub(super) async fn claim(
    ctx: &Context<'_>,
    buyer: UserId,
    months: u32,
    role_name: String,
) -> Result<(), WorkflowError> {
    match ctx.desk.guilds.owner(ctx.guild) {
        None => {
            warn!(guild = %ctx.guild, buyer = %buyer, "Payment claimed with no registered owner");
        }
        Some(owner) => {
            let claim = PaymentClaim {
                claim: uuid::Uuid::new_v4().to_string(),
                guild: ctx.guild,
                buyer,
                months,
                role_name: role_name.clone(),
            };

            let notice = Notice::new("👑 Novo Pagamento Pendente", Color::Gold)
                .body(format!("{} diz que já pagou!", ctx.invoker.mention()))
                .field(
                    "Usuário",
                    format!("{} ({})", ctx.invoker.mention(), ctx.invoker_name),
                    false,
                )
                .field("Cargo", role_name, true)
                .field("Duração", format!("{months} mês(es)"), true)
                .field("📍 Ticket", ctx.channel.mention(), false);
            let controls = vec![
                Control::new(
                    "Aprovar",
                    ControlStyle::Success,
                    Action::ApprovePayment(claim.clone()),
                )
                .emoji("✅"),
                Control::new(
                    "Rejeitar",
                    ControlStyle::Danger,
                    Action::RejectPayment(claim.clone()),
                )
                .emoji("❌"),
            ];

            match ctx
                .gateway
                .send(
                    MessageTarget::User(owner),
                    OutboundMessage::notice(notice).with_controls(controls),
                )
                .await
            {
                Ok(()) => {
                    info!(claim = %claim.claim, guild = %ctx.guild, buyer = %buyer, owner = %owner, "Payment claim routed to owner");
                }
                Err(e) => {
                    error!(claim = %claim.claim, owner = %owner, error = %e, "Claim notice not delivered to owner");
                }
            }
        }
    }

    ctx.respond_text(
        "⏳ Você será analisado em breve!\n\n\
         👑 O dono do servidor foi notificado e em breve um admin verificará seu pagamento.\n\
         Aguarde a confirmação aqui no ticket!",
        true,
    )
    .await
}

/// Approve a payment claim: ensure the role exists, grant it if the buyer is
/// still a member, confirm with the expiry date.
pub(super) async fn approve(ctx: &Context<'_>, claim: PaymentClaim) -> Result<(), WorkflowError> {
    let role_name = {
        let trimmed = claim.role_name.trim();
        if trimmed.is_empty() {
            DEFAULT_ROLE.to_string()
        } else {
            trimmed.to_string()
        }
    };

    // No partial grant: role lookup/creation failure reports and stops.
    let looked_up = match ctx.gateway.find_role(claim.guild, &role_name).await {
        Ok(existing) => existing,
        Err(e) => {
            error!(claim = %claim.claim, role = %role_name, error = %e, "Role lookup failed");
            ctx.respond_text(format!("❌ Erro ao criar cargo '{role_name}'!"), true)
                .await?;
            return Ok(());
        }
    };
    let role = match looked_up {
        Some(role) => role,
        None => match ctx
            .gateway
            .create_role(claim.guild, &role_name, Color::Gold)
            .await
        {
            Ok(role) => role,
            Err(e) => {
                error!(claim = %claim.claim, role = %role_name, error = %e, "Role creation failed");
                ctx.respond_text(format!("❌ Erro ao criar cargo '{role_name}'!"), true)
                    .await?;
                return Ok(());
            }
        },
    };

    let member_present = match ctx.gateway.member_exists(claim.guild, claim.buyer).await {
        Ok(present) => present,
        Err(e) => {
            debug!(claim = %claim.claim, buyer = %claim.buyer, error = %e, "Buyer membership unresolved, skipping grant");
            false
        }
    };
    if member_present {
        if let Err(e) = ctx.gateway.grant_role(claim.guild, claim.buyer, role).await {
            error!(claim = %claim.claim, buyer = %claim.buyer, error = %e, "Role grant failed");
            ctx.respond_text("❌ Erro ao adicionar cargo ao membro!", true)
                .await?;
            return Ok(());
        }
    }

    let expiry = format_expiry(expiry_after(Utc::now(), claim.months));
    let notice = Notice::new("✅ Pagamento Aprovado!", Color::Green)
        .body(format!(
            "Você aprovou o pagamento de {}!",
            claim.buyer.mention()
        ))
        .field("Cargo", role_name.clone(), true)
        .field("Duração", format!("{} mês(es)", claim.months), true)
        .field("Data de Expiração", format!("**{expiry}**"), false);
    ctx.respond(OutboundMessage::notice(notice), true).await?;

    if let Err(e) = ctx
        .gateway
        .send(
            MessageTarget::User(claim.buyer),
            OutboundMessage::text(format!(
                "✅ Seu pagamento foi aprovado! Você tem o cargo **{role_name}** até **{expiry}**!"
            )),
        )
        .await
    {
        debug!(claim = %claim.claim, buyer = %claim.buyer, error = %e, "Buyer approval DM not delivered");
    }

    info!(claim = %claim.claim, guild = %claim.guild, buyer = %claim.buyer, role = %role_name, months = claim.months, "Payment approved");
    Ok(())
}

/// Reject a payment claim. No role mutation, no registry mutation.
pub(super) async fn reject(ctx: &Context<'_>, claim: PaymentClaim) -> Result<(), WorkflowError> {
    let notice = Notice::new("❌ Pagamento Rejeitado", Color::Red).body(format!(
        "Você rejeitou o pagamento de {}.",
        claim.buyer.mention()
    ));
    ctx.respond(OutboundMessage::notice(notice), true).await?;

    if let Err(e) = ctx
        .gateway
        .send(
            MessageTarget::User(claim.buyer),
            OutboundMessage::text("❌ Seu pagamento foi rejeitado pelo dono do servidor."),
        )
        .await
    {
        debug!(claim = %claim.claim, buyer = %claim.buyer, error = %e, "Buyer rejection DM not delivered");
    }

    info!(claim = %claim.claim, guild = %claim.guild, buyer = %claim.buyer, "Payment rejected");
    Ok(())
}
