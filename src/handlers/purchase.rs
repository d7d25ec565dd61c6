//! Paid-role purchase tickets.

use super::panels::store_banner;
use super::{Context, ticket};
use crate::error::WorkflowError;
use crate::state::{PurchaseInfo, TicketCategory};
use balcao_platform::{
    Action, ChannelId, Color, Control, ControlStyle, MessageTarget, Notice, OutboundMessage,
};
use tracing::{debug, warn};

/// Shown in the payment notice when the guild has no key configured.
const PIX_NOT_CONFIGURED: &str = "❌ PIX não configurado";

/// Start a purchase from a panel's buy button: create the purchase ticket,
/// then post the payment instructions into it.
pub(super) async fn start_purchase(
    ctx: &Context<'_>,
    role_name: String,
    months: u32,
    price_label: Option<String>,
) -> Result<(), WorkflowError> {
    let purchase = PurchaseInfo {
        role_name: role_name.clone(),
        months,
        price_label: price_label.clone(),
    };

    let created = async {
        let channel =
            ticket::create_ticket_channel(ctx, TicketCategory::Compra, None, Some(purchase))
                .await?;
        post_payment_notice(ctx, channel, &role_name, months, price_label.as_deref()).await?;
        Ok(channel)
    }
    .await;

    match created {
        Ok(channel) => {
            ctx.respond_text(
                format!("✅ Ticket de compra criado em {}!", channel.mention()),
                true,
            )
            .await
        }
        Err(e @ WorkflowError::DuplicateOpenTicket) => Err(e),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "Purchase ticket creation failed");
            ctx.respond_text(format!("❌ Erro ao criar ticket: {e}"), true)
                .await
        }
    }
}

/// Payment instructions: configured key (or the explicit missing-key
/// marker), price, banner, and the copy/claim controls.
///
/// When the banner upload fails the notice is re-sent without it.
async fn post_payment_notice(
    ctx: &Context<'_>,
    channel: ChannelId,
    role_name: &str,
    months: u32,
    price_label: Option<&str>,
) -> Result<(), WorkflowError> {
    let pix_key = ctx
        .desk
        .guilds
        .pix_key(ctx.guild)
        .unwrap_or_else(|| PIX_NOT_CONFIGURED.to_string());

    let mut notice = Notice::new("💳 Pagamento via PIX", Color::Purple).body(format!(
        "**Cargo:** {role_name}\n**Duração:** {months} mês(es)"
    ));
    if let Some(price) = price_label {
        notice = notice.field("Valor", format!("R$ {price}"), false);
    }
    notice = notice.field("📲 Chave PIX", format!("`{pix_key}`"), false);

    let controls = vec![
        Control::new("Copiar PIX", ControlStyle::Secondary, Action::CopyPix).emoji("📋"),
        Control::new(
            "Já Comprei",
            ControlStyle::Success,
            Action::ClaimPayment {
                buyer: ctx.invoker,
                months,
                role_name: role_name.to_string(),
            },
        )
        .emoji("✅"),
    ];

    if let Some(banner) = store_banner(&ctx.desk.config) {
        let with_banner = OutboundMessage::notice(notice.clone().attachment(banner))
            .with_controls(controls.clone());
        match ctx
            .gateway
            .send(MessageTarget::Channel(channel), with_banner)
            .await
        {
            Ok(()) => return Ok(()),
            Err(e) => {
                debug!(channel = %channel, error = %e, "Banner upload failed, resending without");
            }
        }
    }

    ctx.gateway
        .send(
            MessageTarget::Channel(channel),
            OutboundMessage::notice(notice).with_controls(controls),
        )
        .await?;
    Ok(())
}

/// Echo the configured key back to the clicker.
pub(super) async fn copy_pix(ctx: &Context<'_>) -> Result<(), WorkflowError> {
    let key = ctx
        .desk
        .guilds
        .pix_key(ctx.guild)
        .unwrap_or_else(|| "Não configurado".to_string());
    ctx.respond_text(format!("✅ Chave PIX copiada: `{key}`"), true)
        .await
}
