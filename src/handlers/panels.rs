//! Standing panels: category tickets, uper requests, role purchases.

use super::Context;
use crate::config::Config;
use crate::error::WorkflowError;
use crate::state::TicketCategory;
use balcao_platform::{Action, Attachment, Color, Control, ControlStyle, Notice, OutboundMessage};

/// Banner attached to store notices, when configured.
pub(super) fn store_banner(config: &Config) -> Option<Attachment> {
    config.panels.store_banner.as_ref().map(|path| {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "banner.gif".to_string());
        Attachment {
            path: path.display().to_string(),
            filename,
        }
    })
}

fn open_button(category: &TicketCategory, label: &str, style: ControlStyle) -> Control {
    Control::new(
        label,
        style,
        Action::OpenTicket {
            category: category.slug().to_string(),
        },
    )
    .emoji(category.emoji())
}

/// `painel` — the category panel.
pub(super) async fn ticket_panel(ctx: &Context<'_>) -> Result<(), WorkflowError> {
    let notice = Notice::new("🎫 Painel de Tickets", Color::Purple)
        .body("Escolha o tipo de ticket que você precisa:")
        .field("❓ Dúvida", "Tenha uma dúvida? Abra um ticket!", false)
        .field("👤 Atendimento", "Precisa de atendimento? Clique aqui!", false)
        .field("🛠️ Suporte", "Problemas técnicos? Estamos aqui!", false)
        .field("⚠️ Reclamação", "Alguma reclamação? Nos avise!", false);

    let controls = vec![
        open_button(&TicketCategory::Duvida, "Dúvida", ControlStyle::Primary),
        open_button(
            &TicketCategory::Atendimento,
            "Atendimento",
            ControlStyle::Primary,
        ),
        open_button(&TicketCategory::Suporte, "Suporte", ControlStyle::Success),
        open_button(
            &TicketCategory::Reclamacao,
            "Reclamação",
            ControlStyle::Danger,
        ),
    ];

    ctx.respond(
        OutboundMessage::notice(notice).with_controls(controls),
        false,
    )
    .await
}

/// `pedir_uper` — the uper request panel. Body lines reference the
/// configured info channels and are omitted when unset.
pub(super) async fn uper_panel(ctx: &Context<'_>) -> Result<(), WorkflowError> {
    let panels = &ctx.desk.config.panels;
    let mut lines = Vec::new();
    if let Some(channel) = panels.uper_prices_channel {
        lines.push(format!(
            "Confirme os valores de serviço em {}",
            channel.mention()
        ));
    }
    if let Some(channel) = panels.uper_terms_channel {
        lines.push(format!(
            "Vou solicitar um UPER, você concorda com nossos termos e condições em {}",
            channel.mention()
        ));
    }
    if let Some(channel) = panels.uper_delivery_channel {
        lines.push(format!("Você receberá entregas em {}", channel.mention()));
    }
    if let Some(channel) = panels.uper_regions_channel {
        lines.push(format!(
            "As regiões de serviços estão em {}",
            channel.mention()
        ));
    }
    if lines.is_empty() {
        lines.push("Solicite um UPER clicando no botão abaixo.".to_string());
    }

    let notice = Notice::new("UPER", Color::Blurple).body(lines.join("\n"));
    let control = Control::new(
        "TICKET UPER",
        ControlStyle::Primary,
        Action::OpenTicket {
            category: TicketCategory::PedirUper.slug().to_string(),
        },
    )
    .emoji("👑");

    ctx.respond(
        OutboundMessage::notice(notice).with_controls(vec![control]),
        false,
    )
    .await
}

/// `pix` — post a purchase panel for one role offer.
pub(super) async fn purchase_panel(
    ctx: &Context<'_>,
    role_name: String,
    months: u32,
    price_label: Option<String>,
) -> Result<(), WorkflowError> {
    if months == 0 {
        return Err(WorkflowError::InvalidInput(
            "Duração inválida! Use um número de meses maior que zero.".to_string(),
        ));
    }
    if role_name.trim().is_empty() {
        return Err(WorkflowError::InvalidInput(
            "Cargo inválido! Informe o nome do cargo.".to_string(),
        ));
    }

    let mut body = format!("**Cargo:** {role_name}\n**Duração:** {months} mês(es)");
    if let Some(price) = &price_label {
        body.push_str(&format!("\n**Valor:** R$ {price}"));
    }
    body.push_str("\n\nClique no botão abaixo para comprar!");

    let mut notice = Notice::new("💳 Loja de Cargos", Color::Purple).body(body);
    if let Some(banner) = store_banner(&ctx.desk.config) {
        notice = notice.attachment(banner);
    }

    let buy = Control::new(
        "🛒 Comprar",
        ControlStyle::Success,
        Action::Purchase {
            months,
            price_label,
            role_name,
        },
    )
    .emoji("💳");

    ctx.respond(OutboundMessage::notice(notice).with_controls(vec![buy]), false)
        .await
}
