//! Integration tests for the ticket lifecycle: creation, duplicates,
//! close/reopen.

mod common;

use balcao::handlers::{Command, Interaction, dispatch};
use balcao::platform::{Action, ChannelAccess, GuildId, PermissionTarget, UserId};
use balcao::state::TicketStatus;
use common::Harness;

const GUILD: GuildId = GuildId(10);
const ANA: UserId = UserId(42);

#[tokio::test]
async fn test_category_ticket_creation() {
    let h = Harness::new();
    h.desk.guilds.add_support(GUILD, UserId(7));
    h.gateway.add_member(GUILD, UserId(7), "mod");

    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::from_control_id("ticket.open|suporte").unwrap(),
    )
    .await;

    // Channel created with the sequence-derived name.
    let created = h.gateway.channels.lock().clone();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "ticket-1");
    assert!(created[0].topic.contains("Suporte"));
    let channel = created[0].id;

    // Registered and open.
    assert!(h.desk.registry.has_open_ticket(GUILD, ANA));
    let ticket = h.desk.registry.get(channel).expect("ticket registered");
    assert_eq!(ticket.owner, ANA);
    assert_eq!(ticket.status, TicketStatus::Open);

    // Visibility: everyone denied, owner and support member allowed.
    let perms = h.gateway.permissions.lock().clone();
    assert!(perms.iter().any(|p| p.channel == channel
        && p.target == PermissionTarget::Everyone
        && p.access == ChannelAccess::Deny));
    assert!(perms.iter().any(|p| p.channel == channel
        && p.target == PermissionTarget::User(ANA)
        && p.access == ChannelAccess::Allow));
    assert!(perms.iter().any(|p| p.channel == channel
        && p.target == PermissionTarget::User(UserId(7))
        && p.access == ChannelAccess::Allow));

    // Intro notice with the close control posted into the channel.
    let posted = h.gateway.channel_messages(channel);
    assert_eq!(posted.len(), 1);
    let notice = posted[0].notice.as_ref().expect("intro notice");
    assert!(notice.title.contains("Suporte"));
    assert!(posted[0].controls.iter().any(|c| c.action == Action::CloseTicket));

    // Private acknowledgement referencing the channel.
    let ack = h.gateway.last_response();
    assert!(ack.ephemeral);
    assert!(ack.message.text.as_deref().unwrap().contains(&channel.mention()));
}

#[tokio::test]
async fn test_second_open_ticket_rejected() {
    let h = Harness::new();

    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::Command(Command::OpenTicket {
            subject: "Suporte técnico".to_string(),
            description: "Não consigo entrar.".to_string(),
        }),
    )
    .await;
    assert_eq!(h.gateway.channels.lock().len(), 1);

    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::from_control_id("ticket.open|duvida").unwrap(),
    )
    .await;

    // No second channel; the requester gets the duplicate notice.
    assert_eq!(h.gateway.channels.lock().len(), 1);
    assert_eq!(h.gateway.last_response_text(), "❌ Você já tem um ticket aberto!");
}

#[tokio::test]
async fn test_close_then_reopen_roundtrip() {
    let h = Harness::new();

    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::from_control_id("ticket.open|suporte").unwrap(),
    )
    .await;
    let channel = h.gateway.channels.lock()[0].id;
    let before = h.desk.registry.get(channel).unwrap();

    // Close from inside the ticket.
    let ctx = h.ctx_in(GUILD, ANA, "ana", channel);
    dispatch(&ctx, Interaction::Command(Command::CloseTicket)).await;

    let closed = h.desk.registry.get(channel).unwrap();
    assert_eq!(closed.status, TicketStatus::Closed);
    assert!(!h.desk.registry.has_open_ticket(GUILD, ANA));
    assert!(h.gateway.archived.lock().contains(&(channel, true)));
    let posted = h.gateway.channel_messages(channel);
    assert!(posted
        .iter()
        .any(|m| m.notice.as_ref().is_some_and(|n| n.title == "🔒 Ticket Fechado")));

    // Reopen restores the open state and the untouched fields.
    let ctx = h.ctx_in(GUILD, ANA, "ana", channel);
    dispatch(&ctx, Interaction::Command(Command::ReopenTicket)).await;

    let reopened = h.desk.registry.get(channel).unwrap();
    assert_eq!(reopened.status, TicketStatus::Open);
    assert_eq!(reopened.owner, before.owner);
    assert_eq!(reopened.created_at, before.created_at);
    assert!(h.desk.registry.has_open_ticket(GUILD, ANA));
    assert!(h.gateway.archived.lock().contains(&(channel, false)));
}

#[tokio::test]
async fn test_close_outside_ticket_channel() {
    let h = Harness::new();
    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(&ctx, Interaction::Command(Command::CloseTicket)).await;
    assert_eq!(h.gateway.last_response_text(), "❌ Este não é um canal de ticket!");
}

#[tokio::test]
async fn test_sequence_survives_closures() {
    let h = Harness::new();

    // Open, close, open again: names keep counting up.
    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::from_control_id("ticket.open|duvida").unwrap(),
    )
    .await;
    let first = h.gateway.channels.lock()[0].id;

    let ctx = h.ctx_in(GUILD, ANA, "ana", first);
    dispatch(&ctx, Interaction::Command(Command::CloseTicket)).await;

    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::from_control_id("ticket.open|duvida").unwrap(),
    )
    .await;

    let names: Vec<String> = h.gateway.channels.lock().iter().map(|c| c.name.clone()).collect();
    assert_eq!(names, vec!["ticket-1".to_string(), "ticket-2".to_string()]);
}

#[tokio::test]
async fn test_failed_channel_creation_releases_reservation() {
    let h = Harness::new();
    h.gateway
        .fail_channel_create
        .store(true, std::sync::atomic::Ordering::Relaxed);

    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::from_control_id("ticket.open|suporte").unwrap(),
    )
    .await;

    // Nothing registered, creation error reported.
    assert!(!h.desk.registry.has_open_ticket(GUILD, ANA));
    assert!(h.gateway.last_response_text().starts_with("❌ Erro ao criar ticket"));

    // The user can try again once the platform recovers.
    h.gateway
        .fail_channel_create
        .store(false, std::sync::atomic::Ordering::Relaxed);
    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::from_control_id("ticket.open|suporte").unwrap(),
    )
    .await;
    assert!(h.desk.registry.has_open_ticket(GUILD, ANA));
}

#[tokio::test]
async fn test_prompt_ticket_carries_description() {
    let h = Harness::new();

    let ctx = h.ctx(GUILD, ANA, "ana");
    dispatch(
        &ctx,
        Interaction::Command(Command::OpenTicket {
            subject: "Reembolso".to_string(),
            description: "Pedido 123 não chegou.".to_string(),
        }),
    )
    .await;

    let channel = h.gateway.channels.lock()[0].id;
    let ticket = h.desk.registry.get(channel).unwrap();
    assert_eq!(ticket.description.as_deref(), Some("Pedido 123 não chegou."));

    let posted = h.gateway.channel_messages(channel);
    let notice = posted[0].notice.as_ref().unwrap();
    assert_eq!(notice.title, "🎫 Reembolso");
    assert_eq!(notice.body, "Pedido 123 não chegou.");
}

#[tokio::test]
async fn test_stats_counts_open_and_closed() {
    let h = Harness::new();

    for user in [1u64, 2, 3] {
        let ctx = h.ctx(GUILD, UserId(user), "user");
        dispatch(
            &ctx,
            Interaction::from_control_id("ticket.open|duvida").unwrap(),
        )
        .await;
    }
    let third = h.gateway.channels.lock()[2].id;
    let ctx = h.ctx_in(GUILD, UserId(3), "user", third);
    dispatch(&ctx, Interaction::Command(Command::CloseTicket)).await;

    let ctx = h.admin_ctx(GUILD, UserId(99), "admin");
    dispatch(&ctx, Interaction::Command(Command::Stats)).await;

    let response = h.gateway.last_response();
    let notice = response.message.notice.expect("stats notice");
    assert_eq!(notice.title, "📊 Estatísticas de Tickets");
    let field = |name: &str| {
        notice
            .fields
            .iter()
            .find(|f| f.name.contains(name))
            .map(|f| f.value.clone())
            .unwrap()
    };
    assert_eq!(field("Total"), "3");
    assert_eq!(field("Abertos"), "2");
    assert_eq!(field("Fechados"), "1");
}
