//! Typed interaction actions and their control-id encoding.
//!
//! Platforms deliver a control click as an opaque id string. Everything a
//! handler needs to act on the click is encoded into that string when the
//! control is built, so no server-side session state is required and controls
//! keep working across process restarts.
//!
//! Wire format: `name` segments joined by `|`, the trailing free-text field
//! (role name) taking the remainder of the string.

use crate::ids::{GuildId, UserId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A buyer's assertion of payment, routed to the guild owner for a decision.
///
/// Carried in full inside the approve/reject control ids; never stored. The
/// `claim` id ties the claim notice and the eventual decision together in the
/// logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentClaim {
    /// Generated claim identifier, for log correlation.
    pub claim: String,
    /// Guild the purchase belongs to.
    pub guild: GuildId,
    /// The buyer asserting payment.
    pub buyer: UserId,
    /// Claimed subscription length in months.
    pub months: u32,
    /// Name of the purchased role.
    pub role_name: String,
}

/// Typed payload of an interactive control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a ticket for a category-panel button; payload is the category
    /// slug.
    OpenTicket {
        /// Category slug (e.g. `suporte`).
        category: String,
    },
    /// Close the ticket owning the control's channel.
    CloseTicket,
    /// Echo the configured pix key back to the clicker.
    CopyPix,
    /// Start a paid-role purchase.
    Purchase {
        /// Subscription length in months.
        months: u32,
        /// Display price, if the seller set one.
        price_label: Option<String>,
        /// Name of the role being sold.
        role_name: String,
    },
    /// Buyer asserts the payment was made.
    ClaimPayment {
        /// The buyer (the control is built into the buyer's own ticket).
        buyer: UserId,
        /// Subscription length in months.
        months: u32,
        /// Name of the purchased role.
        role_name: String,
    },
    /// Owner approves a payment claim.
    ApprovePayment(PaymentClaim),
    /// Owner rejects a payment claim.
    RejectPayment(PaymentClaim),
}

/// Failure to decode a control id back into an [`Action`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionParseError {
    /// The leading segment names no known action.
    #[error("unknown action: {0}")]
    UnknownAction(String),
    /// A required segment is missing.
    #[error("action {action} is missing field {field}")]
    MissingField {
        /// Action name.
        action: &'static str,
        /// Missing field name.
        field: &'static str,
    },
    /// A numeric segment did not parse.
    #[error("action {action} has a malformed {field} segment")]
    InvalidNumber {
        /// Action name.
        action: &'static str,
        /// Field name.
        field: &'static str,
    },
}

const SEP: char = '|';

fn parse_num<T: FromStr>(
    segment: Option<&str>,
    action: &'static str,
    field: &'static str,
) -> Result<T, ActionParseError> {
    let raw = segment.ok_or(ActionParseError::MissingField { action, field })?;
    raw.parse()
        .map_err(|_| ActionParseError::InvalidNumber { action, field })
}

fn parse_rest<'a>(
    segment: Option<&'a str>,
    action: &'static str,
    field: &'static str,
) -> Result<&'a str, ActionParseError> {
    segment.ok_or(ActionParseError::MissingField { action, field })
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenTicket { category } => write!(f, "ticket.open{SEP}{category}"),
            Self::CloseTicket => write!(f, "ticket.close"),
            Self::CopyPix => write!(f, "pix.copy"),
            Self::Purchase {
                months,
                price_label,
                role_name,
            } => {
                let price = price_label.as_deref().unwrap_or("");
                write!(f, "pix.buy{SEP}{months}{SEP}{price}{SEP}{role_name}")
            }
            Self::ClaimPayment {
                buyer,
                months,
                role_name,
            } => write!(f, "pix.claim{SEP}{buyer}{SEP}{months}{SEP}{role_name}"),
            Self::ApprovePayment(claim) => write!(f, "pix.approve{SEP}{}", EncodedClaim(claim)),
            Self::RejectPayment(claim) => write!(f, "pix.reject{SEP}{}", EncodedClaim(claim)),
        }
    }
}

struct EncodedClaim<'a>(&'a PaymentClaim);

impl fmt::Display for EncodedClaim<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(
            f,
            "{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}",
            c.claim, c.guild, c.buyer, c.months, c.role_name
        )
    }
}

fn parse_claim(rest: Option<&str>, action: &'static str) -> Result<PaymentClaim, ActionParseError> {
    let rest = parse_rest(rest, action, "claim")?;
    let mut parts = rest.splitn(5, SEP);
    let claim = parse_rest(parts.next(), action, "claim")?.to_string();
    let guild = parse_num(parts.next(), action, "guild")?;
    let buyer = parse_num(parts.next(), action, "buyer")?;
    let months = parse_num(parts.next(), action, "months")?;
    let role_name = parse_rest(parts.next(), action, "role")?.to_string();
    Ok(PaymentClaim {
        claim,
        guild,
        buyer,
        months,
        role_name,
    })
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, SEP);
        let name = parts.next().unwrap_or_default();
        let rest = parts.next();

        match name {
            "ticket.open" => {
                let category = parse_rest(rest, "ticket.open", "category")?;
                Ok(Self::OpenTicket {
                    category: category.to_string(),
                })
            }
            "ticket.close" => Ok(Self::CloseTicket),
            "pix.copy" => Ok(Self::CopyPix),
            "pix.buy" => {
                let rest = parse_rest(rest, "pix.buy", "months")?;
                let mut parts = rest.splitn(3, SEP);
                let months = parse_num(parts.next(), "pix.buy", "months")?;
                let price = parse_rest(parts.next(), "pix.buy", "price")?;
                let role_name = parse_rest(parts.next(), "pix.buy", "role")?.to_string();
                Ok(Self::Purchase {
                    months,
                    price_label: (!price.is_empty()).then(|| price.to_string()),
                    role_name,
                })
            }
            "pix.claim" => {
                let rest = parse_rest(rest, "pix.claim", "buyer")?;
                let mut parts = rest.splitn(3, SEP);
                let buyer = parse_num(parts.next(), "pix.claim", "buyer")?;
                let months = parse_num(parts.next(), "pix.claim", "months")?;
                let role_name = parse_rest(parts.next(), "pix.claim", "role")?.to_string();
                Ok(Self::ClaimPayment {
                    buyer,
                    months,
                    role_name,
                })
            }
            "pix.approve" => Ok(Self::ApprovePayment(parse_claim(rest, "pix.approve")?)),
            "pix.reject" => Ok(Self::RejectPayment(parse_claim(rest, "pix.reject")?)),
            other => Err(ActionParseError::UnknownAction(other.to_string())),
        }
    }
}
