//! Outbound message shapes: notices, controls, attachments.

use crate::action::Action;

/// Fixed notice color palette.
///
/// Also used for role creation (the paid-role grant creates gold roles).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Product accent color for panels and intro notices.
    Purple,
    /// Success and approval.
    Green,
    /// Closure, rejection, errors.
    Red,
    /// Pending payments and granted roles.
    Gold,
    /// Platform brand blue.
    Blurple,
    /// Informational listings.
    Blue,
}

impl Color {
    /// RGB triple for platforms that take raw colors.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Purple => (155, 89, 182),
            Self::Green => (46, 204, 113),
            Self::Red => (231, 76, 60),
            Self::Gold => (241, 196, 15),
            Self::Blurple => (88, 101, 242),
            Self::Blue => (52, 152, 219),
        }
    }
}

/// A file attached to a notice, addressed by local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Path of the file to upload.
    pub path: String,
    /// Filename presented to the platform.
    pub filename: String,
}

/// One titled field inside a notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeField {
    /// Field title.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Render inline next to sibling fields.
    pub inline: bool,
}

/// A rich notice: the platform-embed shape the product renders everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Notice title.
    pub title: String,
    /// Free-text body under the title.
    pub body: String,
    /// Titled fields.
    pub fields: Vec<NoticeField>,
    /// Accent color.
    pub color: Color,
    /// Footer line.
    pub footer: Option<String>,
    /// Attached image, if any.
    pub attachment: Option<Attachment>,
}

impl Notice {
    /// New notice with the given title and accent color.
    pub fn new(title: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            fields: Vec::new(),
            color,
            footer: None,
            attachment: None,
        }
    }

    /// Set the body text.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(NoticeField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Set the footer line.
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Attach a file.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// Visual style of an interactive control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStyle {
    /// Blurple, the default action.
    Primary,
    /// Gray, secondary action.
    Secondary,
    /// Green, confirming action.
    Success,
    /// Red, destructive action.
    Danger,
}

/// An interactive button attached to a message.
///
/// The carried [`Action`] is encoded into the platform's control id, so a
/// click delivers the full typed payload back to the dispatcher even after a
/// process restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Button label.
    pub label: String,
    /// Visual style.
    pub style: ControlStyle,
    /// Emoji shown before the label.
    pub emoji: Option<String>,
    /// Typed payload delivered on click.
    pub action: Action,
}

impl Control {
    /// New control with the given label, style and action.
    pub fn new(label: impl Into<String>, style: ControlStyle, action: Action) -> Self {
        Self {
            label: label.into(),
            style,
            emoji: None,
            action,
        }
    }

    /// Set the emoji shown before the label.
    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// One outbound message: plain text, a notice, or both, plus controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Plain text content.
    pub text: Option<String>,
    /// Rich notice content.
    pub notice: Option<Notice>,
    /// Attached controls.
    pub controls: Vec<Control>,
}

impl OutboundMessage {
    /// Plain-text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Notice message.
    pub fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::default()
        }
    }

    /// Attach controls.
    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }
}
