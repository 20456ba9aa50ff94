//! Messages the screens leave for the user.

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Transient confirmation.
    Toast,
    /// Blocking error.
    Alert,
}

/// A message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub(crate) fn toast(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Toast,
            text: text.into(),
        }
    }

    pub(crate) fn alert(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Alert,
            text: text.into(),
        }
    }
}
