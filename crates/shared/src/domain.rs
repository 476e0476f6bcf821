use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned document identity. The client never mints these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub i64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The two document kinds the portal produces. Wire names are fixed by the
/// backend contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "historia_usuario")]
    UserStory,
    #[serde(rename = "termo_aceite")]
    AcceptanceTerm,
}

impl DocumentKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            DocumentKind::UserStory => "historia_usuario",
            DocumentKind::AcceptanceTerm => "termo_aceite",
        }
    }

    /// Title shown above the active form panel.
    pub fn form_title(&self) -> &'static str {
        match self {
            DocumentKind::UserStory => "User Story",
            DocumentKind::AcceptanceTerm => "Acceptance Term",
        }
    }

    /// Uppercased kind tag used as the prefix of saved-list entry labels.
    pub fn list_tag(&self) -> String {
        self.as_wire().replace('_', " ").to_uppercase()
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_title())
    }
}
