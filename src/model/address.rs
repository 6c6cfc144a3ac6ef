//! Recipient references and address normalization.

use std::sync::LazyLock;

use regex::Regex;

/// Basic `local@domain.tld` shape. Not a full RFC 5322 validator.
static ADDRESS_SHAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid ADDRESS_SHAPE_REGEX pattern")
});

/// How a contact was addressed on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    /// Direct addressee (`To:`).
    Primary,
    /// Carbon copy (`Cc:`).
    Copy,
    /// Blind carbon copy (`Bcc:`).
    BlindCopy,
}

impl RecipientRole {
    /// All roles, in the order the aggregation engine visits them.
    pub const ALL: [RecipientRole; 3] = [Self::Primary, Self::Copy, Self::BlindCopy];

    /// Short header-style label: `"to"`, `"cc"` or `"bcc"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "to",
            Self::Copy => "cc",
            Self::BlindCopy => "bcc",
        }
    }
}

impl std::fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One recipient entry on a message, as delivered by a message source.
///
/// Both fields may be missing; a reference without a usable address is
/// ignored by the aggregation engine.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecipientRef {
    pub role: RecipientRole,
    pub address: Option<String>,
    pub display_name: Option<String>,
}

impl RecipientRef {
    /// Create a reference with an address and no display name.
    pub fn new(role: RecipientRole, address: impl Into<String>) -> Self {
        Self {
            role,
            address: Some(address.into()),
            display_name: None,
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// The trimmed address, or `None` when it is absent or blank.
    pub fn usable_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Directory key for an address: trimmed and lowercased.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Whether an address has the basic `local@domain.tld` shape.
pub fn is_plausible_address(address: &str) -> bool {
    ADDRESS_SHAPE_REGEX.is_match(address.trim())
}
