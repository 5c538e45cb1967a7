//! Domain types shared by every Quire crate.
//!
//! The notes server owns all of these records; the client only carries
//! them between requests and renders them.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// ============================================================================
// NoteId
// ============================================================================

/// Opaque note identifier.
///
/// Servers in the wild hand out either numeric row ids or string object ids,
/// so both JSON shapes are accepted and the original representation is kept
/// for serialization. Equality compares the rendered id: `17` and `"17"` name
/// the same note.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    /// Numeric identifier.
    Number(i64),
    /// String identifier.
    Text(String),
}

impl NoteId {
    /// Render the id as a URL path segment.
    pub fn as_path_segment(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for NoteId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for NoteId {}

impl Hash for NoteId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl From<&str> for NoteId {
    /// Ids typed by a user are parsed as numbers when they are written in
    /// canonical form (`17`, not `017` or `+17`).
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Number(n),
            _ => Self::Text(s.to_string()),
        }
    }
}

impl From<i64> for NoteId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

// ============================================================================
// Note
// ============================================================================

/// A single note as returned by the notes API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned identifier.
    pub id: NoteId,
    /// Note body.
    #[serde(default)]
    pub content: String,
    /// Any other fields the server sends (owner, tenant, timestamps...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Note {
    /// Build a note with no extra fields.
    pub fn new(id: impl Into<NoteId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            extra: serde_json::Map::new(),
        }
    }
}

// ============================================================================
// Role
// ============================================================================

/// Role of the signed-in user within their tenant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Tenant administrator; may upgrade the tenant plan.
    Admin,
    /// Regular tenant member.
    #[default]
    Member,
    /// A role this client does not know about.
    Other(String),
}

impl Role {
    /// Whether this role is allowed to upgrade the tenant plan.
    pub fn can_upgrade(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Wire representation of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "member" => Self::Member,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Role::from(s.as_str()))
    }
}

// ============================================================================
// Notice
// ============================================================================

/// How loudly a [`Notice`] should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Something the user asked for happened.
    Info,
    /// Something the user asked for did not happen.
    Error,
}

/// A message for the person at the keyboard.
///
/// Produced by the session layer wherever a browser client would pop an
/// alert; the presentation layer decides how to show it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable text.
    pub message: String,
}

impl Notice {
    /// An informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// An error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Whether this notice reports a failure.
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
