use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::application::ParseEnumError;

/// The fixed vocabulary of timeline entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Applied,
    PhoneScreen,
    Technical,
    TakeHome,
    Onsite,
    Offer,
    Rejection,
    FollowUp,
    Note,
    StatusChange,
}

impl EventKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::PhoneScreen => "phone-screen",
            Self::Technical => "technical",
            Self::TakeHome => "take-home",
            Self::Onsite => "onsite",
            Self::Offer => "offer",
            Self::Rejection => "rejection",
            Self::FollowUp => "follow-up",
            Self::Note => "note",
            Self::StatusChange => "status-change",
        }
    }
}

/// An immutable timeline entry owned by exactly one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEvent {
    pub id: i64,
    pub kind: EventKind,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Caller-supplied fields for a new timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub kind: EventKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl EventDraft {
    #[must_use]
    pub fn new(kind: EventKind, title: impl Into<String>, event_date: DateTime<Utc>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: None,
            event_date,
            completed: false,
            scheduled_at: None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "applied" => Ok(Self::Applied),
            "phone-screen" => Ok(Self::PhoneScreen),
            "technical" => Ok(Self::Technical),
            "take-home" => Ok(Self::TakeHome),
            "onsite" => Ok(Self::Onsite),
            "offer" => Ok(Self::Offer),
            "rejection" => Ok(Self::Rejection),
            "follow-up" => Ok(Self::FollowUp),
            "note" => Ok(Self::Note),
            "status-change" => Ok(Self::StatusChange),
            _ => Err(ParseEnumError {
                expected: "event kind",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventKind;
    use std::str::FromStr;

    const ALL: [EventKind; 10] = [
        EventKind::Applied,
        EventKind::PhoneScreen,
        EventKind::Technical,
        EventKind::TakeHome,
        EventKind::Onsite,
        EventKind::Offer,
        EventKind::Rejection,
        EventKind::FollowUp,
        EventKind::Note,
        EventKind::StatusChange,
    ];

    #[test]
    fn display_parse_roundtrips() {
        for kind in ALL {
            assert_eq!(EventKind::from_str(&kind.to_string()).unwrap(), kind);
        }
    }

    #[test]
    fn json_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&EventKind::StatusChange).unwrap(),
            "\"status-change\""
        );
        assert_eq!(
            serde_json::from_str::<EventKind>("\"phone-screen\"").unwrap(),
            EventKind::PhoneScreen
        );
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(EventKind::from_str("coffee-chat").is_err());
    }
}
