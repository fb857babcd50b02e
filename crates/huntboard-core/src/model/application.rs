use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The pipeline stages, in canonical board order, plus the two absorbing
/// side states (`rejected`, `ghosted`) reachable from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Saved,
    Applied,
    Screen,
    Interview1,
    Interview2,
    Final,
    Offer,
    Rejected,
    Ghosted,
}

/// Canonical column order for board rendering and exports.
pub const PIPELINE_ORDER: [Status; 9] = [
    Status::Saved,
    Status::Applied,
    Status::Screen,
    Status::Interview1,
    Status::Interview2,
    Status::Final,
    Status::Offer,
    Status::Rejected,
    Status::Ghosted,
];

impl Status {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Applied => "applied",
            Self::Screen => "screen",
            Self::Interview1 => "interview1",
            Self::Interview2 => "interview2",
            Self::Final => "final",
            Self::Offer => "offer",
            Self::Rejected => "rejected",
            Self::Ghosted => "ghosted",
        }
    }

    /// Terminal for staleness and next-action purposes: once here, no
    /// automatic follow-up or prep suggestions are generated. Transitions
    /// out remain allowed (the board permits arbitrary moves).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Offer | Self::Rejected | Self::Ghosted)
    }

    /// The four stages where interview prep and fast follow-ups apply.
    #[must_use]
    pub const fn is_interview_stage(self) -> bool {
        matches!(
            self,
            Self::Screen | Self::Interview1 | Self::Interview2 | Self::Final
        )
    }
}

/// Job-board sources an application can originate from. Ordered so platform
/// breakdowns render in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Linkedin,
    Indeed,
    Glassdoor,
    Wellfound,
    CompanySite,
    Recruiter,
    Referral,
    Other,
}

impl Platform {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Indeed => "indeed",
            Self::Glassdoor => "glassdoor",
            Self::Wellfound => "wellfound",
            Self::CompanySite => "company-site",
            Self::Recruiter => "recruiter",
            Self::Referral => "referral",
            Self::Other => "other",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::Other
    }
}

/// Per-application priority used for next-action ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Sort rank: high sorts before medium sorts before low.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Identity of an application: a locally-generated rowid for guest-scope
/// records, or a server-assigned key for authenticated-scope records.
/// A record carries exactly one of the two, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApplicationId {
    Local(i64),
    Remote(String),
}

impl ApplicationId {
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => write!(f, "{id}"),
            Self::Remote(key) => f.write_str(key),
        }
    }
}

impl FromStr for ApplicationId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Remote(s.to_string()), Self::Local))
    }
}

/// A tracked job application (the projection-level aggregate).
///
/// Timestamp invariants enforced by the store layer:
/// - `applied_at` is set iff the application has ever left `saved`, and is
///   stamped exactly once.
/// - `last_touch_at >= created_at` and never moves backwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub url: Option<String>,
    pub platform: Platform,
    pub status: Status,
    pub priority: Option<Priority>,
    pub archived: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub applied_at: Option<DateTime<Utc>>,
    pub last_touch_at: DateTime<Utc>,
}

impl Application {
    /// Effective priority for suggestion ordering (unset means medium).
    #[must_use]
    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or_default()
    }
}

/// Fields supplied by the caller when creating an application. The store
/// stamps identity and all timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub notes: Option<String>,
}

const fn default_status() -> Status {
    Status::Saved
}

impl ApplicationDraft {
    /// Minimal draft: everything else defaulted, status `saved`.
    #[must_use]
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            location: None,
            salary: None,
            url: None,
            platform: Platform::Other,
            status: Status::Saved,
            priority: None,
            notes: None,
        }
    }
}

/// Partial update for an application. `None` leaves the field untouched.
/// Status changes go through the dedicated transition operation, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub location: Option<Option<String>>,
    pub salary: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub platform: Option<Platform>,
    pub priority: Option<Option<Priority>>,
    pub archived: Option<bool>,
    pub notes: Option<Option<String>>,
}

impl ApplicationPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.role.is_none()
            && self.location.is_none()
            && self.salary.is_none()
            && self.url.is_none()
            && self.platform.is_none()
            && self.priority.is_none()
            && self.archived.is_none()
            && self.notes.is_none()
    }

    /// Apply this patch to an application in place. Timestamps are the
    /// store's responsibility and are not touched here.
    pub fn apply_to(&self, app: &mut Application) {
        if let Some(company) = &self.company {
            app.company.clone_from(company);
        }
        if let Some(role) = &self.role {
            app.role.clone_from(role);
        }
        if let Some(location) = &self.location {
            app.location.clone_from(location);
        }
        if let Some(salary) = &self.salary {
            app.salary.clone_from(salary);
        }
        if let Some(url) = &self.url {
            app.url.clone_from(url);
        }
        if let Some(platform) = self.platform {
            app.platform = platform;
        }
        if let Some(priority) = self.priority {
            app.priority = priority;
        }
        if let Some(archived) = self.archived {
            app.archived = archived;
        }
        if let Some(notes) = &self.notes {
            app.notes.clone_from(notes);
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "saved" => Ok(Self::Saved),
            "applied" => Ok(Self::Applied),
            "screen" => Ok(Self::Screen),
            "interview1" => Ok(Self::Interview1),
            "interview2" => Ok(Self::Interview2),
            "final" => Ok(Self::Final),
            "offer" => Ok(Self::Offer),
            "rejected" => Ok(Self::Rejected),
            "ghosted" => Ok(Self::Ghosted),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Platform {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "linkedin" => Ok(Self::Linkedin),
            "indeed" => Ok(Self::Indeed),
            "glassdoor" => Ok(Self::Glassdoor),
            "wellfound" => Ok(Self::Wellfound),
            "company-site" => Ok(Self::CompanySite),
            "recruiter" => Ok(Self::Recruiter),
            "referral" => Ok(Self::Referral),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError {
                expected: "platform",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "priority",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Application, ApplicationDraft, ApplicationId, ApplicationPatch, PIPELINE_ORDER, Platform,
        Priority, Status,
    };
    use chrono::Utc;
    use std::str::FromStr;

    fn sample_app() -> Application {
        let now = Utc::now();
        Application {
            id: ApplicationId::Local(1),
            company: "Stripe".to_string(),
            role: "SWE".to_string(),
            location: None,
            salary: None,
            url: None,
            platform: Platform::Linkedin,
            status: Status::Saved,
            priority: None,
            archived: false,
            notes: None,
            created_at: now,
            updated_at: now,
            applied_at: None,
            last_touch_at: now,
        }
    }

    #[test]
    fn status_display_parse_roundtrips() {
        for status in PIPELINE_ORDER {
            let rendered = status.to_string();
            assert_eq!(Status::from_str(&rendered).unwrap(), status);
        }
    }

    #[test]
    fn status_json_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&Status::Interview1).unwrap(),
            "\"interview1\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"ghosted\"").unwrap(),
            Status::Ghosted
        );
    }

    #[test]
    fn terminal_statuses_are_exactly_offer_rejected_ghosted() {
        let terminal: Vec<Status> = PIPELINE_ORDER
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![Status::Offer, Status::Rejected, Status::Ghosted]
        );
    }

    #[test]
    fn interview_stages_are_the_middle_four() {
        let stages: Vec<Status> = PIPELINE_ORDER
            .into_iter()
            .filter(|s| s.is_interview_stage())
            .collect();
        assert_eq!(
            stages,
            vec![
                Status::Screen,
                Status::Interview1,
                Status::Interview2,
                Status::Final
            ]
        );
    }

    #[test]
    fn platform_parse_rejects_unknown_values() {
        assert!(Platform::from_str("monster").is_err());
        assert_eq!(
            Platform::from_str(" Company-Site ").unwrap(),
            Platform::CompanySite
        );
    }

    #[test]
    fn priority_rank_orders_high_first() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn application_id_parses_numeric_as_local() {
        assert_eq!(
            ApplicationId::from_str("42").unwrap(),
            ApplicationId::Local(42)
        );
        assert_eq!(
            ApplicationId::from_str("app_9f2").unwrap(),
            ApplicationId::Remote("app_9f2".to_string())
        );
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut app = sample_app();
        let patch = ApplicationPatch {
            role: Some("Staff SWE".to_string()),
            notes: Some(Some("referred by Ana".to_string())),
            ..ApplicationPatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut app);

        assert_eq!(app.role, "Staff SWE");
        assert_eq!(app.notes.as_deref(), Some("referred by Ana"));
        assert_eq!(app.company, "Stripe");
        assert_eq!(app.status, Status::Saved);
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut app = sample_app();
        app.notes = Some("old".to_string());
        let patch = ApplicationPatch {
            notes: Some(None),
            ..ApplicationPatch::default()
        };
        patch.apply_to(&mut app);
        assert!(app.notes.is_none());
    }

    #[test]
    fn draft_defaults_are_saved_and_other() {
        let draft = ApplicationDraft::new("Acme", "Backend Engineer");
        assert_eq!(draft.status, Status::Saved);
        assert_eq!(draft.platform, Platform::Other);
        assert!(draft.priority.is_none());
    }

    #[test]
    fn effective_priority_defaults_to_medium() {
        let mut app = sample_app();
        assert_eq!(app.effective_priority(), Priority::Medium);
        app.priority = Some(Priority::High);
        assert_eq!(app.effective_priority(), Priority::High);
    }
}
