use serde::{Deserialize, Serialize};

/// Backend identifiers are numeric (`Long` on the server side).
pub(crate) type Id = i64;

pub(crate) const MIN_CONFIDENCE: i32 = 0;
pub(crate) const MAX_CONFIDENCE: i32 = 10;
pub(crate) const DEFAULT_CONFIDENCE: i32 = MAX_CONFIDENCE;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub(crate) enum EntityKind {
    #[strum(serialize = "folder")]
    Folder,
    #[strum(serialize = "list")]
    List,
    #[strum(serialize = "problem")]
    Problem,
}

impl EntityKind {
    /// Capitalised singular used in user-facing messages ("Folder created successfully!").
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Folder => "Folder",
            EntityKind::List => "List",
            EntityKind::Problem => "Problem",
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum SortOrder {
    Asc,
    Desc,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Folder {
    pub id: Id,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct List {
    pub id: Id,
    pub name: String,

    #[serde(rename = "folderId")]
    pub folder_id: Id,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Problem {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub confidence: i32,
}

/// Body for `{name}` create/rename requests.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NameBody {
    pub name: String,
}

/// Problem fields as edited in the form, before an id exists.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProblemDraft {
    pub name: String,
    pub link: String,
    pub confidence: i32,
}

impl Default for ProblemDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            link: String::new(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl ProblemDraft {
    pub fn from_problem(problem: &Problem) -> Self {
        Self {
            name: problem.name.clone(),
            link: problem.link.clone(),
            confidence: problem.confidence,
        }
    }

    /// Trimmed name/link and clamped confidence, ready to be sent.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            link: self.link.trim().to_string(),
            confidence: clamp_confidence(self.confidence),
        }
    }

    pub fn into_problem(self, id: Id) -> Problem {
        let d = self.normalized();
        Problem {
            id,
            name: d.name,
            link: d.link,
            confidence: d.confidence,
        }
    }
}

pub(crate) fn clamp_confidence(confidence: i32) -> i32 {
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// One of 11 discrete tiers: `clamp(floor(confidence), 0, 10)`.
pub(crate) fn confidence_tier(confidence: f64) -> usize {
    if confidence.is_nan() {
        return 0;
    }
    confidence.floor().clamp(MIN_CONFIDENCE as f64, MAX_CONFIDENCE as f64) as usize
}

const CONFIDENCE_CLASSES: [&str; 11] = [
    "bg-red-500",
    "bg-red-400",
    "bg-red-300",
    "bg-orange-500",
    "bg-orange-400",
    "bg-orange-300",
    "bg-yellow-500",
    "bg-yellow-400",
    "bg-yellow-300",
    "bg-green-400",
    "bg-green-500",
];

pub(crate) fn confidence_class(confidence: i32) -> &'static str {
    CONFIDENCE_CLASSES[confidence_tier(confidence as f64)]
}
