use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One named stage of the linear planning wizard, in canonical order.
///
/// The derive order doubles as the canonical order: `Ord` and `index()` both
/// follow it, and resume/progress derivation depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Step {
    #[serde(rename = "genre")]
    Genre,
    #[serde(rename = "mind-map")]
    MindMap,
    #[serde(rename = "concept")]
    Concept,
    #[serde(rename = "target")]
    Target,
    #[serde(rename = "scene")]
    Scene,
    #[serde(rename = "features")]
    Features,
    #[serde(rename = "features/detail")]
    FeaturesDetail,
    #[serde(rename = "result")]
    Result,
}

impl Step {
    pub fn all() -> &'static [Step] {
        &[
            Step::Genre,
            Step::MindMap,
            Step::Concept,
            Step::Target,
            Step::Scene,
            Step::Features,
            Step::FeaturesDetail,
            Step::Result,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Step> {
        let all = Step::all();
        let i = self.index();
        all.get(i + 1).copied()
    }

    /// Canonical steps from the first through `self`, inclusive.
    pub fn prefix(self) -> &'static [Step] {
        &Step::all()[..=self.index()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Genre => "genre",
            Step::MindMap => "mind-map",
            Step::Concept => "concept",
            Step::Target => "target",
            Step::Scene => "scene",
            Step::Features => "features",
            Step::FeaturesDetail => "features/detail",
            Step::Result => "result",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Step {
    type Err = crate::error::KikakuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "genre" => Ok(Step::Genre),
            "mind-map" => Ok(Step::MindMap),
            "concept" => Ok(Step::Concept),
            "target" => Ok(Step::Target),
            "scene" => Ok(Step::Scene),
            "features" => Ok(Step::Features),
            "features/detail" | "detail" => Ok(Step::FeaturesDetail),
            "result" => Ok(Step::Result),
            _ => Err(crate::error::KikakuError::UnknownStep(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
