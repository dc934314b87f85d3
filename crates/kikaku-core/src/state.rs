use crate::types::Step;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TargetAudience / UsageScene
// ---------------------------------------------------------------------------

/// Who the plan is for. Ages stay strings: they are free-form wizard input
/// and are never computed with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetAudience {
    pub age_min: String,
    pub age_max: String,
    pub gender: String,
    pub occupation: String,
    pub personality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageScene {
    pub when: String,
    pub r#where: String,
}

// ---------------------------------------------------------------------------
// ProjectState
// ---------------------------------------------------------------------------

/// Accumulated wizard answers. Every field starts empty/unset and is filled
/// in incrementally as the user completes steps.
///
/// All fields carry serde defaults so documents written before a field
/// existed deserialize with that field empty rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectState {
    pub genre: String,
    pub keywords: Vec<String>,
    pub concept: String,
    pub target: TargetAudience,
    pub scene: UsageScene,
    pub features: Vec<String>,
    pub main_feature_index: i32,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            genre: String::new(),
            keywords: Vec::new(),
            concept: String::new(),
            target: TargetAudience::default(),
            scene: UsageScene::default(),
            features: Vec::new(),
            main_feature_index: -1,
        }
    }
}

impl ProjectState {
    /// The step the user should continue from, derived from which fields are
    /// already filled. Checks run in canonical step order and the first
    /// unmet condition wins; a later filled field earns no credit while an
    /// earlier one is missing.
    ///
    /// Total: every possible state maps to exactly one step.
    pub fn resume_step(&self) -> Step {
        if self.genre.is_empty() {
            return Step::Genre;
        }
        if self.keywords.is_empty() {
            return Step::MindMap;
        }
        if self.concept.is_empty() {
            return Step::Concept;
        }
        if self.target.age_min.is_empty()
            || self.target.age_max.is_empty()
            || self.target.gender.is_empty()
        {
            return Step::Target;
        }
        if self.scene.when.is_empty() || self.scene.r#where.is_empty() {
            return Step::Scene;
        }
        if self.features.is_empty() {
            return Step::Features;
        }
        if self.main_feature_index < 0 {
            return Step::FeaturesDetail;
        }
        Step::Result
    }

    /// The selected main feature, if one has been chosen and the index is in
    /// bounds.
    pub fn main_feature(&self) -> Option<&str> {
        if self.main_feature_index < 0 {
            return None;
        }
        self.features
            .get(self.main_feature_index as usize)
            .map(String::as_str)
    }

    /// Merge a partial update: present fields overwrite, absent fields are
    /// left untouched. Nested target/scene records merge per-field.
    pub fn apply(&mut self, delta: StateDelta) {
        if let Some(genre) = delta.genre {
            self.genre = genre;
        }
        if let Some(keywords) = delta.keywords {
            self.keywords = keywords;
        }
        if let Some(concept) = delta.concept {
            self.concept = concept;
        }
        if let Some(target) = delta.target {
            if let Some(age_min) = target.age_min {
                self.target.age_min = age_min;
            }
            if let Some(age_max) = target.age_max {
                self.target.age_max = age_max;
            }
            if let Some(gender) = target.gender {
                self.target.gender = gender;
            }
            if let Some(occupation) = target.occupation {
                self.target.occupation = occupation;
            }
            if let Some(personality) = target.personality {
                self.target.personality = personality;
            }
        }
        if let Some(scene) = delta.scene {
            if let Some(when) = scene.when {
                self.scene.when = when;
            }
            if let Some(loc) = scene.r#where {
                self.scene.r#where = loc;
            }
        }
        if let Some(features) = delta.features {
            self.features = features;
        }
        if let Some(index) = delta.main_feature_index {
            self.main_feature_index = index;
        }
    }
}

// ---------------------------------------------------------------------------
// StateDelta
// ---------------------------------------------------------------------------

/// Partial update carried by a single wizard step; the typed replacement for
/// the query-parameter bag the steps used to hand around.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StateDelta {
    pub genre: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub concept: Option<String>,
    pub target: Option<TargetDelta>,
    pub scene: Option<SceneDelta>,
    pub features: Option<Vec<String>>,
    pub main_feature_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TargetDelta {
    pub age_min: Option<String>,
    pub age_max: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub personality: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneDelta {
    pub when: Option<String>,
    pub r#where: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_state() -> ProjectState {
        ProjectState {
            genre: "遊び".to_string(),
            keywords: vec!["公園".to_string(), "友達".to_string()],
            concept: "仲間と遊びを記録するアプリ".to_string(),
            target: TargetAudience {
                age_min: "10".to_string(),
                age_max: "20".to_string(),
                gender: "other".to_string(),
                occupation: "学生".to_string(),
                personality: "外向的".to_string(),
            },
            scene: UsageScene {
                when: "放課後".to_string(),
                r#where: "公園".to_string(),
            },
            features: vec![
                "記録".to_string(),
                "共有".to_string(),
                "ランキング".to_string(),
            ],
            main_feature_index: 2,
        }
    }

    #[test]
    fn empty_state_resumes_at_genre() {
        assert_eq!(ProjectState::default().resume_step(), Step::Genre);
    }

    #[test]
    fn genre_only_resumes_at_mind_map() {
        let state = ProjectState {
            genre: "遊び".to_string(),
            ..Default::default()
        };
        assert_eq!(state.resume_step(), Step::MindMap);
    }

    #[test]
    fn missing_gender_resumes_at_target() {
        let mut state = filled_state();
        state.target.gender.clear();
        assert_eq!(state.resume_step(), Step::Target);
    }

    #[test]
    fn earlier_gap_wins_over_later_answers() {
        // Everything filled except keywords: later steps earn no credit.
        let mut state = filled_state();
        state.keywords.clear();
        assert_eq!(state.resume_step(), Step::MindMap);
    }

    #[test]
    fn missing_scene_where_resumes_at_scene() {
        let mut state = filled_state();
        state.scene.r#where.clear();
        assert_eq!(state.resume_step(), Step::Scene);
    }

    #[test]
    fn unset_main_feature_resumes_at_detail() {
        let mut state = filled_state();
        state.main_feature_index = -1;
        assert_eq!(state.resume_step(), Step::FeaturesDetail);
    }

    #[test]
    fn fully_filled_resumes_at_result() {
        assert_eq!(filled_state().resume_step(), Step::Result);
    }

    #[test]
    fn resume_is_deterministic() {
        let state = filled_state();
        assert_eq!(state.resume_step(), state.resume_step());
    }

    #[test]
    fn main_feature_lookup() {
        let state = filled_state();
        assert_eq!(state.main_feature(), Some("ランキング"));

        let mut unset = state.clone();
        unset.main_feature_index = -1;
        assert_eq!(unset.main_feature(), None);

        let mut out_of_bounds = state;
        out_of_bounds.main_feature_index = 99;
        assert_eq!(out_of_bounds.main_feature(), None);
    }

    #[test]
    fn apply_overwrites_only_present_fields() {
        let mut state = filled_state();
        state.apply(StateDelta {
            concept: Some("新しいコンセプト".to_string()),
            ..Default::default()
        });
        assert_eq!(state.concept, "新しいコンセプト");
        assert_eq!(state.genre, "遊び");
        assert_eq!(state.features.len(), 3);
    }

    #[test]
    fn apply_merges_nested_target_per_field() {
        let mut state = filled_state();
        state.apply(StateDelta {
            target: Some(TargetDelta {
                gender: Some("female".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(state.target.gender, "female");
        assert_eq!(state.target.age_min, "10");
        assert_eq!(state.target.occupation, "学生");
    }

    #[test]
    fn apply_empty_delta_is_noop() {
        let mut state = filled_state();
        let before = state.clone();
        state.apply(StateDelta::default());
        assert_eq!(state, before);
    }

    #[test]
    fn missing_nested_objects_read_as_empty() {
        // A document written before target/scene existed.
        let state: ProjectState =
            serde_yaml::from_str("genre: ゲーム\nkeywords: [冒険]").unwrap();
        assert_eq!(state.genre, "ゲーム");
        assert!(state.target.age_min.is_empty());
        assert!(state.scene.when.is_empty());
        assert_eq!(state.main_feature_index, -1);
        assert_eq!(state.resume_step(), Step::Concept);
    }
}
