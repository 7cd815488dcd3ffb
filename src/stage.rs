//! Static registry of the seven pipeline stages.
//!
//! The registry is fixed at compile time: execution order, result slot
//! names, and human-facing labels never change at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Script,
    Tts,
    Storyboard,
    VideoPrompts,
    Thumbnails,
    Hooks,
    Seo,
}

/// One member of the fixed stage sequence.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub id: StageId,
    /// Name under which the stage's output is stored in the session results.
    pub slot: &'static str,
    /// Human-facing label used in progress output and exports.
    pub label: &'static str,
}

/// Number of stages in the pipeline.
pub const STAGE_COUNT: usize = 7;

const REGISTRY: [Stage; STAGE_COUNT] = [
    Stage {
        id: StageId::Script,
        slot: "script",
        label: "Script",
    },
    Stage {
        id: StageId::Tts,
        slot: "tts",
        label: "Voice AI",
    },
    Stage {
        id: StageId::Storyboard,
        slot: "storyboard",
        label: "Storyboard",
    },
    Stage {
        id: StageId::VideoPrompts,
        slot: "video_prompts",
        label: "Video Prompts",
    },
    Stage {
        id: StageId::Thumbnails,
        slot: "thumbnails",
        label: "Thumbnails",
    },
    Stage {
        id: StageId::Hooks,
        slot: "hooks",
        label: "Retention Hooks",
    },
    Stage {
        id: StageId::Seo,
        slot: "seo",
        label: "SEO Assets",
    },
];

/// The ordered list of all seven stages.
pub fn registry() -> &'static [Stage; STAGE_COUNT] {
    &REGISTRY
}

impl StageId {
    /// Position of this stage in execution order, 0-based.
    pub fn ordinal(self) -> usize {
        REGISTRY
            .iter()
            .position(|stage| stage.id == self)
            .expect("every StageId appears in the registry")
    }

    /// Stage at the given ordinal, if within range.
    pub fn at(ordinal: usize) -> Option<StageId> {
        REGISTRY.get(ordinal).map(|stage| stage.id)
    }

    pub fn slot(self) -> &'static str {
        REGISTRY[self.ordinal()].slot
    }

    pub fn label(self) -> &'static str {
        REGISTRY[self.ordinal()].label
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let ids: Vec<StageId> = registry().iter().map(|stage| stage.id).collect();
        assert_eq!(
            ids,
            vec![
                StageId::Script,
                StageId::Tts,
                StageId::Storyboard,
                StageId::VideoPrompts,
                StageId::Thumbnails,
                StageId::Hooks,
                StageId::Seo,
            ]
        );
        for (ordinal, stage) in registry().iter().enumerate() {
            assert_eq!(stage.id.ordinal(), ordinal);
            assert_eq!(StageId::at(ordinal), Some(stage.id));
        }
        assert_eq!(StageId::at(STAGE_COUNT), None);
    }

    #[test]
    fn test_slot_names() {
        assert_eq!(StageId::Script.slot(), "script");
        assert_eq!(StageId::VideoPrompts.slot(), "video_prompts");
        assert_eq!(StageId::Seo.slot(), "seo");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&StageId::VideoPrompts).unwrap();
        assert_eq!(json, "\"video_prompts\"");
        let id: StageId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, StageId::VideoPrompts);
    }
}
