//! The feature catalogue: ids, modes, and the inputs each feature collects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownFeature;

/// How a feature talks to the model (if at all).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Prompt + schema in, one Result Type instance out.
    Structured,
    /// Prompt in, plain text out.
    Freeform,
    /// Prompt in, one image out.
    Image,
    /// Pure local computation, no external call.
    Local,
    /// One structured call per subject of a fixed list.
    Batch,
}

/// A free-text input a feature collects from the user.
#[derive(Serialize, Clone, Copy, Debug)]
pub struct InputSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub placeholder: &'static str,
}

impl InputSpec {
    const fn required(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            label,
            required: true,
            placeholder,
        }
    }

    const fn optional(name: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            placeholder,
        }
    }
}

/// Every feature the studio exposes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    CharacterProfile,
    LocationProfile,
    Scene,
    Storyboard,
    DialogueTree,
    Glossary,
    MissionBrief,
    Faction,
    Cyberware,
    NewsBulletin,
    Outfit,
    TransformationSequence,
    ArtPrompt,
    GuideChat,
    Image,
    PromptMatrix,
    CharacterBatch,
    LocationBatch,
    SceneMatrix,
}

impl Feature {
    pub const ALL: [Feature; 19] = [
        Feature::CharacterProfile,
        Feature::LocationProfile,
        Feature::Scene,
        Feature::Storyboard,
        Feature::DialogueTree,
        Feature::Glossary,
        Feature::MissionBrief,
        Feature::Faction,
        Feature::Cyberware,
        Feature::NewsBulletin,
        Feature::Outfit,
        Feature::TransformationSequence,
        Feature::ArtPrompt,
        Feature::GuideChat,
        Feature::Image,
        Feature::PromptMatrix,
        Feature::CharacterBatch,
        Feature::LocationBatch,
        Feature::SceneMatrix,
    ];

    /// Stable kebab-case id used on the CLI, in URLs, and in export filenames.
    pub fn id(self) -> &'static str {
        match self {
            Feature::CharacterProfile => "character-profile",
            Feature::LocationProfile => "location-profile",
            Feature::Scene => "scene",
            Feature::Storyboard => "storyboard",
            Feature::DialogueTree => "dialogue-tree",
            Feature::Glossary => "glossary",
            Feature::MissionBrief => "mission-brief",
            Feature::Faction => "faction",
            Feature::Cyberware => "cyberware",
            Feature::NewsBulletin => "news-bulletin",
            Feature::Outfit => "outfit",
            Feature::TransformationSequence => "transformation-sequence",
            Feature::ArtPrompt => "art-prompt",
            Feature::GuideChat => "guide-chat",
            Feature::Image => "image",
            Feature::PromptMatrix => "prompt-matrix",
            Feature::CharacterBatch => "character-batch",
            Feature::LocationBatch => "location-batch",
            Feature::SceneMatrix => "scene-matrix",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Feature::CharacterProfile => "Character Profile",
            Feature::LocationProfile => "Location Profile",
            Feature::Scene => "Scene Card",
            Feature::Storyboard => "Storyboard",
            Feature::DialogueTree => "Dialogue Tree",
            Feature::Glossary => "Street Glossary",
            Feature::MissionBrief => "Mission Brief",
            Feature::Faction => "Faction Dossier",
            Feature::Cyberware => "Cyberware Catalog Entry",
            Feature::NewsBulletin => "News Bulletin",
            Feature::Outfit => "Outfit Look",
            Feature::TransformationSequence => "Transformation Sequence",
            Feature::ArtPrompt => "Art Prompt",
            Feature::GuideChat => "City Guide",
            Feature::Image => "Image Render",
            Feature::PromptMatrix => "Prompt Matrix",
            Feature::CharacterBatch => "Cast Dossiers",
            Feature::LocationBatch => "District Atlas",
            Feature::SceneMatrix => "Scene Matrix",
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Feature::ArtPrompt | Feature::GuideChat => Mode::Freeform,
            Feature::Image => Mode::Image,
            Feature::PromptMatrix => Mode::Local,
            Feature::CharacterBatch | Feature::LocationBatch | Feature::SceneMatrix => Mode::Batch,
            _ => Mode::Structured,
        }
    }

    /// Inputs collected before invoking the feature. Batch and local
    /// features run over fixed lists and take none.
    pub fn inputs(self) -> &'static [InputSpec] {
        match self {
            Feature::CharacterProfile => CHARACTER_INPUTS,
            Feature::LocationProfile => LOCATION_INPUTS,
            Feature::Scene => SCENE_INPUTS,
            Feature::Storyboard => STORYBOARD_INPUTS,
            Feature::DialogueTree => DIALOGUE_INPUTS,
            Feature::Glossary => GLOSSARY_INPUTS,
            Feature::MissionBrief => MISSION_INPUTS,
            Feature::Faction => FACTION_INPUTS,
            Feature::Cyberware => CYBERWARE_INPUTS,
            Feature::NewsBulletin => NEWS_INPUTS,
            Feature::Outfit => OUTFIT_INPUTS,
            Feature::TransformationSequence => TRANSFORMATION_INPUTS,
            Feature::ArtPrompt => ART_PROMPT_INPUTS,
            Feature::GuideChat => GUIDE_INPUTS,
            Feature::Image => IMAGE_INPUTS,
            Feature::PromptMatrix
            | Feature::CharacterBatch
            | Feature::LocationBatch
            | Feature::SceneMatrix => &[],
        }
    }

    /// Look up one of this feature's inputs by name.
    pub fn input(self, name: &str) -> Option<&'static InputSpec> {
        self.inputs().iter().find(|i| i.name == name)
    }
}

// ── Input tables ───────────────────────────────────────────────────

const CHARACTER_INPUTS: &[InputSpec] = &[
    InputSpec::required("name", "Name", "Rei Kisaragi"),
    InputSpec::required("concept", "Concept", "disgraced detective with a chrome arm"),
];

const LOCATION_INPUTS: &[InputSpec] = &[
    InputSpec::required("name", "Name", "The Velvet Static"),
    InputSpec::required("vibe", "Vibe", "smoky jazz bar under a monorail"),
];

const SCENE_INPUTS: &[InputSpec] = &[
    InputSpec::required("premise", "Premise", "a handoff goes wrong in the rain"),
    InputSpec::required("location", "Location", "Harbor Ward Docks"),
    InputSpec::optional("characters", "Characters", "Rei, Jin"),
];

const STORYBOARD_INPUTS: &[InputSpec] = &[
    InputSpec::required("premise", "Premise", "a chase across rooftop billboards"),
    InputSpec::optional("style", "Visual style", "ink-wash with neon accents"),
];

const DIALOGUE_INPUTS: &[InputSpec] = &[
    InputSpec::required("character", "Character", "Mika Tsukino"),
    InputSpec::required("situation", "Situation", "a stranger asks about her past"),
];

const GLOSSARY_INPUTS: &[InputSpec] = &[InputSpec::required(
    "theme",
    "Theme",
    "street slang of the undercity",
)];

const MISSION_INPUTS: &[InputSpec] = &[
    InputSpec::required("client", "Client", "a nervous corporate salaryman"),
    InputSpec::required("objective", "Objective", "recover a stolen memory chip"),
];

const FACTION_INPUTS: &[InputSpec] = &[
    InputSpec::required("name", "Name", "The Paper Lanterns"),
    InputSpec::required("concept", "Concept", "hacktivist monks"),
];

const CYBERWARE_INPUTS: &[InputSpec] = &[InputSpec::required(
    "concept",
    "Concept",
    "an eye implant that records dreams",
)];

const NEWS_INPUTS: &[InputSpec] = &[
    InputSpec::required("event", "Event", "a blackout hits the Ginza spire"),
    InputSpec::optional("slant", "Editorial slant", "corporate propaganda"),
];

const OUTFIT_INPUTS: &[InputSpec] = &[
    InputSpec::required("wearer", "Wearer", "Jin Akagawa"),
    InputSpec::required("occasion", "Occasion", "a syndicate funeral"),
];

const TRANSFORMATION_INPUTS: &[InputSpec] = &[
    InputSpec::required("subject", "Subject", "Mika Tsukino"),
    InputSpec::required(
        "transformation",
        "Transformation",
        "liquid mercury flowing over her skin",
    ),
    InputSpec::optional("mood", "Mood", "seductive and dangerous"),
];

const ART_PROMPT_INPUTS: &[InputSpec] = &[
    InputSpec::required(
        "transformation",
        "Transformation",
        "liquid mercury flowing over her skin",
    ),
    InputSpec::required("mood", "Mood", "seductive and dangerous"),
];

const GUIDE_INPUTS: &[InputSpec] = &[InputSpec::required(
    "message",
    "Message",
    "Where can I buy black-market optics?",
)];

const IMAGE_INPUTS: &[InputSpec] = &[InputSpec::required(
    "prompt",
    "Prompt",
    "rain-soaked alley lit by pink neon",
)];

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}
