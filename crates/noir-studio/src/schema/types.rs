//! Result Types: one record shape per structured feature.
//!
//! Each struct's serde field order matches its descriptor's `FIELDS` table.
//! The registry tests hold the two in lockstep.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::descriptor::{FieldSpec, SchemaDescriptor};
use crate::schema::{Feature, GeneratedResult, ResultType};

// ── Character profile ──────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct CharacterProfile {
    pub name: String,
    pub alias: String,
    pub occupation: String,
    pub appearance: String,
    pub personality: String,
    pub backstory: String,
    pub signature_quote: String,
    pub cybernetics: Vec<String>,
}

const CHARACTER_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("name", "Full name as it appears in police files."),
    FieldSpec::string("alias", "Street name."),
    FieldSpec::string("occupation", "What they do for money."),
    FieldSpec::string("appearance", "Visual description, head to toe."),
    FieldSpec::string("personality", "Temperament and habits."),
    FieldSpec::string("backstory", "Two or three paragraphs of history."),
    FieldSpec::string("signature_quote", "A line they are known for."),
    FieldSpec::string_list("cybernetics", "Installed augmentations.").between(2, 5),
];

impl ResultType for CharacterProfile {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::CharacterProfile,
        name: "CharacterProfile",
        description: "A dossier on one resident of Neo-Tokyo.",
        fields: CHARACTER_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::CharacterProfile(self)
    }
}

// ── Location profile ───────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct PointOfInterest {
    pub name: String,
    pub description: String,
}

const POINT_OF_INTEREST_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("name", ""),
    FieldSpec::string("description", ""),
];

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct LocationProfile {
    pub name: String,
    pub district: String,
    pub atmosphere: String,
    pub description: String,
    pub sensory_details: Vec<String>,
    pub points_of_interest: Vec<PointOfInterest>,
    pub hidden_secret: String,
}

const LOCATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("name", "Name of the place."),
    FieldSpec::string("district", "District of Neo-Tokyo it belongs to."),
    FieldSpec::string("atmosphere", "One-line mood summary."),
    FieldSpec::string("description", "Prose description of the place."),
    FieldSpec::string_list("sensory_details", "Sights, sounds, and smells.").between(3, 6),
    FieldSpec::record_list(
        "points_of_interest",
        POINT_OF_INTEREST_FIELDS,
        "Notable spots inside the location.",
    )
    .between(2, 4),
    FieldSpec::string("hidden_secret", "Something only locals know."),
];

impl ResultType for LocationProfile {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::LocationProfile,
        name: "LocationProfile",
        description: "A field guide entry for one place in the city.",
        fields: LOCATION_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::LocationProfile(self)
    }
}

// ── Scene card ─────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct SceneCard {
    pub title: String,
    pub setting: String,
    pub characters: Vec<String>,
    pub synopsis: String,
    pub mood: String,
    pub lighting: String,
    pub visual_prompt: String,
}

const SCENE_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("title", "Scene title."),
    FieldSpec::string("setting", "Where and when the scene happens."),
    FieldSpec::string_list("characters", "Characters present."),
    FieldSpec::string("synopsis", "What happens, in prose."),
    FieldSpec::string("mood", "Emotional register."),
    FieldSpec::string("lighting", "Cinematography notes on light and color."),
    FieldSpec::string("visual_prompt", "A single image-generation prompt for the key frame."),
];

impl ResultType for SceneCard {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::Scene,
        name: "SceneCard",
        description: "One dramatic scene with staging notes.",
        fields: SCENE_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::Scene(self)
    }
}

// ── Storyboard ─────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct StoryboardPanel {
    pub panel_number: u32,
    pub shot_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    pub art_prompt: String,
}

const STORYBOARD_PANEL_FIELDS: &[FieldSpec] = &[
    FieldSpec::integer("panel_number", "1-based panel index."),
    FieldSpec::string("shot_type", "Camera framing, e.g. close-up, wide, dutch angle."),
    FieldSpec::string("description", "What the panel shows."),
    FieldSpec::string("dialogue", "Spoken line, if any.").optional(),
    FieldSpec::string("art_prompt", "Image-generation prompt for the panel."),
];

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct Storyboard {
    pub title: String,
    pub logline: String,
    pub panels: Vec<StoryboardPanel>,
}

const STORYBOARD_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("title", "Sequence title."),
    FieldSpec::string("logline", "One-sentence summary."),
    FieldSpec::record_list("panels", STORYBOARD_PANEL_FIELDS, "Panels in reading order.")
        .between(4, 6),
];

impl ResultType for Storyboard {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::Storyboard,
        name: "Storyboard",
        description: "A short comic-style storyboard.",
        fields: STORYBOARD_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::Storyboard(self)
    }
}

// ── Dialogue tree ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct DialogueBranch {
    pub choice: String,
    pub response: String,
    pub outcome: String,
}

const DIALOGUE_BRANCH_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("choice", "What the player says."),
    FieldSpec::string("response", "How the character answers."),
    FieldSpec::string("outcome", "Where the conversation goes next."),
];

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct DialogueTree {
    pub speaker: String,
    pub situation: String,
    pub opening_line: String,
    pub branches: Vec<DialogueBranch>,
}

const DIALOGUE_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("speaker", "The character speaking."),
    FieldSpec::string("situation", "Framing for the exchange."),
    FieldSpec::string("opening_line", "The character's first line."),
    FieldSpec::record_list("branches", DIALOGUE_BRANCH_FIELDS, "Distinct player choices.")
        .between(3, 3),
];

impl ResultType for DialogueTree {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::DialogueTree,
        name: "DialogueTree",
        description: "A branching conversation with three distinct choices.",
        fields: DIALOGUE_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::DialogueTree(self)
    }
}

// ── Glossary ───────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct GlossaryEntry {
    pub term: String,
    pub category: String,
    pub definition: String,
    pub example_usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_prompt: Option<String>,
}

const GLOSSARY_ENTRY_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("term", "The slang term or proper noun."),
    FieldSpec::string("category", "Slang, tech, place, organization, or drug."),
    FieldSpec::string("definition", "Plain-language meaning."),
    FieldSpec::string("example_usage", "The term used in a line of dialogue."),
    FieldSpec::string("art_prompt", "Image prompt, only for visual terms.").optional(),
];

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct Glossary {
    pub theme: String,
    pub entries: Vec<GlossaryEntry>,
}

const GLOSSARY_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("theme", "What ties the entries together."),
    FieldSpec::record_list("entries", GLOSSARY_ENTRY_FIELDS, "Glossary entries.").between(8, 12),
];

impl ResultType for Glossary {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::Glossary,
        name: "Glossary",
        description: "Street vocabulary of the city.",
        fields: GLOSSARY_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::Glossary(self)
    }
}

// ── Mission brief ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct MissionBrief {
    pub codename: String,
    pub client: String,
    pub objective: String,
    pub location: String,
    pub complications: Vec<String>,
    pub payout_yen: i64,
    pub twist: String,
}

const MISSION_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("codename", "Operation codename."),
    FieldSpec::string("client", "Who is paying, and what they claim to be."),
    FieldSpec::string("objective", "What must be done."),
    FieldSpec::string("location", "Where the job happens."),
    FieldSpec::string_list("complications", "Things that will go wrong.").between(2, 4),
    FieldSpec::integer("payout_yen", "Offered payment in yen."),
    FieldSpec::string("twist", "What the client is not telling."),
];

impl ResultType for MissionBrief {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::MissionBrief,
        name: "MissionBrief",
        description: "A fixer's job briefing.",
        fields: MISSION_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::MissionBrief(self)
    }
}

// ── Faction ────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct FactionProfile {
    pub name: String,
    pub motto: String,
    pub leader: String,
    pub territory: String,
    pub ideology: String,
    pub goals: Vec<String>,
    pub rivals: Vec<String>,
    pub visual_identity: String,
}

const FACTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("name", "Faction name."),
    FieldSpec::string("motto", "Their creed in one line."),
    FieldSpec::string("leader", "Who runs it."),
    FieldSpec::string("territory", "Where they hold power."),
    FieldSpec::string("ideology", "What they believe."),
    FieldSpec::string_list("goals", "What they want.").between(2, 4),
    FieldSpec::string_list("rivals", "Who stands in their way.").between(1, 3),
    FieldSpec::string("visual_identity", "Colors, symbols, and dress."),
];

impl ResultType for FactionProfile {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::Faction,
        name: "FactionProfile",
        description: "An intelligence dossier on a gang, corp, or cult.",
        fields: FACTION_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::Faction(self)
    }
}

// ── Cyberware ──────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct CyberwareItem {
    pub name: String,
    pub manufacturer: String,
    pub category: String,
    pub description: String,
    pub street_price_yen: i64,
    pub side_effects: Vec<String>,
    pub art_prompt: String,
}

const CYBERWARE_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("name", "Product name."),
    FieldSpec::string("manufacturer", "Corporation or back-alley clinic."),
    FieldSpec::string("category", "Body system it replaces or augments."),
    FieldSpec::string("description", "Catalog copy."),
    FieldSpec::integer("street_price_yen", "Black-market price in yen."),
    FieldSpec::string_list("side_effects", "Known side effects.").between(1, 4),
    FieldSpec::string("art_prompt", "Product-shot image prompt."),
];

impl ResultType for CyberwareItem {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::Cyberware,
        name: "CyberwareItem",
        description: "A catalog entry for one augmentation.",
        fields: CYBERWARE_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::Cyberware(self)
    }
}

// ── News bulletin ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct NewsBulletin {
    pub headline: String,
    pub outlet: String,
    pub dateline: String,
    pub body: String,
    pub pull_quote: String,
    pub related_rumors: Vec<String>,
}

const NEWS_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("headline", "Headline."),
    FieldSpec::string("outlet", "Publishing outlet."),
    FieldSpec::string("dateline", "Place and in-world date."),
    FieldSpec::string("body", "Article body, several paragraphs."),
    FieldSpec::string("pull_quote", "Quoted line from a source."),
    FieldSpec::string_list("related_rumors", "What the street says instead.").between(2, 3),
];

impl ResultType for NewsBulletin {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::NewsBulletin,
        name: "NewsBulletin",
        description: "A news article from a city outlet.",
        fields: NEWS_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::NewsBulletin(self)
    }
}

// ── Outfit ─────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct OutfitPiece {
    pub item: String,
    pub material: String,
    pub detail: String,
}

const OUTFIT_PIECE_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("item", "Garment or accessory."),
    FieldSpec::string("material", "What it is made of."),
    FieldSpec::string("detail", "The detail that makes it memorable."),
];

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct OutfitLook {
    pub look_name: String,
    pub wearer: String,
    pub occasion: String,
    pub pieces: Vec<OutfitPiece>,
    pub color_palette: Vec<String>,
    pub art_prompt: String,
}

const OUTFIT_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("look_name", "Name of the look."),
    FieldSpec::string("wearer", "Who wears it."),
    FieldSpec::string("occasion", "Where it is worn."),
    FieldSpec::record_list("pieces", OUTFIT_PIECE_FIELDS, "Individual pieces.").between(3, 6),
    FieldSpec::string_list("color_palette", "Named colors.").between(3, 5),
    FieldSpec::string("art_prompt", "Full-body fashion image prompt."),
];

impl ResultType for OutfitLook {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::Outfit,
        name: "OutfitLook",
        description: "A styled look for one character.",
        fields: OUTFIT_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::Outfit(self)
    }
}

// ── Transformation sequence ────────────────────────────────────────

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct TransformationStage {
    pub stage_number: u32,
    pub description: String,
    pub art_prompt: String,
}

const TRANSFORMATION_STAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::integer("stage_number", "1-based stage index."),
    FieldSpec::string("description", "What changes at this stage."),
    FieldSpec::string("art_prompt", "Image prompt for the stage."),
];

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct TransformationSequence {
    pub title: String,
    pub subject: String,
    pub stages: Vec<TransformationStage>,
    pub final_form: String,
}

const TRANSFORMATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::string("title", "Sequence title."),
    FieldSpec::string("subject", "Who or what transforms."),
    FieldSpec::record_list("stages", TRANSFORMATION_STAGE_FIELDS, "Stages in order.")
        .between(4, 6),
    FieldSpec::string("final_form", "Description of the end state."),
];

impl ResultType for TransformationSequence {
    const DESCRIPTOR: SchemaDescriptor = SchemaDescriptor {
        feature: Feature::TransformationSequence,
        name: "TransformationSequence",
        description: "A staged visual transformation.",
        fields: TRANSFORMATION_FIELDS,
    };

    fn into_result(self) -> GeneratedResult {
        GeneratedResult::TransformationSequence(self)
    }
}
