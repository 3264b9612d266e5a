//! World-setting text shared by every prompt, and the per-feature task lines.

use crate::schema::Feature;

/// Preamble that opens every prompt.
pub const SETTING_PREAMBLE: &str = "\
You are the lead writer for NEO-TOKYO NOIR, a rain-soaked cyberpunk detective \
setting. The year is 2089. Megacorporations own the skyline, syndicates own the \
streets, and everyone owns a secret. The tone is hard-boiled noir: terse, \
sensual, morally grey, lit by neon and reflected in puddles. Invent freely, but \
stay consistent with the setting and never break the fourth wall.";

/// Persona for the conversational guide.
pub const GUIDE_PERSONA: &str = "\
You are Kage, an information broker who knows every alley of Neo-Tokyo. You \
answer questions about the city, its people, and its dangers in character: \
clipped, wry, and a little paranoid. Keep replies under 150 words.";

/// Style suffix appended to every image request.
pub const IMAGE_STYLE: &str = "\
cinematic neo-noir cyberpunk illustration, rain, volumetric neon light, deep \
shadows, high detail";

/// One-line task description for a feature.
pub fn task(feature: Feature) -> &'static str {
    match feature {
        Feature::CharacterProfile => {
            "Write a character dossier for the person described in the inputs."
        }
        Feature::LocationProfile => {
            "Write a field-guide entry for the place described in the inputs."
        }
        Feature::Scene => "Stage a single dramatic scene from the premise in the inputs.",
        Feature::Storyboard => {
            "Break the premise in the inputs into a comic storyboard, one panel per beat."
        }
        Feature::DialogueTree => {
            "Write a branching conversation: the character opens, the player picks one of \
             three clearly different replies, and each reply leads somewhere different."
        }
        Feature::Glossary => "Compile street vocabulary around the theme in the inputs.",
        Feature::MissionBrief => "Write the briefing a fixer would hand a crew for this job.",
        Feature::Faction => "Write an intelligence dossier on the faction in the inputs.",
        Feature::Cyberware => "Write a catalog entry for the augmentation in the inputs.",
        Feature::NewsBulletin => "Write a news article about the event in the inputs.",
        Feature::Outfit => "Style a complete look for the wearer and occasion in the inputs.",
        Feature::TransformationSequence => {
            "Describe the transformation in the inputs as a sequence of visual stages."
        }
        Feature::ArtPrompt => {
            "Write one image-generation prompt depicting the transformation in the inputs, \
             carrying the requested mood."
        }
        Feature::GuideChat => "Answer the newest message in the conversation.",
        Feature::Image => "Render the prompt in the inputs.",
        Feature::PromptMatrix
        | Feature::CharacterBatch
        | Feature::LocationBatch
        | Feature::SceneMatrix => "",
    }
}

/// Feature-specific output rules beyond the field list.
pub fn extra_rules(feature: Feature) -> &'static [&'static str] {
    match feature {
        Feature::Storyboard => &[
            "Number panels from 1 in reading order.",
            "Only include `dialogue` on panels where someone speaks.",
        ],
        Feature::DialogueTree => &["The three choices must differ in intent, not just wording."],
        Feature::Glossary => &[
            "Include `art_prompt` only for terms that name something visual.",
            "Do not repeat terms.",
        ],
        Feature::TransformationSequence => &["Number stages from 1; each stage must escalate."],
        Feature::ArtPrompt => &[
            "Reply with the prompt text only: one paragraph, no title, no quotes, no preamble.",
        ],
        _ => &[],
    }
}
