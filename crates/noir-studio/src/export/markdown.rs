//! Markdown layouts, one per prose Result Type.
//!
//! Values are embedded verbatim, newlines included, and always in the
//! type's declared field order.

use crate::prompt::fenced;
use crate::render::scalar_text;
use crate::schema::*;

pub trait ToMarkdown {
    fn to_markdown(&self) -> String;
}

/// Small append-only Markdown writer. Every block ends with a blank line.
struct Doc {
    out: String,
}

impl Doc {
    fn new(title: &str) -> Self {
        Self {
            out: format!("# {title}\n\n"),
        }
    }

    fn h2(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&format!("## {text}\n\n"));
        self
    }

    fn h3(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&format!("### {text}\n\n"));
        self
    }

    fn field(&mut self, label: &str, value: &str) -> &mut Self {
        self.out.push_str(&format!("**{label}:** {value}\n\n"));
        self
    }

    fn para(&mut self, text: &str) -> &mut Self {
        self.out.push_str(text);
        self.out.push_str("\n\n");
        self
    }

    fn quote(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&format!("> {text}\n\n"));
        self
    }

    fn bullets(&mut self, items: &[String]) -> &mut Self {
        for item in items {
            self.out.push_str(&format!("- {item}\n"));
        }
        self.out.push('\n');
        self
    }

    fn prompt(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&fenced(text));
        self.out.push_str("\n\n");
        self
    }

    fn finish(self) -> String {
        let mut out = self.out;
        out.truncate(out.trim_end().len());
        out.push('\n');
        out
    }
}

/// Grouped for reading, followed by the raw amount: `¥2,500,000 (2500000)`.
fn yen(field: &str, amount: i64) -> String {
    format!("{} ({amount})", scalar_text(field, &serde_json::Value::from(amount)))
}

impl ToMarkdown for CharacterProfile {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.name);
        doc.field("Alias", &self.alias)
            .field("Occupation", &self.occupation)
            .h2("Appearance")
            .para(&self.appearance)
            .h2("Personality")
            .para(&self.personality)
            .h2("Backstory")
            .para(&self.backstory)
            .h2("Signature Quote")
            .quote(&self.signature_quote)
            .h2("Cybernetics")
            .bullets(&self.cybernetics);
        doc.finish()
    }
}

impl ToMarkdown for LocationProfile {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.name);
        doc.field("District", &self.district)
            .field("Atmosphere", &self.atmosphere)
            .h2("Description")
            .para(&self.description)
            .h2("Sensory Details")
            .bullets(&self.sensory_details)
            .h2("Points of Interest");
        for poi in &self.points_of_interest {
            doc.h3(&poi.name).para(&poi.description);
        }
        doc.h2("Hidden Secret").para(&self.hidden_secret);
        doc.finish()
    }
}

impl ToMarkdown for SceneCard {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.title);
        doc.field("Setting", &self.setting)
            .field("Characters", &self.characters.join(", "))
            .h2("Synopsis")
            .para(&self.synopsis)
            .field("Mood", &self.mood)
            .field("Lighting", &self.lighting)
            .h2("Visual Prompt")
            .prompt(&self.visual_prompt);
        doc.finish()
    }
}

impl ToMarkdown for Storyboard {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.title);
        doc.para(&format!("_{}_", self.logline));
        for panel in &self.panels {
            doc.h2(&format!("Panel {}: {}", panel.panel_number, panel.shot_type))
                .para(&panel.description);
            if let Some(line) = &panel.dialogue {
                doc.quote(line);
            }
            doc.prompt(&panel.art_prompt);
        }
        doc.finish()
    }
}

impl ToMarkdown for DialogueTree {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&format!("Dialogue: {}", self.speaker));
        doc.field("Situation", &self.situation)
            .h2("Opening Line")
            .quote(&self.opening_line)
            .h2("Branches");
        for (i, branch) in self.branches.iter().enumerate() {
            doc.h3(&format!("Choice {}: {}", i + 1, branch.choice))
                .field("Response", &branch.response)
                .field("Outcome", &branch.outcome);
        }
        doc.finish()
    }
}

impl ToMarkdown for Glossary {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&format!("Street Glossary: {}", self.theme));
        for entry in &self.entries {
            doc.h2(&entry.term)
                .field("Category", &entry.category)
                .para(&entry.definition)
                .quote(&entry.example_usage);
            if let Some(art) = &entry.art_prompt {
                doc.prompt(art);
            }
        }
        doc.finish()
    }
}

impl ToMarkdown for MissionBrief {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&format!("Operation {}", self.codename));
        doc.field("Client", &self.client)
            .field("Objective", &self.objective)
            .field("Location", &self.location)
            .h2("Complications")
            .bullets(&self.complications)
            .field("Payout", &yen("payout_yen", self.payout_yen))
            .h2("Twist")
            .para(&self.twist);
        doc.finish()
    }
}

impl ToMarkdown for FactionProfile {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.name);
        doc.quote(&self.motto)
            .field("Leader", &self.leader)
            .field("Territory", &self.territory)
            .h2("Ideology")
            .para(&self.ideology)
            .h2("Goals")
            .bullets(&self.goals)
            .h2("Rivals")
            .bullets(&self.rivals)
            .h2("Visual Identity")
            .para(&self.visual_identity);
        doc.finish()
    }
}

impl ToMarkdown for CyberwareItem {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.name);
        doc.field("Manufacturer", &self.manufacturer)
            .field("Category", &self.category)
            .para(&self.description)
            .field("Street price", &yen("street_price_yen", self.street_price_yen))
            .h2("Side Effects")
            .bullets(&self.side_effects)
            .h2("Art Prompt")
            .prompt(&self.art_prompt);
        doc.finish()
    }
}

impl ToMarkdown for NewsBulletin {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.headline);
        doc.para(&format!("_{}_ | {}", self.outlet, self.dateline))
            .para(&self.body)
            .quote(&self.pull_quote)
            .h2("Related Rumors")
            .bullets(&self.related_rumors);
        doc.finish()
    }
}

impl ToMarkdown for OutfitLook {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.look_name);
        doc.field("Wearer", &self.wearer)
            .field("Occasion", &self.occasion)
            .h2("Pieces");
        let pieces: Vec<String> = self
            .pieces
            .iter()
            .map(|p| format!("**{}** ({}): {}", p.item, p.material, p.detail))
            .collect();
        doc.bullets(&pieces)
            .h2("Color Palette")
            .bullets(&self.color_palette)
            .h2("Art Prompt")
            .prompt(&self.art_prompt);
        doc.finish()
    }
}

impl ToMarkdown for TransformationSequence {
    fn to_markdown(&self) -> String {
        let mut doc = Doc::new(&self.title);
        doc.field("Subject", &self.subject);
        for stage in &self.stages {
            doc.h2(&format!("Stage {}", stage.stage_number))
                .para(&stage.description)
                .prompt(&stage.art_prompt);
        }
        doc.h2("Final Form").para(&self.final_form);
        doc.finish()
    }
}

impl ToMarkdown for GeneratedResult {
    fn to_markdown(&self) -> String {
        match self {
            GeneratedResult::CharacterProfile(r) => r.to_markdown(),
            GeneratedResult::LocationProfile(r) => r.to_markdown(),
            GeneratedResult::Scene(r) => r.to_markdown(),
            GeneratedResult::Storyboard(r) => r.to_markdown(),
            GeneratedResult::DialogueTree(r) => r.to_markdown(),
            GeneratedResult::Glossary(r) => r.to_markdown(),
            GeneratedResult::MissionBrief(r) => r.to_markdown(),
            GeneratedResult::Faction(r) => r.to_markdown(),
            GeneratedResult::Cyberware(r) => r.to_markdown(),
            GeneratedResult::NewsBulletin(r) => r.to_markdown(),
            GeneratedResult::Outfit(r) => r.to_markdown(),
            GeneratedResult::TransformationSequence(r) => r.to_markdown(),
        }
    }
}
