//! Sample values of every Result Type for unit tests.

use crate::schema::*;

fn s(v: &str) -> String {
    v.to_string()
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|v| v.to_string()).collect()
}

pub fn character() -> CharacterProfile {
    CharacterProfile {
        name: s("Rei Kisaragi"),
        alias: s("Ghost"),
        occupation: s("Disgraced homicide detective"),
        appearance: s("Chrome left arm, rain-soaked trench coat"),
        personality: s("Tired, stubborn, quietly kind"),
        backstory: s("Framed for a killing she solved.\nNow works for cash."),
        signature_quote: s("Rain never washes anything clean.\nIt just moves the dirt."),
        cybernetics: list(&["Chrome arm", "Low-light eyes"]),
    }
}

pub fn location() -> LocationProfile {
    LocationProfile {
        name: s("The Velvet Static"),
        district: s("Kabukicho"),
        atmosphere: s("Smoky, intimate, watchful"),
        description: s("A jazz bar under the monorail."),
        sensory_details: list(&["Ozone", "Saxophone", "Wet neon"]),
        points_of_interest: vec![
            PointOfInterest {
                name: s("Back booth"),
                description: s("Where deals happen"),
            },
            PointOfInterest {
                name: s("Stage"),
                description: s("Mika sings here"),
            },
        ],
        hidden_secret: s("The cellar is a data vault."),
    }
}

pub fn scene() -> SceneCard {
    SceneCard {
        title: s("Handoff"),
        setting: s("Harbor Ward Docks"),
        characters: list(&["Rei", "Jin"]),
        synopsis: s("A deal goes wrong in the rain."),
        mood: s("Tense"),
        lighting: s("Sodium orange"),
        visual_prompt: s("two figures under sodium lights, fog"),
    }
}

pub fn storyboard() -> Storyboard {
    let panel = |n: u32, dialogue: Option<&str>| StoryboardPanel {
        panel_number: n,
        shot_type: s("Wide"),
        description: format!("Beat {n}"),
        dialogue: dialogue.map(s),
        art_prompt: format!("rooftop chase, beat {n}"),
    };
    Storyboard {
        title: s("Billboard Run"),
        logline: s("A chase across rooftop billboards."),
        panels: vec![
            panel(1, None),
            panel(2, Some("Stop!")),
            panel(3, None),
            panel(4, Some("Never.")),
        ],
    }
}

pub fn dialogue() -> DialogueTree {
    let branch = |c: &str, r: &str, o: &str| DialogueBranch {
        choice: s(c),
        response: s(r),
        outcome: s(o),
    };
    DialogueTree {
        speaker: s("Mika Tsukino"),
        situation: s("A stranger asks about her past"),
        opening_line: s("You lost, sugar?"),
        branches: vec![
            branch("Flirt", "Cute.", "She smiles"),
            branch("Threaten", "Try it.", "Bouncers arrive"),
            branch("Leave", "Smart.", "Nothing happens"),
        ],
    }
}

pub fn glossary() -> Glossary {
    let entry = |t: &str, d: &str, art: Option<&str>| GlossaryEntry {
        term: s(t),
        category: s("slang"),
        definition: s(d),
        example_usage: format!("Watch the {t}."),
        art_prompt: art.map(s),
    };
    Glossary {
        theme: s("Undercity slang"),
        entries: vec![
            entry("chrome", "Cybernetic limb", Some("gleaming chrome arm")),
            entry("ice", "Security software,\nthe \"cold\" kind", None),
            entry("gonk", "Idiot", None),
            entry("flatline", "To die", None),
            entry("netrunner", "Hacker", Some("kid in LED hair")),
            entry("fixer", "Broker", None),
            entry("yen-hole", "Money pit", None),
            entry("lantern", "Informant", None),
        ],
    }
}

pub fn mission() -> MissionBrief {
    MissionBrief {
        codename: s("PAPER CRANE"),
        client: s("A nervous salaryman"),
        objective: s("Recover a stolen memory chip"),
        location: s("Ginza Skyline Spire"),
        complications: list(&["Corporate security", "A rival crew"]),
        payout_yen: 2_500_000,
        twist: s("The client stole it first."),
    }
}

pub fn faction() -> FactionProfile {
    FactionProfile {
        name: s("The Paper Lanterns"),
        motto: s("Light in every wire"),
        leader: s("Abbot Ren"),
        territory: s("Shinjuku Undercity"),
        ideology: s("Information wants to be free"),
        goals: list(&["Leak the Spire ledgers", "Protect runners"]),
        rivals: list(&["Akagawa clan"]),
        visual_identity: s("Saffron robes over mesh armor"),
    }
}

pub fn cyberware() -> CyberwareItem {
    CyberwareItem {
        name: s("Somnus Lens"),
        manufacturer: s("Hoshino Optics"),
        category: s("Ocular"),
        description: s("Records dreams to a private shard."),
        street_price_yen: 480_000,
        side_effects: list(&["Insomnia"]),
        art_prompt: s("macro shot of a glowing iris implant"),
    }
}

pub fn news() -> NewsBulletin {
    NewsBulletin {
        headline: s("Blackout Hits Ginza Spire"),
        outlet: s("Neo-Tokyo Wire"),
        dateline: s("GINZA, 2089-11-02"),
        body: s("Power failed at 02:00.\n\nOfficials blame weather."),
        pull_quote: s("It was like the city blinked."),
        related_rumors: list(&["Inside job", "Netrunner strike"]),
    }
}

pub fn outfit() -> OutfitLook {
    let piece = |i: &str, m: &str, d: &str| OutfitPiece {
        item: s(i),
        material: s(m),
        detail: s(d),
    };
    OutfitLook {
        look_name: s("Funeral White"),
        wearer: s("Jin Akagawa"),
        occasion: s("A syndicate funeral"),
        pieces: vec![
            piece("Suit", "Silk", "Hidden holster"),
            piece("Gloves", "Leather", "Amber piping"),
            piece("Shades", "Smart glass", "HUD overlay"),
        ],
        color_palette: list(&["White", "Amber", "Black"]),
        art_prompt: s("man in white suit at a rainy funeral"),
    }
}

pub fn transformation() -> TransformationSequence {
    let stage = |n: u32| TransformationStage {
        stage_number: n,
        description: format!("Mercury rises, stage {n}"),
        art_prompt: format!("liquid mercury over skin, stage {n}"),
    };
    TransformationSequence {
        title: s("Quicksilver"),
        subject: s("Mika Tsukino"),
        stages: (1..=4).map(stage).collect(),
        final_form: s("A living chrome statue"),
    }
}

/// One value of every Result Type, in catalogue order.
pub fn all_results() -> Vec<GeneratedResult> {
    vec![
        character().into_result(),
        location().into_result(),
        scene().into_result(),
        storyboard().into_result(),
        dialogue().into_result(),
        glossary().into_result(),
        mission().into_result(),
        faction().into_result(),
        cyberware().into_result(),
        news().into_result(),
        outfit().into_result(),
        transformation().into_result(),
    ]
}

/// Every string and number leaf of a JSON value, depth-first in document
/// order. Numbers come back in their plain decimal form.
pub fn leaf_values(value: &serde_json::Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_leaves(value, &mut out);
    out
}

fn collect_leaves(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(v) => out.push(v.clone()),
        serde_json::Value::Number(n) => out.push(n.to_string()),
        serde_json::Value::Array(items) => items.iter().for_each(|v| collect_leaves(v, out)),
        serde_json::Value::Object(map) => map.values().for_each(|v| collect_leaves(v, out)),
        _ => {}
    }
}
