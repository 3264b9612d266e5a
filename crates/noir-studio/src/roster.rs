//! The fixed cast and districts the batch generators and the prompt matrix
//! iterate over.

use serde::Serialize;

/// A named entry of a fixed list, with a short visual brief.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subject {
    pub name: &'static str,
    pub brief: &'static str,
}

pub const CAST: [Subject; 4] = [
    Subject {
        name: "Rei Kisaragi",
        brief: "disgraced homicide detective with a chrome left arm and a rain-soaked trench coat",
    },
    Subject {
        name: "Mika Tsukino",
        brief: "nightclub singer with shifting holographic tattoos and a voice that opens locks",
    },
    Subject {
        name: "Jin Akagawa",
        brief: "yakuza fixer in a white suit, optical implants glowing amber",
    },
    Subject {
        name: "Yuki Hoshino",
        brief: "teenage netrunner with LED-laced hair and a jacket full of stolen decks",
    },
];

pub const DISTRICTS: [Subject; 4] = [
    Subject {
        name: "Kabukicho Neon Maze",
        brief: "endless alleys of pachinko parlors and hologram hostesses under pink neon",
    },
    Subject {
        name: "Shinjuku Undercity",
        brief: "flooded subway tunnels turned into black markets lit by paper lanterns",
    },
    Subject {
        name: "Harbor Ward Docks",
        brief: "rusting container stacks, fog horns, and smuggler skiffs under sodium lights",
    },
    Subject {
        name: "Ginza Skyline Spire",
        brief: "a mirrored corporate arcology piercing the smog, all glass and cold money",
    },
];

/// One scene-matrix pairing: a cast member placed in a district.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pairing {
    pub character: Subject,
    pub district: Subject,
}

impl Pairing {
    /// Display label, e.g. `"Rei Kisaragi @ Kabukicho Neon Maze"`.
    pub fn label(&self) -> String {
        format!("{} @ {}", self.character.name, self.district.name)
    }
}

/// Cast member *i* paired with district *i*.
pub fn scene_pairings() -> Vec<Pairing> {
    CAST.iter()
        .zip(DISTRICTS.iter())
        .map(|(character, district)| Pairing {
            character: *character,
            district: *district,
        })
        .collect()
}
