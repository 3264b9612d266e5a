//! The prompt matrix: every cast member placed in every district.
//!
//! Pure local combination, no model call.

use serde::{Deserialize, Serialize};

use crate::prompt::setting::IMAGE_STYLE;
use crate::roster::{CAST, DISTRICTS, Subject};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MatrixEntry {
    pub character: String,
    pub location: String,
    pub prompt: String,
}

/// All cast × district combinations, cast-major.
pub fn prompt_matrix() -> Vec<MatrixEntry> {
    CAST.iter()
        .flat_map(|character| {
            DISTRICTS
                .iter()
                .map(move |district| entry(character, district))
        })
        .collect()
}

fn entry(character: &Subject, district: &Subject) -> MatrixEntry {
    MatrixEntry {
        character: character.name.to_string(),
        location: district.name.to_string(),
        prompt: format!(
            "{}, {}, in {}: {}. {IMAGE_STYLE}",
            character.name, character.brief, district.name, district.brief
        ),
    }
}
