//! Schema registry: the fixed set of Result Types and their descriptors.
//!
//! Every structured feature owns exactly one Result Type. The type is a
//! plain serde struct (so the completion client can decode into it), and it
//! implements [`ResultType`] to carry its [`SchemaDescriptor`], the field
//! table the prompt compiler, completion client, and renderer all read.
//! [`GeneratedResult`] is the closed sum of all Result Types, tagged by
//! feature id when serialized.

pub mod descriptor;
pub mod feature;
pub mod registry;
pub mod types;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use descriptor::{Cardinality, FieldKind, FieldSpec, SchemaDescriptor};
pub use feature::{Feature, InputSpec, Mode};
pub use registry::{descriptor, structured_features};
pub use types::*;

/// A record shape returned by one structured feature.
pub trait ResultType: Serialize + DeserializeOwned + JsonSchema + Send + Sync + 'static {
    /// Field table for this type. `DESCRIPTOR.feature` names the owning feature.
    const DESCRIPTOR: SchemaDescriptor;

    /// Wrap into the tagged sum type.
    fn into_result(self) -> GeneratedResult;
}

/// One Result Type instance, tagged with the feature that produced it.
///
/// Serializes as `{"feature": "<id>", "data": {...}}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "feature", content = "data", rename_all = "kebab-case")]
pub enum GeneratedResult {
    CharacterProfile(CharacterProfile),
    LocationProfile(LocationProfile),
    Scene(SceneCard),
    Storyboard(Storyboard),
    DialogueTree(DialogueTree),
    Glossary(Glossary),
    MissionBrief(MissionBrief),
    Faction(FactionProfile),
    Cyberware(CyberwareItem),
    NewsBulletin(NewsBulletin),
    Outfit(OutfitLook),
    TransformationSequence(TransformationSequence),
}

impl GeneratedResult {
    pub fn descriptor(&self) -> SchemaDescriptor {
        match self {
            GeneratedResult::CharacterProfile(_) => CharacterProfile::DESCRIPTOR,
            GeneratedResult::LocationProfile(_) => LocationProfile::DESCRIPTOR,
            GeneratedResult::Scene(_) => SceneCard::DESCRIPTOR,
            GeneratedResult::Storyboard(_) => Storyboard::DESCRIPTOR,
            GeneratedResult::DialogueTree(_) => DialogueTree::DESCRIPTOR,
            GeneratedResult::Glossary(_) => Glossary::DESCRIPTOR,
            GeneratedResult::MissionBrief(_) => MissionBrief::DESCRIPTOR,
            GeneratedResult::Faction(_) => FactionProfile::DESCRIPTOR,
            GeneratedResult::Cyberware(_) => CyberwareItem::DESCRIPTOR,
            GeneratedResult::NewsBulletin(_) => NewsBulletin::DESCRIPTOR,
            GeneratedResult::Outfit(_) => OutfitLook::DESCRIPTOR,
            GeneratedResult::TransformationSequence(_) => TransformationSequence::DESCRIPTOR,
        }
    }

    pub fn feature(&self) -> Feature {
        self.descriptor().feature
    }

    /// The inner record as a JSON value (without the feature tag).
    pub fn data(&self) -> serde_json::Value {
        let value = match self {
            GeneratedResult::CharacterProfile(r) => serde_json::to_value(r),
            GeneratedResult::LocationProfile(r) => serde_json::to_value(r),
            GeneratedResult::Scene(r) => serde_json::to_value(r),
            GeneratedResult::Storyboard(r) => serde_json::to_value(r),
            GeneratedResult::DialogueTree(r) => serde_json::to_value(r),
            GeneratedResult::Glossary(r) => serde_json::to_value(r),
            GeneratedResult::MissionBrief(r) => serde_json::to_value(r),
            GeneratedResult::Faction(r) => serde_json::to_value(r),
            GeneratedResult::Cyberware(r) => serde_json::to_value(r),
            GeneratedResult::NewsBulletin(r) => serde_json::to_value(r),
            GeneratedResult::Outfit(r) => serde_json::to_value(r),
            GeneratedResult::TransformationSequence(r) => serde_json::to_value(r),
        };
        value.unwrap_or_default()
    }
}
