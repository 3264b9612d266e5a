//! Lookup from feature id to schema descriptor.

use crate::schema::{
    CharacterProfile, CyberwareItem, DialogueTree, FactionProfile, Feature, Glossary,
    LocationProfile, MissionBrief, NewsBulletin, OutfitLook, ResultType, SceneCard,
    SchemaDescriptor, Storyboard, TransformationSequence,
};

/// Descriptor for a structured feature, or `None` for freeform, image,
/// local, and batch features. Batch features resolve through
/// [`element_feature`].
pub fn descriptor(feature: Feature) -> Option<SchemaDescriptor> {
    let d = match feature {
        Feature::CharacterProfile => CharacterProfile::DESCRIPTOR,
        Feature::LocationProfile => LocationProfile::DESCRIPTOR,
        Feature::Scene => SceneCard::DESCRIPTOR,
        Feature::Storyboard => Storyboard::DESCRIPTOR,
        Feature::DialogueTree => DialogueTree::DESCRIPTOR,
        Feature::Glossary => Glossary::DESCRIPTOR,
        Feature::MissionBrief => MissionBrief::DESCRIPTOR,
        Feature::Faction => FactionProfile::DESCRIPTOR,
        Feature::Cyberware => CyberwareItem::DESCRIPTOR,
        Feature::NewsBulletin => NewsBulletin::DESCRIPTOR,
        Feature::Outfit => OutfitLook::DESCRIPTOR,
        Feature::TransformationSequence => TransformationSequence::DESCRIPTOR,
        Feature::ArtPrompt
        | Feature::GuideChat
        | Feature::Image
        | Feature::PromptMatrix
        | Feature::CharacterBatch
        | Feature::LocationBatch
        | Feature::SceneMatrix => return None,
    };
    Some(d)
}

/// The structured feature a batch feature produces once per subject.
pub fn element_feature(feature: Feature) -> Option<Feature> {
    match feature {
        Feature::CharacterBatch => Some(Feature::CharacterProfile),
        Feature::LocationBatch => Some(Feature::LocationProfile),
        Feature::SceneMatrix => Some(Feature::Scene),
        _ => None,
    }
}

/// All features that have a descriptor, in catalogue order.
pub fn structured_features() -> impl Iterator<Item = Feature> {
    Feature::ALL
        .into_iter()
        .filter(|f| descriptor(*f).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_schema_for;
    use crate::schema::{FieldSpec, Mode};

    /// Property names of an object schema, resolving a `$ref` into
    /// `definitions` when schemars emitted one.
    fn schemars_properties(root: &serde_json::Value, node: &serde_json::Value) -> Vec<String> {
        let node = match node.get("$ref").and_then(|r| r.as_str()) {
            Some(r) => {
                let name = r.rsplit('/').next().unwrap_or_default();
                &root["definitions"][name]
            }
            None => node,
        };
        node["properties"]
            .as_object()
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn assert_fields_match(
        root: &serde_json::Value,
        node: &serde_json::Value,
        fields: &[FieldSpec],
        path: &str,
    ) {
        let node = match node.get("$ref").and_then(|r| r.as_str()) {
            Some(r) => &root["definitions"][r.rsplit('/').next().unwrap_or_default()],
            None => node,
        };
        let expected: Vec<String> = fields.iter().map(|f| f.name.to_string()).collect();
        assert_eq!(
            schemars_properties(root, node),
            expected,
            "field order mismatch at {path}"
        );
        let required: Vec<&str> = node["required"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        for field in fields {
            assert_eq!(
                required.contains(&field.name),
                field.required,
                "required flag mismatch at {path}.{}",
                field.name
            );
            if let Some(nested) = field.kind.nested_fields() {
                let prop = &node["properties"][field.name];
                let inner = prop.get("items").unwrap_or(prop);
                assert_fields_match(root, inner, nested, &format!("{path}.{}", field.name));
            }
        }
    }

    fn check<T: ResultType>() {
        let root = json_schema_for::<T>();
        assert_fields_match(&root, &root, T::DESCRIPTOR.fields, T::DESCRIPTOR.name);
    }

    #[test]
    fn descriptors_agree_with_serde_structs() {
        check::<CharacterProfile>();
        check::<LocationProfile>();
        check::<SceneCard>();
        check::<Storyboard>();
        check::<DialogueTree>();
        check::<Glossary>();
        check::<MissionBrief>();
        check::<FactionProfile>();
        check::<CyberwareItem>();
        check::<NewsBulletin>();
        check::<OutfitLook>();
        check::<TransformationSequence>();
    }

    #[test]
    fn every_structured_feature_has_a_descriptor() {
        for feature in Feature::ALL {
            let has = descriptor(feature).is_some();
            assert_eq!(has, feature.mode() == Mode::Structured, "{feature}");
            if let Some(d) = descriptor(feature) {
                assert_eq!(d.feature, feature);
            }
        }
    }

    #[test]
    fn batch_features_resolve_to_structured_elements() {
        for feature in Feature::ALL {
            match element_feature(feature) {
                Some(element) => {
                    assert_eq!(feature.mode(), Mode::Batch);
                    assert!(descriptor(element).is_some());
                }
                None => assert_ne!(feature.mode(), Mode::Batch),
            }
        }
    }

    #[test]
    fn structured_features_listed_in_catalogue_order() {
        let ids: Vec<&str> = structured_features().map(Feature::id).collect();
        assert_eq!(ids.len(), 12);
        assert_eq!(ids[0], "character-profile");
        assert_eq!(ids[11], "transformation-sequence");
    }

    #[test]
    fn glossary_art_prompt_is_optional() {
        let d = descriptor(Feature::Glossary).unwrap();
        assert!(d.has_optional_fields());
        assert!(!descriptor(Feature::MissionBrief).unwrap().has_optional_fields());
    }
}
