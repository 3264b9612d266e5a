//! Prompt compilation.
//!
//! Every function here is pure: the same feature and inputs always yield the
//! same prompt text, and no input is ever shortened. User values are placed
//! inside code fences longer than any backtick run they contain, so text that
//! looks like a delimiter stays inside its block.

use crate::chat::Transcript;
use crate::prompt::builder::PromptBuilder;
use crate::prompt::inputs::Inputs;
use crate::prompt::setting::{self, GUIDE_PERSONA, IMAGE_STYLE, SETTING_PREAMBLE};
use crate::schema::{Feature, FieldSpec, SchemaDescriptor, registry};

/// Compile the prompt for a structured or freeform feature.
pub fn compile(feature: Feature, inputs: &Inputs) -> String {
    PromptBuilder::new(SETTING_PREAMBLE)
        .section("Task", setting::task(feature))
        .section_opt("Inputs", inputs_section(feature, inputs))
        .section("Output", output_section(feature))
        .build()
}

/// Prompt for the art-prompt helper: transformation plus mood in, one
/// paragraph of image-prompt text out.
pub fn compile_art_prompt(inputs: &Inputs) -> String {
    compile(Feature::ArtPrompt, inputs)
}

/// Prompt for one guide turn. Includes every prior entry of `transcript`
/// followed by the new message.
pub fn compile_guide_turn(transcript: &Transcript, message: &str) -> String {
    PromptBuilder::new(SETTING_PREAMBLE)
        .section("Persona", GUIDE_PERSONA)
        .section_opt("Conversation so far", history_section(transcript))
        .section("New message", fenced(message))
        .section("Task", setting::task(Feature::GuideChat))
        .section("Output", "Reply in plain text, in character. No headings, no lists.")
        .build()
}

/// Prompt for the image endpoint: the user's prompt verbatim plus the
/// house style.
pub fn compile_image(inputs: &Inputs) -> String {
    let prompt = inputs.get("prompt").unwrap_or_default();
    format!("{prompt}\n\nStyle: {IMAGE_STYLE}")
}

// ── Sections ───────────────────────────────────────────────────────

/// One labelled block per supplied input, in declared order. `None` when
/// the feature takes no inputs or none were given.
fn inputs_section(feature: Feature, inputs: &Inputs) -> Option<String> {
    let blocks: Vec<String> = feature
        .inputs()
        .iter()
        .filter_map(|spec| {
            inputs
                .get(spec.name)
                .map(|value| format!("**{}**\n{}", spec.label, fenced(value)))
        })
        .collect();
    (!blocks.is_empty()).then(|| blocks.join("\n\n"))
}

fn history_section(transcript: &Transcript) -> Option<String> {
    if transcript.is_empty() {
        return None;
    }
    let turns: Vec<String> = transcript
        .entries()
        .iter()
        .map(|entry| format!("**{}**\n{}", entry.speaker.label(), fenced(&entry.text)))
        .collect();
    Some(turns.join("\n\n"))
}

fn output_section(feature: Feature) -> String {
    let rules = setting::extra_rules(feature);
    let Some(descriptor) = registry::descriptor(feature) else {
        return rules.join("\n");
    };

    let mut out = describe_descriptor(&descriptor);
    if descriptor.has_optional_fields() {
        out.push_str(
            "\n\nFields marked optional may be left out. When one does not apply, omit \
             the key entirely; never send null or an empty string in its place.",
        );
    }
    if !rules.is_empty() {
        out.push_str("\n\nRules:\n");
        out.push_str(
            &rules
                .iter()
                .map(|r| format!("- {r}"))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }
    out
}

fn describe_descriptor(descriptor: &SchemaDescriptor) -> String {
    let mut out = format!(
        "Respond with one JSON object, a {} ({}), matching the supplied schema. \
         No commentary and no code fences.\n\nFields, in this order:\n",
        descriptor.name, descriptor.description
    );
    describe_fields(&mut out, descriptor.fields, 0);
    out.truncate(out.trim_end().len());
    out
}

fn describe_fields(out: &mut String, fields: &[FieldSpec], depth: usize) {
    let indent = "  ".repeat(depth);
    for field in fields {
        let mut qualifiers = vec![field.kind.label().to_string()];
        if let Some(card) = field.kind.cardinality() {
            qualifiers.push(format!("{} items", card.describe()));
        }
        if !field.required {
            qualifiers.push("optional".to_string());
        }
        out.push_str(&format!(
            "{indent}- `{}` ({})",
            field.name,
            qualifiers.join(", ")
        ));
        if !field.description.is_empty() {
            out.push_str(": ");
            out.push_str(field.description);
        }
        out.push('\n');
        if let Some(nested) = field.kind.nested_fields() {
            describe_fields(out, nested, depth + 1);
        }
    }
}

/// Wrap `value` in a backtick fence longer than any run inside it.
pub fn fenced(value: &str) -> String {
    let longest = value
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat((longest + 1).max(3));
    format!("{fence}\n{value}\n{fence}")
}
