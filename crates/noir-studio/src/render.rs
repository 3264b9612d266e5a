//! Display panels for generated results.
//!
//! Rendering is driven entirely by the result's [`SchemaDescriptor`]: fields
//! are laid out in declared order, each as one [`Panel`]. Optional fields
//! that are absent produce no panel at all. Prompt fields (anything named
//! `art_prompt` or `visual_prompt`) become copyable prompt blocks.

use serde::Serialize;
use serde_json::Value;

use crate::schema::{FieldKind, FieldSpec, GeneratedResult};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Panel {
    pub field: &'static str,
    pub title: String,
    pub body: PanelBody,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelBody {
    Text { text: String },
    List { items: Vec<String> },
    Cards { cards: Vec<Card> },
    /// Image-generation prompt, shown with a copy control.
    Prompt { text: String },
}

/// One nested record, rendered as its own panels.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Card {
    pub panels: Vec<Panel>,
}

/// Lay out `result` as panels in declared field order.
pub fn panels(result: &GeneratedResult) -> Vec<Panel> {
    panels_for(result.descriptor().fields, &result.data())
}

/// The result's display heading: the value of its first field.
pub fn headline(result: &GeneratedResult) -> String {
    let data = result.data();
    result
        .descriptor()
        .fields
        .first()
        .and_then(|f| data.get(f.name))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn panels_for(fields: &'static [FieldSpec], data: &Value) -> Vec<Panel> {
    fields
        .iter()
        .filter_map(|field| {
            let value = data.get(field.name).filter(|v| !v.is_null())?;
            Some(Panel {
                field: field.name,
                title: field_title(field.name),
                body: body_for(field, value),
            })
        })
        .collect()
}

fn body_for(field: &FieldSpec, value: &Value) -> PanelBody {
    match field.kind {
        FieldKind::String if is_prompt_field(field.name) => PanelBody::Prompt {
            text: scalar_text(field.name, value),
        },
        FieldKind::String | FieldKind::Integer => PanelBody::Text {
            text: scalar_text(field.name, value),
        },
        FieldKind::StringList { .. } => PanelBody::List {
            items: value
                .as_array()
                .map(|items| items.iter().map(|v| scalar_text(field.name, v)).collect())
                .unwrap_or_default(),
        },
        FieldKind::RecordList { fields, .. } => PanelBody::Cards {
            cards: value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .map(|item| Card {
                            panels: panels_for(fields, item),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        },
        FieldKind::Record { fields } => PanelBody::Cards {
            cards: vec![Card {
                panels: panels_for(fields, value),
            }],
        },
    }
}

/// Whether a field holds an image-generation prompt.
pub fn is_prompt_field(name: &str) -> bool {
    name == "art_prompt" || name == "visual_prompt"
}

/// `signature_quote` -> `Signature Quote`; a trailing `_yen` is dropped.
pub fn field_title(name: &str) -> String {
    name.trim_end_matches("_yen")
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Display text of a scalar. Integers in `*_yen` fields are grouped and
/// prefixed with the yen sign.
pub fn scalar_text(field: &str, value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if field.ends_with("_yen") => n
            .as_i64()
            .map_or_else(|| n.to_string(), |v| format!("¥{}", group_thousands(v))),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn group_thousands(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if v < 0 { format!("-{out}") } else { out }
}

// ── Terminal text ──────────────────────────────────────────────────

/// Plain-text rendering for the terminal.
pub fn to_text(result: &GeneratedResult) -> String {
    let mut out = format!("== {} ==\n", result.feature().title());
    write_panels(&mut out, &panels(result), 0);
    out
}

fn write_panels(out: &mut String, panels: &[Panel], depth: usize) {
    let indent = "  ".repeat(depth);
    for panel in panels {
        match &panel.body {
            PanelBody::Text { text } => {
                out.push_str(&format!("{indent}{}: {}\n", panel.title, indent_lines(text, &indent)));
            }
            PanelBody::Prompt { text } => {
                out.push_str(&format!("{indent}{} [prompt]: {text}\n", panel.title));
            }
            PanelBody::List { items } => {
                out.push_str(&format!("{indent}{}:\n", panel.title));
                for item in items {
                    out.push_str(&format!("{indent}  - {item}\n"));
                }
            }
            PanelBody::Cards { cards } => {
                out.push_str(&format!("{indent}{}:\n", panel.title));
                for (i, card) in cards.iter().enumerate() {
                    out.push_str(&format!("{indent}  #{}\n", i + 1));
                    write_panels(out, &card.panels, depth + 2);
                }
            }
        }
    }
}

fn indent_lines(text: &str, indent: &str) -> String {
    text.replace('\n', &format!("\n{indent}  "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ResultType;
    use crate::test_support;

    #[test]
    fn panels_follow_declared_order() {
        let result = test_support::character().into_result();
        let fields: Vec<&str> = panels(&result).iter().map(|p| p.field).collect();
        assert_eq!(fields, result.descriptor().field_names());
    }

    #[test]
    fn every_fixture_renders_all_present_fields() {
        for result in test_support::all_results() {
            let rendered = panels(&result);
            assert!(!rendered.is_empty(), "{}", result.feature());
            assert_eq!(rendered[0].field, result.descriptor().fields[0].name);
        }
    }

    #[test]
    fn absent_optional_field_has_no_panel() {
        let result = test_support::storyboard().into_result();
        let rendered = panels(&result);
        let PanelBody::Cards { cards } = &rendered[2].body else {
            panic!("panels should render as cards");
        };
        let first: Vec<&str> = cards[0].panels.iter().map(|p| p.field).collect();
        let second: Vec<&str> = cards[1].panels.iter().map(|p| p.field).collect();
        assert!(!first.contains(&"dialogue"));
        assert!(second.contains(&"dialogue"));
    }

    #[test]
    fn prompt_fields_are_copyable() {
        let result = test_support::scene().into_result();
        let last = panels(&result).pop().unwrap();
        assert_eq!(last.field, "visual_prompt");
        assert!(matches!(last.body, PanelBody::Prompt { .. }));
    }

    #[test]
    fn yen_fields_are_formatted() {
        let result = test_support::mission().into_result();
        let payout = panels(&result)
            .into_iter()
            .find(|p| p.field == "payout_yen")
            .unwrap();
        assert_eq!(payout.title, "Payout");
        assert_eq!(
            payout.body,
            PanelBody::Text {
                text: "¥2,500,000".into()
            }
        );
    }

    #[test]
    fn field_titles() {
        assert_eq!(field_title("signature_quote"), "Signature Quote");
        assert_eq!(field_title("street_price_yen"), "Street Price");
        assert_eq!(field_title("name"), "Name");
    }

    #[test]
    fn group_thousands_handles_small_and_negative() {
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn headline_is_first_field() {
        assert_eq!(
            headline(&test_support::news().into_result()),
            "Blackout Hits Ginza Spire"
        );
    }

    #[test]
    fn terminal_text_contains_every_value() {
        let result = test_support::dialogue().into_result();
        let text = to_text(&result);
        assert!(text.starts_with("== Dialogue Tree =="));
        for leaf in test_support::leaf_values(&result.data()) {
            assert!(text.contains(&leaf), "missing {leaf}");
        }
    }
}
