//! Sectioned prompt text.
//!
//! A prompt is the setting preamble followed by `## Heading` blocks, one
//! blank line between each. Blocks with nothing in them never reach the
//! output, so an absent input or an empty conversation leaves no stray
//! heading behind.
//!
//! ```
//! use noir_studio::prompt::PromptBuilder;
//!
//! let prompt = PromptBuilder::new("You write for Neo-Tokyo Noir.")
//!     .section("Task", "Describe a rooftop.")
//!     .section_opt("Inputs", None::<String>)
//!     .build();
//!
//! assert_eq!(prompt, "You write for Neo-Tokyo Noir.\n\n## Task\n\nDescribe a rooftop.");
//! ```

pub struct PromptBuilder {
    blocks: Vec<String>,
}

impl PromptBuilder {
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            blocks: vec![preamble.into()],
        }
    }

    /// Add a `## heading` block. Blank `body` adds nothing.
    pub fn section(mut self, heading: &str, body: impl Into<String>) -> Self {
        let body = body.into();
        if !body.trim().is_empty() {
            self.blocks.push(format!("## {heading}\n\n{body}"));
        }
        self
    }

    /// [`section`](Self::section) for a body that may be absent.
    pub fn section_opt(self, heading: &str, body: Option<impl Into<String>>) -> Self {
        match body {
            Some(body) => self.section(heading, body),
            None => self,
        }
    }

    pub fn build(self) -> String {
        self.blocks.join("\n\n")
    }
}
