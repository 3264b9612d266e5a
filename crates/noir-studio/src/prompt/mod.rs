//! Prompt construction: the section builder, the per-feature compilers, and
//! the shared setting text.

pub mod builder;
pub mod compiler;
pub mod inputs;
pub mod setting;

pub use builder::PromptBuilder;
pub use compiler::{compile, compile_art_prompt, compile_guide_turn, compile_image, fenced};
pub use inputs::Inputs;
