//! Prompt composition: tone, persona and style draws, and the assembler that
//! turns them into GATE and GENERATE text.

pub mod assembler;
pub mod persona;
pub mod tone;

pub use assembler::{PromptAssembler, PromptPair, ResponseInputs, SharedContext};
pub use persona::{Persona, PersonaProfile, StyleModifier};
pub use tone::Tone;
