//! The prompt engine behind Chirp.
//!
//! For every incoming group message the engine:
//!
//! 1. **Recalls** memories one and two hops from the message's topics
//! 2. **Looks up** knowledge passages by embedding similarity
//! 3. **Draws** a persona and optional style quirks
//! 4. **Assembles** a GATE prompt (reply at all?) and a GENERATE prompt
//!
//! A separate initiative flow lets the agent bring up a topic of its own:
//! select a concept, check the timing, then generate.

pub mod compose;
pub mod engine;
pub mod initiative;
pub mod retrieval;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use compose::{
    Persona, PersonaProfile, PromptAssembler, PromptPair, ResponseInputs, SharedContext,
    StyleModifier, Tone,
};
pub use engine::{EngineSettings, PromptEngine, ResponsePrompts, StageTimings};
pub use initiative::{InitiativeCheck, InitiativeSelection, InitiativeSelector, InitiativeSettings};
pub use retrieval::{KnowledgeRetriever, MemoryRetriever, Recall, RecallBundle, RecallSettings};
