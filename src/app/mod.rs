// App layer: prompt templates, agents, translation and the assistant facade.

pub mod agents;
pub mod assistant;
pub mod prompts;
pub mod translation;

pub use assistant::PlantCareAssistant;
pub use translation::{GeminiTranslator, TranslationService};
