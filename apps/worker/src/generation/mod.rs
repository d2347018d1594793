// Topic Generation Engine
// Implements: prompt assembly, the model call, candidate validation.
// All model calls go through llm_client — no direct Gemini requests here.

pub mod catalog;
pub mod generator;
pub mod prompts;
pub mod validation;
