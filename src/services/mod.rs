pub mod extract;
pub mod insights;
pub mod llm;
pub mod prompt;
pub mod render;
