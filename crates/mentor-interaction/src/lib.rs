pub mod gemini_text_generator;

pub use gemini_text_generator::GeminiTextGenerator;
