//! Practice exam paper generation.

use mentor_core::error::{MentorError, Result};
use mentor_core::generation::TextGenerator;
use std::sync::Arc;

/// Builds the generation prompt for a practice paper.
pub fn build_prompt(exam_name: &str, subject: &str) -> Result<String> {
    if exam_name.trim().is_empty() || subject.trim().is_empty() {
        return Err(MentorError::validation("Exam name and subject are both required"));
    }
    Ok(format!(
        "Generate an exam paper for '{}' in the subject '{}'.",
        exam_name, subject
    ))
}

/// Generates practice papers. Independent of any chat history.
#[derive(Clone)]
pub struct ExamPaperService {
    generator: Arc<dyn TextGenerator>,
}

impl ExamPaperService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate_paper(&self, exam_name: &str, subject: &str) -> Result<String> {
        let prompt = build_prompt(exam_name, subject)?;
        tracing::info!("[ExamPaper] Generating '{}' paper for {}", exam_name, subject);
        self.generator.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("Q1. Define velocity.".to_string())
        }
    }

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            build_prompt("Midterm", "Physics").unwrap(),
            "Generate an exam paper for 'Midterm' in the subject 'Physics'."
        );
    }

    #[tokio::test]
    async fn test_generate_paper_sends_prompt() {
        let generator = Arc::new(RecordingGenerator::default());
        let service = ExamPaperService::new(generator.clone());

        let paper = service.generate_paper("Midterm", "Physics").await.unwrap();
        assert_eq!(paper, "Q1. Define velocity.");
        assert_eq!(
            *generator.prompts.lock().unwrap(),
            vec!["Generate an exam paper for 'Midterm' in the subject 'Physics'."]
        );
    }

    #[tokio::test]
    async fn test_missing_field_never_reaches_generator() {
        let generator = Arc::new(RecordingGenerator::default());
        let service = ExamPaperService::new(generator.clone());

        assert!(service.generate_paper("", "Physics").await.unwrap_err().is_validation());
        assert!(service.generate_paper("Midterm", "  ").await.unwrap_err().is_validation());
        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
