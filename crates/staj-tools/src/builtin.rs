//! Stub tools that only echo their input

use async_trait::async_trait;

use staj_core::{Result, ToolHandler, ToolSpec, string_argument};
use staj_rag::truncate_chars;

use crate::language::Language;

const ANALYZE_PREVIEW_CHARS: usize = 200;
const EMAIL_PREVIEW_CHARS: usize = 50;

/// `analyze_data`: reports the first characters of the data it was given
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyzeDataTool {
    language: Language,
}

impl AnalyzeDataTool {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

#[async_trait]
impl ToolHandler for AnalyzeDataTool {
    fn spec(&self) -> ToolSpec {
        let lang = self.language;
        ToolSpec::new(
            "analyze_data",
            lang.pick(
                "Veri analizi yapar ve içgörüler döndürür.",
                "Analyze given data and return insights.",
            ),
        )
        .with_parameter("data", lang.pick("Analiz edilecek veri", "Data to analyze"))
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<String> {
        let data = string_argument(arguments, "data")?;
        Ok(format!(
            "Analiz edilen veri: {}...",
            truncate_chars(data, ANALYZE_PREVIEW_CHARS)
        ))
    }
}

/// `send_email`: simulated, nothing is sent
#[derive(Debug, Default, Clone, Copy)]
pub struct SendEmailTool {
    language: Language,
}

impl SendEmailTool {
    pub fn new(language: Language) -> Self {
        Self { language }
    }
}

#[async_trait]
impl ToolHandler for SendEmailTool {
    fn spec(&self) -> ToolSpec {
        let lang = self.language;
        ToolSpec::new(
            "send_email",
            lang.pick("E-posta gönderir (simülasyon).", "Pretend to send an email."),
        )
        .with_parameter("recipient", lang.pick("Alıcının e-posta adresi", "Recipient email address"))
        .with_parameter("message", lang.pick("Gönderilecek mesaj", "Message to send"))
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<String> {
        let recipient = string_argument(arguments, "recipient")?;
        let message = string_argument(arguments, "message")?;
        Ok(format!(
            "✉ E-posta '{}' adresine gönderildi: {}...",
            recipient,
            truncate_chars(message, EMAIL_PREVIEW_CHARS)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_analyze_data_truncates_to_200_chars() {
        let data = "X".repeat(300);
        let output = AnalyzeDataTool::default().call(&json!({ "data": data })).await.unwrap();

        assert_eq!(output, format!("Analiz edilen veri: {}...", "X".repeat(200)));
    }

    #[tokio::test]
    async fn test_analyze_data_counts_characters() {
        let data = "ğ".repeat(250);
        let output = AnalyzeDataTool::default().call(&json!({ "data": data })).await.unwrap();

        assert_eq!(output.chars().filter(|c| *c == 'ğ').count(), 200);
    }

    #[tokio::test]
    async fn test_send_email() {
        let output = SendEmailTool::default()
            .call(&json!({"recipient": "ogrenci@gtu.edu.tr", "message": "Staj defterim ekte."}))
            .await
            .unwrap();

        assert_eq!(
            output,
            "✉ E-posta 'ogrenci@gtu.edu.tr' adresine gönderildi: Staj defterim ekte...."
        );
    }

    #[tokio::test]
    async fn test_send_email_truncates_message() {
        let message = "a".repeat(80);
        let output = SendEmailTool::default()
            .call(&json!({"recipient": "x@y.z", "message": message}))
            .await
            .unwrap();

        assert!(output.ends_with(&format!("{}...", "a".repeat(50))));
        assert!(!output.contains(&"a".repeat(51)));
    }

    #[tokio::test]
    async fn test_english_description_keeps_turkish_output() {
        let tool = AnalyzeDataTool::new(Language::English);

        assert_eq!(tool.spec().description, "Analyze given data and return insights.");
        let output = tool.call(&json!({ "data": "notlar" })).await.unwrap();
        assert_eq!(output, "Analiz edilen veri: notlar...");
    }
}
