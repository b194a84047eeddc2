//! Google Gemini `generateContent` backend.

use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{ClassifyError, EmailCategory, EmailClassifier};
use crate::sanitize::truncate_for_log;

/// Classifies emails by asking a Gemini model for exactly one label.
pub struct GeminiClassifier {
    api_key: SecretString,
    model: String,
    endpoint: String,
    client: Client,
}

impl GeminiClassifier {
    pub fn new(
        api_key: SecretString,
        model: &str,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, ClassifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifyError::ClientBuild(e.to_string()))?;

        Ok(Self {
            api_key,
            model: model.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// Builds the instruction sent along with the email.
pub fn build_prompt(email_text: &str) -> String {
    let labels: Vec<String> = EmailCategory::ALL
        .iter()
        .map(|c| format!("- {}", c.label()))
        .collect();

    format!(
        "You are an email classifier. Categorize the email into EXACTLY one of the following types:\n\n\
         {}\n\n\
         Return ONLY the category name. No explanation.\n\n\
         Email content:\n\"\"\"{}\"\"\"",
        labels.join("\n"),
        email_text
    )
}

impl EmailClassifier for GeminiClassifier {
    fn classify(&self, text: &str) -> Result<EmailCategory, ClassifyError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: build_prompt(text),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.0,
                max_output_tokens: 16,
            },
        };

        let response: GeminiResponse = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;

        category_from_response(response)
    }
}

fn category_from_response(response: GeminiResponse) -> Result<EmailCategory, ClassifyError> {
    let answer = response
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .ok_or(ClassifyError::EmptyResponse)?;

    EmailCategory::from_label(&answer)
        .ok_or_else(|| ClassifyError::UnrecognizedLabel(truncate_for_log(answer.trim(), 40)))
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_prompt_lists_every_label() {
        let prompt = build_prompt("Hello, I need a quote.");
        assert!(prompt.contains("- Client Inquiry"));
        assert!(prompt.contains("- Invoice Notification"));
        assert!(prompt.contains("Hello, I need a quote."));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GeminiRequest {
            contents: vec![],
            generation_config: GeminiGenerationConfig {
                temperature: 0.0,
                max_output_tokens: 16,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 16);
    }

    #[test]
    fn test_category_from_response() {
        let parsed = response(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Invoice Notification\n"}]}}]}"#,
        );
        assert_eq!(
            category_from_response(parsed).unwrap(),
            EmailCategory::InvoiceNotification
        );
    }

    #[test]
    fn test_category_from_empty_response() {
        let parsed = response(r#"{"candidates":[]}"#);
        assert!(matches!(
            category_from_response(parsed),
            Err(ClassifyError::EmptyResponse)
        ));
    }

    #[test]
    fn test_category_from_unrecognized_answer() {
        let parsed =
            response(r#"{"candidates":[{"content":{"parts":[{"text":"Spam"}]}}]}"#);
        assert!(matches!(
            category_from_response(parsed),
            Err(ClassifyError::UnrecognizedLabel(label)) if label == "Spam"
        ));
    }

    #[test]
    fn test_classify_against_unreachable_endpoint_errors() {
        let classifier = GeminiClassifier::new(
            SecretString::from("test-key".to_string()),
            "gemini-2.5-flash-lite",
            "http://127.0.0.1:9/v1beta/",
            Duration::from_secs(2),
        )
        .unwrap();

        assert_eq!(
            classifier.url(),
            "http://127.0.0.1:9/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
        assert!(classifier.classify("Hello").is_err());
    }
}
