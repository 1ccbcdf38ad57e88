use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The collaborator returned nothing; an empty template is itself an error
    #[error("template writer returned empty output")]
    Empty,

    #[error("template writer failed: {0}")]
    Api(String),
}

/// Generative template strategy: hands the five raw answers plus a fixed
/// instruction skeleton to an external text-generation collaborator and
/// trusts its output directly.
pub struct TemplateWriter {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl TemplateWriter {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self { client, api_key }
    }

    /// Generate the template document. Empty output or any provider failure
    /// is a synthesis failure; there is no fall-through to another strategy.
    pub async fn generate(&self, answers: &[String; 5]) -> Result<String, SynthesisError> {
        info!("Requesting generated template from writer");

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {
                        "role": "system",
                        "content": "You are a prompt engineer specializing in creating clear, effective prompts for AI assistants. You follow templates exactly and extract key information from user responses.",
                    },
                    {
                        "role": "user",
                        "content": Self::build_prompt(answers),
                    },
                ],
                "temperature": 0.7,
                "max_tokens": 1000,
            }))
            .send()
            .await
            .map_err(|e| SynthesisError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SynthesisError::Api(format!(
                "writer returned status {}",
                response.status()
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::Api(e.to_string()))?;

        let generated = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if generated.trim().is_empty() {
            return Err(SynthesisError::Empty);
        }

        Ok(generated.trim().to_string())
    }

    /// The fixed instruction skeleton; the writer must reproduce its exact
    /// section structure.
    fn build_prompt(answers: &[String; 5]) -> String {
        format!(
            r#"You are a helpful assistant that creates custom prompts for AI assistants.

Based on the following interview responses, generate a prompt that follows this EXACT structure:

Background
You are an expert in [extract from responses].
Your role is to [extract from responses].
You are talking to [extract target audience from responses].
Success looks like [extract from success answer].

Your Workflow
First, [extract first step from user journey].
After they respond, then [extract second step].
Next, [extract third step].
[Continue for all workflow steps mentioned in the user journey]

Guidelines & Guardrails
Avoid language that might seem judgmental or dismissive.
Be inclusive in your examples and explanations, consider multiple perspectives, and avoid stereotypes.
Provide clear and concise responses.
If off-topic, prompt users to return to the main subject.
[Add any custom boundaries mentioned in Q5]

Interview Responses:
Q1 (App vision, problem, audience): {q1}
Q2 (User journey): {q2}
Q3 (Tone/personality): {q3}
Q4 (Success outcome): {q4}
Q5 (Boundaries): {q5}

IMPORTANT:
- Use the EXACT structure shown above
- Extract information naturally from the responses
- For the Workflow section, describe each step in a clear, actionable way
- Include "First," "After they respond, then," and "Next," for the workflow steps
- Maintain a {tone} tone throughout
- Include any specific boundaries or requirements from Q5 at the end of Guidelines & Guardrails
- Output ONLY the template, no additional explanation"#,
            q1 = answers[0],
            q2 = answers[1],
            q3 = answers[2],
            q4 = answers[3],
            q5 = answers[4],
            tone = answers[2].to_lowercase(),
        )
    }
}
