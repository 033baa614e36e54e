use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for the local Ollama generation endpoint.
///
/// Deliberately built without a request timeout: generation time varies wildly
/// with model and prompt, and the pipeline has nothing useful to do but wait.
pub struct ScriptGenerator {
    client: Client,
    url: String,
    model: String,
}

impl ScriptGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            url: config.ollama_url.clone(),
            model: config.ollama_model.clone(),
        }
    }

    /// Draft a podcast script for one headline. Transport and HTTP errors
    /// propagate; the pipeline treats them as fatal.
    pub async fn generate_script(&self, headline: &str) -> Result<String> {
        let prompt = format!(
            "Write a 5-minute podcast script on: '{}'. Include intro, 3 points, closing.",
            headline
        );
        self.generate(&prompt).await
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the generation endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("Generation endpoint returned {}: {}", status, body);
        }

        let body = response
            .json::<GenerateResponse>()
            .await
            .context("Failed to parse generation response")?;

        Ok(body.response)
    }
}
