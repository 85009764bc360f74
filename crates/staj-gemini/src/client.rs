//! Gemini chat and embedding clients

use async_trait::async_trait;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use serde::Deserialize;
use serde_json::json;
use tokio::time::timeout;
use tracing::debug;
use url::Url;

use staj_core::{ChatModel, ChatRequest, ChatResponse, Embedder, Error, Result};

use crate::config::GeminiConfig;
use crate::wire::{GenerateContentResponse, build_request, into_chat_response};

/// Build the shared HTTP client with the configured timeout
fn http_client(config: &GeminiConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| Error::Network(e.to_string()))
}

/// `{api_url}/v1beta/models/{model}:{method}`
fn model_endpoint(api_url: &str, model: &str, method: &str) -> Result<Url> {
    let raw = format!(
        "{}/v1beta/models/{}:{}",
        api_url.trim_end_matches('/'),
        model,
        method
    );
    Url::parse(&raw).map_err(|e| Error::Configuration(format!("Invalid Gemini URL '{}': {}", raw, e)))
}

/// POST a JSON body to a Gemini endpoint and decode the JSON answer
async fn post_json<B, R>(client: &Client, url: Url, api_key: &str, body: &B) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(e.to_string())
            } else {
                Error::Network(e.to_string())
            }
        })?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Authentication(format!(
            "Gemini rejected the API key: {}",
            status
        )));
    }

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(Error::LlmProvider(format!(
            "Gemini API request failed with status {}: {}",
            status, error_text
        )));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| Error::Serialization(e.to_string()))
}

/// Gemini chat client
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
    current_model: String,
}

impl GeminiClient {
    /// Model constants
    pub const GEMINI_2_5_PRO: &'static str = "gemini-2.5-pro";
    pub const GEMINI_2_5_FLASH: &'static str = "gemini-2.5-flash";

    /// Create a new Gemini client from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = http_client(&config)?;
        let current_model = config.model.clone();

        Ok(Self {
            config,
            client,
            current_model,
        })
    }

    /// Create a new Gemini client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.current_model = model_id.into();
        self
    }

    async fn perform_completion(&self, request: &ChatRequest<'_>) -> Result<ChatResponse> {
        let url = model_endpoint(&self.config.api_url, &self.current_model, "generateContent")?;
        let body = build_request(request);

        debug!(
            model = %self.current_model,
            messages = body.contents.len(),
            "Sending generateContent request"
        );

        let response: GenerateContentResponse =
            post_json(&self.client, url, &self.config.api_key, &body).await?;
        into_chat_response(response)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<ChatResponse> {
        match timeout(request.config.timeout, self.perform_completion(request)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout("Request timed out".to_string())),
        }
    }

    fn model_id(&self) -> &str {
        &self.current_model
    }
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Gemini embedding client (`batchEmbedContents`)
pub struct GeminiEmbedder {
    config: GeminiConfig,
    client: Client,
}

impl GeminiEmbedder {
    /// Requests per `batchEmbedContents` call accepted by the API
    const MAX_BATCH: usize = 100;

    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    async fn embed_batch(&self, texts: &[String], task_type: &str) -> Result<Vec<Vec<f32>>> {
        let url = model_endpoint(&self.config.api_url, &self.config.embedding_model, "batchEmbedContents")?;
        let model_name = format!("models/{}", self.config.embedding_model);

        let requests: Vec<serde_json::Value> = texts
            .iter()
            .map(|text| {
                json!({
                    "model": model_name,
                    "content": { "parts": [{ "text": text }] },
                    "taskType": task_type,
                })
            })
            .collect();

        let response: BatchEmbedResponse = post_json(
            &self.client,
            url,
            &self.config.api_key,
            &json!({ "requests": requests }),
        )
        .await?;

        if response.embeddings.len() != texts.len() {
            return Err(Error::Embedding(format!(
                "Gemini returned {} embeddings for {} texts",
                response.embeddings.len(),
                texts.len()
            )));
        }

        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    fn id(&self) -> String {
        format!("gemini:{}", self.config.embedding_model)
    }

    fn dimension(&self) -> usize {
        match self.config.embedding_model.as_str() {
            "gemini-embedding-001" => 3072,
            _ => 768,
        }
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(Self::MAX_BATCH) {
            vectors.extend(self.embed_batch(batch, "RETRIEVAL_DOCUMENT").await?);
        }
        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self
            .embed_batch(&[text.to_string()], "RETRIEVAL_QUERY")
            .await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("Gemini returned no query embedding".to_string()))
    }
}
