//! Tool-calling agent that answers one user turn

use async_trait::async_trait;
use tracing::{debug, warn};

use staj_core::{
    ChatMessage, ChatModel, ChatRequest, Error, GenerationConfig, ReplyContent, Result, ToolSpec,
};
use staj_tools::ToolRegistry;

/// Messages produced by one invocation, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentRun {
    pub messages: Vec<ChatMessage>,
}

impl AgentRun {
    /// Content of the last assistant message
    pub fn final_reply(&self) -> Option<&ReplyContent> {
        self.messages.iter().rev().find_map(|message| match message {
            ChatMessage::Assistant { content, .. } => Some(content),
            _ => None,
        })
    }

    /// Text shown to the user; empty when the model never answered
    pub fn reply_text(&self) -> String {
        self.final_reply()
            .map(ReplyContent::extract_text)
            .unwrap_or_default()
    }

    pub fn tool_calls(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, ChatMessage::ToolResult { .. }))
            .count()
    }
}

/// Something that turns the messages of a turn into a reply
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn invoke(&self, messages: Vec<ChatMessage>) -> Result<AgentRun>;
}

/// Alternates model calls and tool dispatch until the model answers
/// without requesting a tool.
pub struct ToolCallingAgent<M: ChatModel> {
    model: M,
    tools: ToolRegistry,
    tool_specs: Vec<ToolSpec>,
    system_prompt: String,
    config: GenerationConfig,
    max_iterations: usize,
}

impl<M: ChatModel> ToolCallingAgent<M> {
    pub const DEFAULT_MAX_ITERATIONS: usize = 8;

    pub fn new(model: M, tools: ToolRegistry, system_prompt: impl Into<String>) -> Self {
        let tool_specs = tools.specs();
        Self {
            model,
            tools,
            tool_specs,
            system_prompt: system_prompt.into(),
            config: GenerationConfig::default(),
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}

#[async_trait]
impl<M: ChatModel> Assistant for ToolCallingAgent<M> {
    async fn invoke(&self, mut messages: Vec<ChatMessage>) -> Result<AgentRun> {
        let seeded = messages.len();

        for iteration in 0..self.max_iterations {
            let request = ChatRequest {
                system_prompt: &self.system_prompt,
                messages: &messages,
                tools: &self.tool_specs,
                config: &self.config,
            };
            let response = self.model.complete(&request).await?;

            debug!(
                iteration,
                tool_calls = response.tool_calls.len(),
                finish_reason = ?response.finish_reason,
                "Model responded"
            );

            let tool_calls = response.tool_calls.clone();
            messages.push(ChatMessage::Assistant {
                content: response.content,
                tool_calls: response.tool_calls,
            });

            if tool_calls.is_empty() {
                return Ok(AgentRun {
                    messages: messages.split_off(seeded),
                });
            }

            for call in tool_calls {
                let content = match self.tools.invoke(&call.name, &call.arguments).await {
                    Ok(output) => output,
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "Tool call failed");
                        format!("Error: {}", e)
                    }
                };

                messages.push(ChatMessage::ToolResult {
                    call_id: call.id,
                    name: call.name,
                    content,
                });
            }
        }

        Err(Error::Agent(format!(
            "No final answer after {} model calls",
            self.max_iterations
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use staj_core::{ChatResponse, SearchHit, SearchProvider, ToolCall};
    use std::sync::{Arc, Mutex};

    /// Replays canned responses and records how many messages each request carried
    struct ScriptedModel {
        responses: Mutex<Vec<ChatResponse>>,
        seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    }

    impl ScriptedModel {
        fn new(mut responses: Vec<ChatResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, request: &ChatRequest<'_>) -> Result<ChatResponse> {
            self.seen.lock().unwrap().push(request.messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| Error::LlmProvider("script exhausted".to_string()))
        }

        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    struct StaticSearch;

    #[async_trait]
    impl SearchProvider for StaticSearch {
        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
            Ok(vec![SearchHit {
                title: "GTÜ".to_string(),
                url: "https://www.gtu.edu.tr".to_string(),
                snippet: "Staj başvuruları mayısta başlar.".to_string(),
            }])
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    fn tool_call(name: &str, arguments: serde_json::Value) -> ChatResponse {
        ChatResponse {
            content: ReplyContent::default(),
            tool_calls: vec![ToolCall {
                id: "call_0".to_string(),
                name: name.to_string(),
                arguments,
                signature: None,
            }],
            finish_reason: Some("STOP".to_string()),
            usage: None,
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::basic_tools(Arc::new(StaticSearch))
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let agent = ToolCallingAgent::new(
            ScriptedModel::new(vec![ChatResponse::text("Merhaba!")]),
            registry(),
            "system",
        );

        let run = agent.invoke(vec![ChatMessage::user("selam")]).await.unwrap();

        assert_eq!(run.reply_text(), "Merhaba!");
        assert_eq!(run.messages.len(), 1);
        assert_eq!(run.tool_calls(), 0);
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let model = ScriptedModel::new(vec![
            tool_call("web_search", json!({"query": "staj başvuru"})),
            ChatResponse::text("Başvurular mayısta başlar."),
        ]);
        let seen = model.seen.clone();
        let agent = ToolCallingAgent::new(model, registry(), "system");

        let run = agent.invoke(vec![ChatMessage::user("başvuru ne zaman?")]).await.unwrap();

        assert_eq!(run.reply_text(), "Başvurular mayısta başlar.");
        assert_eq!(run.tool_calls(), 1);
        assert_eq!(
            run.messages[1],
            ChatMessage::ToolResult {
                call_id: "call_0".to_string(),
                name: "web_search".to_string(),
                content: "Staj başvuruları mayısta başlar.".to_string(),
            }
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].len(), 1);
        assert_eq!(seen[1].len(), 3);
    }

    #[tokio::test]
    async fn test_tool_error_is_fed_back() {
        let model = ScriptedModel::new(vec![
            tool_call("delete_everything", json!({})),
            ChatResponse::text("Bunu yapamam."),
        ]);
        let agent = ToolCallingAgent::new(model, registry(), "system");

        let run = agent.invoke(vec![ChatMessage::user("sil")]).await.unwrap();

        match &run.messages[1] {
            ChatMessage::ToolResult { content, .. } => {
                assert_eq!(content, "Error: Unknown tool: delete_everything")
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert_eq!(run.reply_text(), "Bunu yapamam.");
    }

    #[tokio::test]
    async fn test_iteration_budget() {
        let script = (0..3)
            .map(|_| tool_call("analyze_data", json!({"data": "x"})))
            .collect();
        let agent = ToolCallingAgent::new(ScriptedModel::new(script), registry(), "system")
            .with_max_iterations(3);

        let err = agent.invoke(vec![ChatMessage::user("döngü")]).await.unwrap_err();
        assert!(matches!(err, Error::Agent(_)));
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let agent = ToolCallingAgent::new(ScriptedModel::new(Vec::new()), registry(), "system");
        let err = agent.invoke(vec![ChatMessage::user("selam")]).await.unwrap_err();
        assert_eq!(err.to_string(), "LLM provider error: script exhausted");
    }

    #[test]
    fn test_final_reply_uses_last_assistant_message() {
        let run = AgentRun {
            messages: vec![
                ChatMessage::assistant(ReplyContent::PlainText("ilk".to_string())),
                ChatMessage::ToolResult {
                    call_id: "call_0".to_string(),
                    name: "web_search".to_string(),
                    content: "sonuç".to_string(),
                },
                ChatMessage::assistant(ReplyContent::PlainText("son".to_string())),
            ],
        };
        assert_eq!(run.reply_text(), "son");
        assert_eq!(AgentRun::default().reply_text(), "");
    }
}
