//! Gemini REST wire format and its mapping to core types

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use staj_core::{
    ChatMessage, ChatRequest, ChatResponse, ContentBlock, Error, ReplyContent, Result,
    TokenUsage, ToolCall, ToolSpec,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclarations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolDeclarations {
    pub function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u64>,
    #[serde(default)]
    pub candidates_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

fn text_part(text: impl Into<String>) -> Part {
    Part {
        text: Some(text.into()),
        ..Default::default()
    }
}

/// Gemini schema for a tool whose parameters are all required strings
fn parameters_schema(spec: &ToolSpec) -> Option<Value> {
    if spec.parameters.is_empty() {
        return None;
    }

    let properties: serde_json::Map<String, Value> = spec
        .parameters
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                json!({ "type": "STRING", "description": p.description }),
            )
        })
        .collect();
    let required: Vec<&str> = spec.parameters.iter().map(|p| p.name.as_str()).collect();

    Some(json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    }))
}

fn assistant_parts(content: &ReplyContent, tool_calls: &[ToolCall]) -> Vec<Part> {
    let mut parts = Vec::new();

    match content {
        ReplyContent::PlainText(text) if !text.is_empty() => parts.push(text_part(text.clone())),
        ReplyContent::PlainText(_) => {}
        ReplyContent::StructuredBlocks(blocks) => {
            parts.extend(
                blocks
                    .iter()
                    .filter_map(|b| b.text.as_ref())
                    .map(|t| text_part(t.clone())),
            );
        }
    }

    for call in tool_calls {
        parts.push(Part {
            function_call: Some(FunctionCall {
                id: None,
                name: call.name.clone(),
                args: call.arguments.clone(),
            }),
            thought_signature: call.signature.clone(),
            ..Default::default()
        });
    }

    parts
}

/// Translate a core chat request into a `generateContent` body.
///
/// Consecutive tool results are grouped into one user turn so that every
/// function call of the previous model turn is answered together.
pub(crate) fn build_request(request: &ChatRequest<'_>) -> GenerateContentRequest {
    let mut contents: Vec<Content> = Vec::new();

    for message in request.messages {
        match message {
            ChatMessage::User { content } => contents.push(Content {
                role: Some("user".to_string()),
                parts: vec![text_part(content.clone())],
            }),
            ChatMessage::Assistant { content, tool_calls } => {
                let parts = assistant_parts(content, tool_calls);
                if !parts.is_empty() {
                    contents.push(Content {
                        role: Some("model".to_string()),
                        parts,
                    });
                }
            }
            ChatMessage::ToolResult { name, content, .. } => {
                let part = Part {
                    function_response: Some(FunctionResponse {
                        name: name.clone(),
                        response: json!({ "result": content }),
                    }),
                    ..Default::default()
                };

                match contents.last_mut() {
                    Some(last)
                        if last.role.as_deref() == Some("user")
                            && last.parts.iter().all(|p| p.function_response.is_some()) =>
                    {
                        last.parts.push(part)
                    }
                    _ => contents.push(Content {
                        role: Some("user".to_string()),
                        parts: vec![part],
                    }),
                }
            }
        }
    }

    let system_instruction = if request.system_prompt.is_empty() {
        None
    } else {
        Some(Content {
            role: None,
            parts: vec![text_part(request.system_prompt)],
        })
    };

    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![ToolDeclarations {
            function_declarations: request
                .tools
                .iter()
                .map(|spec| FunctionDeclaration {
                    name: spec.name.clone(),
                    description: spec.description.clone(),
                    parameters: parameters_schema(spec),
                })
                .collect(),
        }]
    };

    let config = request.config;
    let generation_config = if config.max_output_tokens.is_some()
        || config.temperature.is_some()
        || config.top_p.is_some()
    {
        Some(WireGenerationConfig {
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        })
    } else {
        None
    };

    GenerateContentRequest {
        system_instruction,
        contents,
        tools,
        generation_config,
    }
}

/// Map the first candidate of a response onto a core [`ChatResponse`]
pub(crate) fn into_chat_response(response: GenerateContentResponse) -> Result<ChatResponse> {
    let usage = response.usage_metadata.map(|u| TokenUsage {
        input_tokens: u.prompt_token_count.unwrap_or(0),
        output_tokens: u.candidates_token_count.unwrap_or(0),
    });

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(Error::LlmProvider(format!("Gemini returned no answer: {}", reason)));
    };

    let finish_reason = candidate.finish_reason;
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    let mut texts = Vec::new();
    let mut tool_calls = Vec::new();

    for part in parts {
        if part.thought == Some(true) {
            continue;
        }
        if let Some(call) = part.function_call {
            let id = call
                .id
                .unwrap_or_else(|| format!("call_{}", tool_calls.len()));
            let arguments = if call.args.is_null() { json!({}) } else { call.args };
            tool_calls.push(ToolCall {
                id,
                name: call.name,
                arguments,
                signature: part.thought_signature,
            });
        } else if let Some(text) = part.text {
            texts.push(text);
        }
    }

    if texts.is_empty() && tool_calls.is_empty() {
        return Err(Error::LlmProvider(format!(
            "Empty response from Gemini (finish reason: {})",
            finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    let content = match texts.len() {
        0 => ReplyContent::PlainText(String::new()),
        1 => ReplyContent::PlainText(texts.remove(0)),
        _ => ReplyContent::StructuredBlocks(texts.into_iter().map(ContentBlock::text).collect()),
    };

    Ok(ChatResponse {
        content,
        tool_calls,
        finish_reason,
        usage,
    })
}
