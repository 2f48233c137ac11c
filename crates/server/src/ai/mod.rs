use shared::{AiChatRequest, AiChatResponse, ShapeKind};
use thiserror::Error;

use crate::AppState;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

const SYSTEM_PROMPT: &str = r##"
You are an AI assistant helping users create 3D designs. The user describes what they want and you generate the 3D objects for it.

Available shapes: {shapes}

Respond ONLY with a JSON object, no markdown, no backticks, no explanatory text:
{
  "objects": [
    {
      "type": "box|sphere|cylinder|...",
      "name": "descriptive-name",
      "position": {"x": 0, "y": 1, "z": 0},
      "rotation": {"x": 0, "y": 0, "z": 0},
      "scale": {"x": 1, "y": 1, "z": 1},
      "color": "#hexcolor",
      "opacity": 1
    }
  ],
  "message": "Brief description of what you created"
}

Rules:
- Position Y should typically be >= 0.5 (objects on the ground)
- Scale values are in meters (1 = 1 meter), rotations are in radians
- Use appropriate spacing between objects
- If the user asks to modify or delete existing objects, return an empty objects array and explain in message

Example, user: "Create a red house"
{"objects":[{"type":"box","name":"house-base","position":{"x":0,"y":1,"z":0},"rotation":{"x":0,"y":0,"z":0},"scale":{"x":2,"y":2,"z":2},"color":"#ff0000","opacity":1},{"type":"pyramid","name":"roof","position":{"x":0,"y":2.5,"z":0},"rotation":{"x":0,"y":0,"z":0},"scale":{"x":2.2,"y":1,"z":2.2},"color":"#8b4513","opacity":1}],"message":"Created a red house with a brown roof!"}
"##;

/// Failures talking to the text-generation service
#[derive(Debug, Error)]
pub enum AiError {
    #[error("ANTHROPIC_API_KEY not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("reply has no text content")]
    EmptyReply,

    #[error("reply is not a design payload: {0}")]
    Payload(String),
}

fn system_prompt() -> String {
    let shapes: Vec<&str> = ShapeKind::all().iter().map(|k| k.as_str()).collect();
    SYSTEM_PROMPT.replace("{shapes}", &shapes.join(", "))
}

pub async fn process_chat(
    state: &AppState,
    request: &AiChatRequest,
) -> Result<AiChatResponse, AiError> {
    let api_key = state.ai_api_key.as_ref().ok_or(AiError::MissingApiKey)?;

    let scene_context = serde_json::to_string_pretty(&request.scene)
        .map_err(|e| AiError::Payload(e.to_string()))?;

    let response = state
        .http
        .post(MESSAGES_URL)
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "model": state.model,
            "max_tokens": 2000,
            "system": system_prompt(),
            "messages": [
                {
                    "role": "user",
                    "content": format!(
                        "Current scene:\n{}\n\nUser request: {}",
                        scene_context, request.message
                    )
                }
            ]
        }))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body: serde_json::Value = response.json().await?;

    // Извлекаем текст из ответа Claude
    let content_text = body["content"]
        .as_array()
        .and_then(|arr| arr.iter().find_map(|block| block["text"].as_str()))
        .ok_or(AiError::EmptyReply)?;

    let reply = parse_reply(content_text)?;
    tracing::info!(
        "AI reply: {} objects, message {:?}",
        reply.objects.len(),
        reply.message
    );
    Ok(reply)
}

/// Parse the model's text into a design payload.
///
/// Tolerates markdown fences and prose around the JSON: the outermost
/// `{ ... }` is taken. Anything that still fails to parse is an error.
pub fn parse_reply(text: &str) -> Result<AiChatResponse, AiError> {
    let json = extract_json_object(text)
        .ok_or_else(|| AiError::Payload("no JSON object found".to_string()))?;
    let mut reply: AiChatResponse =
        serde_json::from_str(json).map_err(|e| AiError::Payload(e.to_string()))?;
    if reply.message.trim().is_empty() {
        reply.message = "Objects created!".to_string();
    }
    Ok(reply)
}

/// Strip code fences and return the outermost `{ ... }` span.
fn extract_json_object(text: &str) -> Option<&str> {
    let text = text.trim();
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
