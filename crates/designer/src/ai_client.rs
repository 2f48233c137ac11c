//! Client side of the assistant chat: one request, one complete batch.

use shared::{AiChatRequest, AiChatResponse};

use crate::error::{DesignError, DesignResult};

/// Post the instruction and scene summary to `<server_url>/api/chat`.
pub async fn request_chat(
    client: &reqwest::Client,
    server_url: &str,
    request: &AiChatRequest,
) -> DesignResult<AiChatResponse> {
    let url = format!("{}/api/chat", server_url.trim_end_matches('/'));
    tracing::info!("Assistant request to {} ({} objects in scene)", url, request.scene.len());

    let response = client.post(&url).json(request).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v["error"].as_str().map(str::to_string))
            .unwrap_or(body);
        return Err(DesignError::ExternalService(format!("{status}: {detail}")));
    }

    let reply: AiChatResponse = response
        .json()
        .await
        .map_err(|e| DesignError::ExternalService(format!("unreadable reply: {e}")))?;
    tracing::info!("Assistant returned {} objects", reply.objects.len());
    Ok(reply)
}
