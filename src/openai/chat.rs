use anyhow::{Error, Result, anyhow, bail};
use futures_util::future::try_join_all;
use serde_json::Value;

use crate::openai::{BoxedToolCall, FunctionCall, FunctionCallFn, Message, Role, completion};

/// Upper bound on completion rounds that end in tool calls before the
/// turn is abandoned.
pub const MAX_TOOL_ROUNDS: usize = 5;

async fn handle_tool_call(
    tools: &[BoxedToolCall],
    tool_call: &Value,
) -> Result<Vec<Message>, Error> {
    let tool_call_id = tool_call["id"]
        .as_str()
        .ok_or(anyhow!("Tool call missing ID: {}", tool_call))?;
    let tool_call_function = &tool_call["function"];
    let tool_call_args = tool_call_function["arguments"]
        .as_str()
        .ok_or(anyhow!("Tool call missing arguments: {}", tool_call))?;
    let tool_call_name = tool_call_function["name"]
        .as_str()
        .ok_or(anyhow!("Tool call missing name: {}", tool_call))?;

    tracing::debug!("Tool call: {} args: {}", tool_call_name, tool_call_args);

    let tool_call_result = tools
        .iter()
        .find(|i| i.function_name() == tool_call_name)
        .ok_or(anyhow!(
            "Received tool call that doesn't exist: {}",
            tool_call_name
        ))?
        .call(tool_call_args)
        .await?;

    let tool_call_request = vec![FunctionCall {
        function: FunctionCallFn {
            arguments: tool_call_args.to_string(),
            name: tool_call_name.to_string(),
        },
        id: tool_call_id.to_string(),
        r#type: String::from("function"),
    }];

    Ok(vec![
        Message::new_tool_call_request(tool_call_request),
        Message::new_tool_call_response(&tool_call_result, tool_call_id),
    ])
}

async fn handle_tool_calls(
    tools: &[BoxedToolCall],
    tool_calls: &[Value],
) -> Result<Vec<Message>, Error> {
    // Tool calls run concurrently but the results are kept in the
    // order the model requested them
    let futures = tool_calls.iter().map(|call| handle_tool_call(tools, call));
    let results = try_join_all(futures).await?.into_iter().flatten().collect();
    Ok(results)
}

/// Runs the next turn in chat by passing a transcript to the LLM.
///
/// Returns every message generated during the turn: tool call
/// requests and their responses followed by the assistant's answer.
/// The answer is left out when the model responds without any text
/// content.
pub async fn chat(
    tools: &[BoxedToolCall],
    history: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Vec<Message>, Error> {
    let mut updated_history = history.to_vec();
    let mut messages = Vec::new();

    let mut resp = completion(history, tools, api_hostname, api_key, model).await?;
    let mut rounds = 0;

    while let Some(tool_calls) = resp["choices"][0]["message"]["tool_calls"].as_array() {
        if tool_calls.is_empty() {
            break;
        }
        if tools.is_empty() {
            bail!("Received tool call but no tools were specified");
        }
        rounds += 1;
        if rounds > MAX_TOOL_ROUNDS {
            bail!("Exceeded {} rounds of tool calls", MAX_TOOL_ROUNDS);
        }

        let tool_call_msgs = handle_tool_calls(tools, tool_calls).await?;
        for m in tool_call_msgs.into_iter() {
            messages.push(m.clone());
            updated_history.push(m);
        }

        // Provide the results of the tool calls back to the chat
        resp = completion(&updated_history, tools, api_hostname, api_key, model).await?;
    }

    if resp["choices"].as_array().is_none_or(|c| c.is_empty()) {
        bail!("No choices in completion response: {}", resp);
    }

    match resp["choices"][0]["message"]["content"].as_str() {
        Some(msg) if !msg.trim().is_empty() => {
            messages.push(Message::new(Role::Assistant, msg));
        }
        _ => {
            tracing::warn!("Completion finished without any content");
        }
    }

    Ok(messages)
}
