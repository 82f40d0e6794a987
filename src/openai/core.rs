use std::time::Duration;

use anyhow::{Error, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "function")]
    Function,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::Assistant => "assistant",
            Role::User => "user",
            Role::Function => "function",
        };
        write!(f, "{}", s)
    }
}

// Object {
//     "content": Null,
//     "role": String("assistant"),
//     "function_call": Object {
//         "arguments": String("{\"userId\":\"lisi\"}"),
//         "name": String("getWalletBalance")
//     }
// }
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: Some(content.to_string()),
            name: None,
            function_call: None,
        }
    }

    pub fn new_function_call_request(function_call: FunctionCall) -> Self {
        Message {
            role: Role::Assistant,
            content: None,
            name: None,
            function_call: Some(function_call),
        }
    }

    pub fn new_function_call_response(content: &str, name: &str) -> Self {
        Message {
            role: Role::Function,
            content: Some(content.to_string()),
            name: Some(name.to_string()),
            function_call: None,
        }
    }

    /// Formats the message the way it is shown in the terminal:
    /// `role: content`. Messages without any text, such as a function
    /// call request, fall back to the JSON form of the whole message.
    pub fn display_line(&self) -> String {
        let content = match self.content.as_deref() {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => serde_json::to_string(self).unwrap_or_default(),
        };
        format!("{}: {}", self.role, content)
    }
}

#[derive(Serialize)]
pub struct Property {
    pub r#type: String,
    pub description: String,
}

#[derive(Serialize)]
pub struct Parameters<Props: Serialize> {
    pub r#type: String,
    pub properties: Props,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

#[derive(Serialize)]
pub struct Function<Props: Serialize> {
    pub name: String,
    pub description: String,
    pub parameters: Parameters<Props>,
}

// `serde::Serialize` is not object safe so handlers are serialized
// through `erased_serde` in order to send a heterogeneous list of
// function declarations in the request payload.
#[async_trait]
pub trait FunctionHandler: erased_serde::Serialize {
    async fn call(&self, args: &str) -> Result<String, Error>;
    fn function_name(&self) -> String;
}
erased_serde::serialize_trait_object!(FunctionHandler);

pub type BoxedFunctionHandler = Box<dyn FunctionHandler + Send + Sync + 'static>;

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub index: usize,
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Takes the first choice's message, the only one that is
    /// requested.
    pub fn into_message(self) -> Result<Message, Error> {
        match self.choices.into_iter().next() {
            Some(choice) => Ok(choice.message),
            None => bail!("Completion response did not include any choices"),
        }
    }
}

/// Sends the transcript and the function declarations to an OpenAI
/// compatible chat completion endpoint. Any transport, status, or
/// decoding failure is returned as an error.
pub async fn completion<'a, I>(
    client: &reqwest::Client,
    messages: &[Message],
    functions: I,
    api_hostname: &str,
    api_key: Option<&str>,
    model: &str,
) -> Result<CompletionResponse, Error>
where
    I: IntoIterator<Item = &'a BoxedFunctionHandler>,
{
    let functions: Vec<&BoxedFunctionHandler> = functions.into_iter().collect();
    let mut payload = json!({
        "model": model,
        "messages": messages,
    });
    if !functions.is_empty() {
        payload["functions"] = json!(functions);
    }

    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    tracing::debug!("Sending {} messages to {}", messages.len(), url);

    let mut request = client
        .post(url)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 10))
        .json(&payload);
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request
        .send()
        .await?
        .error_for_status()?
        .json::<CompletionResponse>()
        .await?;

    Ok(response)
}
