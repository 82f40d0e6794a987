use anyhow::{Error, Result, bail};

use super::models::Transcript;
use crate::ai::tools::FunctionRegistry;
use crate::openai::{FunctionCall, Message, completion};

/// Called with each intermediate message of a turn (function call
/// requests and their results) as soon as it is produced.
pub type MessageObserver = Box<dyn Fn(&Message) + Send + Sync + 'static>;

/// A chat session with an LLM over an OpenAI compatible API using
/// function calling.
///
/// The session owns the transcript and the function registry. Each
/// call to `next_msg` runs a single turn: the model is called until it
/// answers with content, running any functions it asks for in
/// between.
///
/// Use `ChatBuilder` to construct a `Chat`.
pub struct Chat {
    api_hostname: String,
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
    functions: FunctionRegistry,
    transcript: Transcript,
    max_function_calls: Option<usize>,
    observer: Option<MessageObserver>,
}

impl Chat {
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn emit(&self, msg: &Message) {
        if let Some(observer) = &self.observer {
            observer(msg);
        }
    }

    async fn handle_function_call(&mut self, call: &FunctionCall) -> Result<Message, Error> {
        tracing::debug!(
            "\nFunction call: {}\nargs: {}",
            &call.name,
            &call.arguments
        );

        let result = self.functions.dispatch(&call.name, &call.arguments).await?;
        let msg = Message::new_function_call_response(&result, &call.name);
        self.transcript.push(msg.clone());

        Ok(msg)
    }

    /// Runs the next turn in chat. Appends `msg` to the transcript and
    /// requests completions until the model replies with content,
    /// which is appended and returned.
    ///
    /// Function call requests from the model are passed to the
    /// observer but are not added to the transcript, only the result
    /// of running the function is.
    pub async fn next_msg(&mut self, msg: Message) -> Result<Message, Error> {
        self.transcript.push(msg);

        let mut depth = 0;
        loop {
            let reply = completion(
                &self.client,
                self.transcript.as_slice(),
                self.functions.declarations(),
                &self.api_hostname,
                self.api_key.as_deref(),
                &self.model,
            )
            .await?
            .into_message()?;

            let Some(call) = reply.function_call.clone() else {
                self.transcript.push(reply.clone());
                return Ok(reply);
            };

            depth += 1;
            if self.max_function_calls.is_some_and(|max| depth > max) {
                bail!(
                    "Exceeded the limit of {} function calls in a single turn",
                    depth - 1
                );
            }

            self.emit(&reply);
            let result = self.handle_function_call(&call).await?;
            self.emit(&result);
        }
    }
}

pub struct ChatBuilder {
    api_hostname: String,
    api_key: Option<String>,
    model: String,
    client: Option<reqwest::Client>,
    functions: FunctionRegistry,
    transcript: Transcript,
    max_function_calls: Option<usize>,
    observer: Option<MessageObserver>,
}

impl ChatBuilder {
    pub fn new(api_hostname: &str, api_key: Option<&str>, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.map(String::from),
            model: model.to_string(),
            client: None,
            functions: FunctionRegistry::new(),
            transcript: Transcript::new(),
            max_function_calls: None,
            observer: None,
        }
    }

    pub fn build(self) -> Chat {
        Chat {
            api_hostname: self.api_hostname,
            api_key: self.api_key,
            model: self.model,
            client: self.client.unwrap_or_default(),
            functions: self.functions,
            transcript: self.transcript,
            max_function_calls: self.max_function_calls,
            observer: self.observer,
        }
    }

    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn transcript(mut self, messages: Vec<Message>) -> Self {
        self.transcript = Transcript::new_with_messages(messages);
        self
    }

    pub fn functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    /// `None` lets the model call functions for as long as it wants.
    pub fn max_function_calls(mut self, max: Option<usize>) -> Self {
        self.max_function_calls = max;
        self
    }

    pub fn observer(mut self, observer: MessageObserver) -> Self {
        self.observer = Some(observer);
        self
    }
}
