//! Lookup table from function name to the local handler that runs it.
use std::collections::BTreeMap;

use anyhow::{Error, Result};

use super::{BotInfoTool, WalletBalanceTool};
use crate::openai::BoxedFunctionHandler;

#[derive(Default)]
pub struct FunctionRegistry(BTreeMap<String, BoxedFunctionHandler>);

impl FunctionRegistry {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// The functions offered to the model in every request.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(Box::new(BotInfoTool::new()))
            .with(Box::new(WalletBalanceTool::default()))
    }

    pub fn with(mut self, handler: BoxedFunctionHandler) -> Self {
        self.0.insert(handler.function_name(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&BoxedFunctionHandler> {
        self.0.get(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &BoxedFunctionHandler> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Runs the handler registered under `name`. An unknown name
    /// results in an empty string rather than an error.
    pub async fn dispatch(&self, name: &str, args: &str) -> Result<String, Error> {
        match self.get(name) {
            Some(handler) => handler.call(args).await,
            None => {
                tracing::warn!("Received call to unknown function: {}", name);
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_registers_default_functions() {
        let registry = FunctionRegistry::with_defaults();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["getBotInfo", "getWalletBalance"]);
        assert!(registry.get("getBotInfo").is_some());
        assert!(registry.get("getWalletBalance").is_some());
    }

    #[test]
    fn it_starts_empty() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.declarations().count(), 0);
    }

    #[tokio::test]
    async fn it_dispatches_by_name() {
        let registry = FunctionRegistry::with_defaults();
        let result = registry
            .dispatch("getWalletBalance", r#"{"userId":"zhangsan"}"#)
            .await
            .unwrap();
        assert_eq!(result, r#"{"balance":20000,"user":"张三"}"#);
    }

    #[tokio::test]
    async fn it_returns_empty_result_for_unknown_function() {
        let registry = FunctionRegistry::with_defaults();
        let result = registry.dispatch("transferMoney", "{}").await.unwrap();
        assert_eq!(result, "");
    }

    #[test]
    fn it_serializes_declarations_in_name_order() {
        let registry = FunctionRegistry::with_defaults();
        let decls: Vec<&BoxedFunctionHandler> = registry.declarations().collect();
        let json = serde_json::to_value(&decls).unwrap();
        assert_eq!(json[0]["name"], "getBotInfo");
        assert_eq!(json[1]["name"], "getWalletBalance");
    }
}
