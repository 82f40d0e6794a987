use crate::openai::{Function, FunctionHandler, Parameters, Property};
use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;

pub const BOT_NAME: &str = "空空";
pub const BOT_FEATURES: &str = "聊天,助手,查询钱包余额";

// The API rejects a function declaration with an empty properties
// object so there is a placeholder the model is free to fill in.
#[derive(Serialize)]
pub struct BotInfoProps {
    pub id: Property,
}

#[derive(Serialize)]
pub struct BotInfo {
    pub features: String,
    pub name: String,
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct BotInfoTool {
    pub function: Function<BotInfoProps>,
}

#[async_trait]
impl FunctionHandler for BotInfoTool {
    async fn call(&self, _args: &str) -> Result<String, Error> {
        Ok(serde_json::to_string(&Self::info())?)
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

impl BotInfoTool {
    pub fn new() -> Self {
        let function = Function {
            name: String::from("getBotInfo"),
            description: String::from(
                "获取机器人信息，在打招呼或自我介绍时可使用此函数获取名称以及功能",
            ),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: BotInfoProps {
                    id: Property {
                        r#type: String::from("string"),
                        description: String::from("gpt模型自动生成的id"),
                    },
                },
                required: vec![],
            },
        };
        Self { function }
    }

    pub fn info() -> BotInfo {
        BotInfo {
            features: BOT_FEATURES.to_string(),
            name: BOT_NAME.to_string(),
        }
    }
}

impl Default for BotInfoTool {
    fn default() -> Self {
        Self::new()
    }
}
