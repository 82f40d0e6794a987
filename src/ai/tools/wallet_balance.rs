use std::collections::HashMap;

use crate::openai::{Function, FunctionHandler, Parameters, Property};
use anyhow::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct WalletBalanceProps {
    #[serde(rename = "userId")]
    pub user_id: Property,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub name: String,
    pub balance: i64,
}

impl Account {
    pub fn new(name: &str, balance: i64) -> Self {
        Self {
            name: name.to_string(),
            balance,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WalletBalance {
    pub balance: i64,
    pub user: String,
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct WalletBalanceTool {
    pub function: Function<WalletBalanceProps>,
    #[serde(skip)]
    accounts: HashMap<String, Account>,
}

#[async_trait]
impl FunctionHandler for WalletBalanceTool {
    async fn call(&self, args: &str) -> Result<String, Error> {
        let balance = self.lookup(args);
        Ok(serde_json::to_string(&balance)?)
    }

    fn function_name(&self) -> String {
        self.function.name.clone()
    }
}

impl WalletBalanceTool {
    pub fn new(accounts: HashMap<String, Account>) -> Self {
        let function = Function {
            name: String::from("getWalletBalance"),
            description: String::from("查询用户钱包余额"),
            parameters: Parameters {
                r#type: String::from("object"),
                properties: WalletBalanceProps {
                    user_id: Property {
                        r#type: String::from("string"),
                        description: String::from("用户id"),
                    },
                },
                required: vec![String::from("userId")],
            },
        };
        Self { function, accounts }
    }

    pub fn default_accounts() -> HashMap<String, Account> {
        HashMap::from([
            (String::from("lisi"), Account::new("李四", 10000)),
            (String::from("zhangsan"), Account::new("张三", 20000)),
        ])
    }

    /// Looks up the balance for the `userId` in `args`. Arguments that
    /// are not a JSON object, a `userId` that is not a string, or an
    /// unknown user all yield a zero balance and an empty name.
    pub fn lookup(&self, args: &str) -> WalletBalance {
        let fn_args = parse_string_args(args);

        let account = fn_args
            .get("userId")
            .and_then(|user_id| self.accounts.get(user_id));

        match account {
            Some(a) => WalletBalance {
                balance: a.balance,
                user: a.name.clone(),
            },
            None => WalletBalance {
                balance: 0,
                user: String::new(),
            },
        }
    }
}

/// Reads the arguments as a flat string to string mapping. Entries
/// whose value is not a string are dropped.
fn parse_string_args(args: &str) -> HashMap<String, String> {
    let parsed: HashMap<String, Value> = match serde_json::from_str(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Ignoring malformed function arguments {:?}: {}", args, e);
            return HashMap::new();
        }
    };
    parsed
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect()
}

impl Default for WalletBalanceTool {
    fn default() -> Self {
        Self::new(Self::default_accounts())
    }
}
