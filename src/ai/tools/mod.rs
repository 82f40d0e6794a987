pub mod bot_info;
pub use bot_info::BotInfoTool;

pub mod wallet_balance;
pub use wallet_balance::{Account, WalletBalanceTool};

pub mod registry;
pub use registry::FunctionRegistry;
