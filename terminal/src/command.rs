//! 控制台命令解析

use estoque_common::{SaleCode, SaleItemCode};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("用法: {0}")]
    Usage(&'static str),
    #[error("无效数字: {0}")]
    InvalidNumber(String),
}

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ConfigSet { host: String, port: u16 },
    ConfigShow,
    ConfigDelete,
    Login { name: String, password: String },
    Logout,
    Sales,
    Select { sale: SaleCode, item: SaleItemCode },
    Scan,
    Close,
    Resume,
    Release,
    Conference,
    Help,
    Quit,
    /// 非命令输入，扫描器开启时视为一次解码
    Decode(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(Self::Empty);
        };
        let args: Vec<&str> = parts.collect();

        let command = match (head, args.as_slice()) {
            ("config", ["show"]) => Self::ConfigShow,
            ("config", ["delete"]) => Self::ConfigDelete,
            ("config", [host, port]) => Self::ConfigSet {
                host: host.to_string(),
                port: parse_number(port)?,
            },
            ("config", _) => return Err(CommandError::Usage("config <host> <port> | config show | config delete")),
            ("login", [name, password]) => Self::Login {
                name: name.to_string(),
                password: password.to_string(),
            },
            ("login", _) => return Err(CommandError::Usage("login <name> <password>")),
            ("logout", []) => Self::Logout,
            ("sales", []) => Self::Sales,
            ("select", [sale, item]) => Self::Select {
                sale: SaleCode(parse_number(sale)?),
                item: SaleItemCode(parse_number(item)?),
            },
            ("select", _) => return Err(CommandError::Usage("select <sale> <item>")),
            ("scan", []) => Self::Scan,
            ("close", []) => Self::Close,
            ("resume", []) => Self::Resume,
            ("release", []) => Self::Release,
            ("conference", []) => Self::Conference,
            ("help", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            _ => Self::Decode(line.to_string()),
        };
        Ok(command)
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidNumber(value.to_string()))
}

pub const HELP: &str = "\
config <host> <port>   保存库存服务器地址
config show | delete   查看 / 删除服务器地址
login <name> <pass>    登录
logout                 退出登录
sales                  拉取待送货销售单
select <sale> <item>   选择销售明细
scan                   打开扫描器
close                  关闭扫描器
resume                 确认结果并继续扫描
release                提交送货放行
conference             进入收货核验
quit                   退出
其他输入在扫描器开启时作为条码处理";
