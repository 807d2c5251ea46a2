//! 控制台会话
//!
//! 逐行处理输入：命令驱动送货核对与收货核验，扫描器开启时其余输入视为条码

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use conference::GoodsConference;
use delivery::{
    EngineState, PendingSalesHandler, ReconciliationEngine, Sale, ScanOutcome, SqliteVolumeLedger,
};
use estoque_bootstrap::Infrastructure;
use estoque_common::{Operator, SaleCode, SaleItemCode, ServerAddress};
use estoque_errors::{AppError, AppResult};
use estoque_ports::{LoginCredentials, ServerConfigRepository};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command::{Command, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Delivery,
    Conference,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<W: Write> {
    infra: Arc<Infrastructure>,
    engine: ReconciliationEngine,
    conference: GoodsConference,
    sales_handler: PendingSalesHandler,
    sales: Vec<Sale>,
    operator: Option<Operator>,
    mode: Mode,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(infra: Arc<Infrastructure>, out: W) -> Self {
        let ledger = Arc::new(SqliteVolumeLedger::new(infra.pool()));
        let gateway = infra.gateway();

        Self {
            engine: ReconciliationEngine::new(ledger, gateway.clone()),
            conference: GoodsConference::new(gateway.clone()),
            sales_handler: PendingSalesHandler::new(gateway),
            sales: Vec::new(),
            operator: None,
            mode: Mode::Delivery,
            infra,
            out,
        }
    }

    /// 消费输入队列直到 `quit` 或输入结束
    pub async fn run(mut self, mut lines: mpsc::Receiver<String>) -> AppResult<()> {
        self.say("输入 help 查看命令");

        while let Some(line) = lines.recv().await {
            if self.handle_line(&line).await == Flow::Quit {
                break;
            }
        }

        info!("Console session ended");
        Ok(())
    }

    /// 处理一行输入，错误只显示不中断会话
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                self.say(e);
                return Flow::Continue;
            }
        };

        match self.execute(command).await {
            Ok(flow) => flow,
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "Command failed");
                self.say(describe_error(&e));
                Flow::Continue
            }
        }
    }

    async fn execute(&mut self, command: Command) -> AppResult<Flow> {
        match command {
            Command::Empty => {}
            Command::Help => self.say(HELP),
            Command::Quit => return Ok(Flow::Quit),
            Command::ConfigSet { host, port } => {
                let address =
                    ServerAddress::new(host, port).map_err(|e| AppError::validation(e.to_string()))?;
                self.servers().save(&address).await?;
                self.say(format_args!("服务器已保存: {}", address));
            }
            Command::ConfigShow => match self.servers().get().await? {
                Some(address) => self.say(format_args!("服务器: {}", address.base_url())),
                None => self.say("尚未配置服务器"),
            },
            Command::ConfigDelete => {
                self.servers().delete().await?;
                self.say("服务器配置已删除");
            }
            Command::Login { name, password } => {
                let operator = self
                    .infra
                    .gateway()
                    .login(&LoginCredentials::new(name, password))
                    .await?;
                self.say(format_args!("欢迎, {}", operator.name));
                self.operator = Some(operator);
            }
            Command::Logout => {
                self.engine.deselect();
                self.conference.close_scanner();
                self.sales.clear();
                self.mode = Mode::Delivery;
                if let Some(operator) = self.operator.take() {
                    info!(operator_id = operator.id, "Operator logged out");
                }
                self.say("已退出登录");
            }
            Command::Sales => self.load_sales().await?,
            Command::Select { sale, item } => self.select(sale, item).await?,
            Command::Scan => match self.mode {
                Mode::Delivery => {
                    self.engine.open_scanner()?;
                    self.say("扫描器已开启");
                }
                Mode::Conference => {
                    self.require_operator()?;
                    self.conference.open_scanner();
                    self.say("扫描器已开启");
                }
            },
            Command::Close => {
                match self.mode {
                    Mode::Delivery => self.engine.close_scanner(),
                    Mode::Conference => self.conference.close_scanner(),
                }
                self.say("扫描器已关闭");
            }
            Command::Resume => match self.mode {
                Mode::Delivery => {
                    let state = self.engine.resume_scanning();
                    if state == EngineState::Scanning {
                        self.say("继续扫描");
                    }
                }
                Mode::Conference => {
                    self.conference.resume_scanning();
                    if self.conference.is_scanner_open() {
                        self.say("继续扫描");
                    }
                }
            },
            Command::Release => self.release().await?,
            Command::Conference => {
                self.require_operator()?;
                self.engine.close_scanner();
                self.mode = Mode::Conference;
                self.conference.open_scanner();
                self.say("收货核验: 扫描商品条码");
            }
            Command::Decode(raw) => self.decode(&raw).await?,
        }
        Ok(Flow::Continue)
    }

    async fn load_sales(&mut self) -> AppResult<()> {
        self.require_operator()?;
        let sales = self.sales_handler.fetch().await?;
        let report = self.engine.reconcile(&sales).await?;

        for sale in &sales {
            self.say(format_args!(
                "销售单 {} - {} ({})",
                sale.code,
                sale.customer_name,
                sale.address_line()
            ));
            for item in &sale.items {
                let status = if item.is_released() { "已放行" } else { "待放行" };
                self.say(format_args!(
                    "  明细 {}: {} [{}] 包裹 {} ({})",
                    item.code, item.product_name, item.product_code, item.total_volumes_expected, status
                ));
            }
        }
        if sales.is_empty() {
            self.say("没有待送货销售单");
        }
        for code in &report.ready {
            self.say(format_args!("明细 {} 已扫齐，可提交放行", code));
        }

        self.sales = sales;
        Ok(())
    }

    async fn select(&mut self, sale: SaleCode, item: SaleItemCode) -> AppResult<()> {
        let item = PendingSalesHandler::find_item(&self.sales, sale, item)?;
        let name = item.product_name.clone();

        self.conference.close_scanner();
        self.mode = Mode::Delivery;
        let progress = self.engine.select_item(item).await?;

        self.say(format_args!("{}: 已读取 {}", name, progress));
        match self.engine.state() {
            EngineState::Released => self.say("该明细已放行"),
            EngineState::ReadyToRelease => self.say("包裹已全部读取，输入 release 提交放行"),
            _ => {}
        }
        Ok(())
    }

    async fn decode(&mut self, raw: &str) -> AppResult<()> {
        match self.mode {
            Mode::Conference if self.conference.is_scanner_open() => {
                let operator = self.require_operator()?;
                let outcome = self.conference.submit_scan(raw, &operator).await?;
                self.say(outcome);
            }
            Mode::Delivery if self.engine.selected_item().is_some() => {
                let outcome = self.engine.submit_scan(raw).await?;
                let target_reached = outcome.target_reached();
                match outcome {
                    ScanOutcome::Ignored => self.say("扫描已忽略，输入 resume 继续"),
                    outcome => self.say(outcome),
                }
                if target_reached {
                    self.release().await?;
                }
            }
            _ => self.say(format_args!("未知命令: {}", raw)),
        }
        Ok(())
    }

    async fn release(&mut self) -> AppResult<()> {
        let operator = self.require_operator()?;
        match self.engine.release_item(&operator).await {
            Ok(receipt) => {
                self.mark_released();
                self.engine.deselect();
                self.say(receipt.message);
                self.say("明细已放行");
                Ok(())
            }
            Err(e) if e.is_remote() => {
                self.say(describe_error(&e));
                self.say("台账已保留，输入 release 重试");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// 同步本地销售单列表，避免重新选择后再次提交
    fn mark_released(&mut self) {
        let Some(code) = self.engine.selected_item().map(|item| item.code) else {
            return;
        };
        self.sales
            .iter_mut()
            .flat_map(|sale| sale.items.iter_mut())
            .filter(|item| item.code == code)
            .for_each(|item| item.mark_released());
    }

    fn require_operator(&self) -> AppResult<Operator> {
        self.operator
            .clone()
            .ok_or_else(|| AppError::unauthenticated("请先登录"))
    }

    fn servers(&self) -> Arc<dyn ServerConfigRepository> {
        self.infra.server_config()
    }

    fn say(&mut self, message: impl fmt::Display) {
        if let Err(e) = writeln!(self.out, "{}", message) {
            warn!(error = %e, "Console write failed");
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

fn describe_error(err: &AppError) -> String {
    match err {
        AppError::Configuration(_) => format!("{}（使用 config <host> <port> 配置服务器）", err),
        AppError::Unauthenticated(_) => format!("{}（用户名或密码错误，或尚未登录）", err),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery::delivery_migrations;
    use estoque_config::AppConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn console() -> Console<Vec<u8>> {
        let mut config = AppConfig::default();
        config.ledger.url = "sqlite::memory:".to_string();
        let infra = Infrastructure::from_config(config, &delivery_migrations())
            .await
            .unwrap();
        Console::new(Arc::new(infra), Vec::new())
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_config_commands() {
        let mut console = console().await;

        assert_eq!(console.handle_line("config 192.168.0.10 3000").await, Flow::Continue);
        console.handle_line("config show").await;
        console.handle_line("config delete").await;
        console.handle_line("config show").await;

        let text = output(console);
        assert!(text.contains("服务器已保存: 192.168.0.10:3000"));
        assert!(text.contains("http://192.168.0.10:3000"));
        assert!(text.contains("尚未配置服务器"));
    }

    #[tokio::test]
    async fn test_errors_do_not_end_session() {
        let mut console = console().await;

        assert_eq!(console.handle_line("release").await, Flow::Continue);
        assert_eq!(console.handle_line("sales").await, Flow::Continue);
        assert_eq!(console.handle_line("50005042501").await, Flow::Continue);
        assert_eq!(console.handle_line("quit").await, Flow::Quit);

        let text = output(console);
        assert!(text.contains("请先登录"));
        assert!(text.contains("未知命令: 50005042501"));
    }

    #[tokio::test]
    async fn test_login_without_server_explains_configuration() {
        let mut console = console().await;
        console.handle_line("login carlos secret").await;

        assert!(output(console).contains("config <host> <port>"));
    }

    async fn inventory_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "codigo": 7, "nome": "Carlos" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vendas-pendentes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "codigo": 1,
                "clienteNome": "Loja Centro",
                "logradouro": "Av. Brasil",
                "numero": "100",
                "bairro": "Centro",
                "itens": [{
                    "codigo": 11,
                    "produto_codigo": 500,
                    "produtoNome": "Armario",
                    "quantidade": 1,
                    "volumesPorUnidade": 1,
                    "totalVolumesEsperados": 1,
                    "libEntrega": null
                }]
            }])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/liberar-entrega"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "message": "ok" })))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_released_item_is_not_released_again() {
        let server = inventory_server().await;
        let socket = server.address();
        let mut console = console().await;

        for line in [
            format!("config {} {}", socket.ip(), socket.port()),
            "login carlos secret".to_string(),
            "sales".to_string(),
            "select 1 11".to_string(),
            "scan".to_string(),
            "50005042501".to_string(),
            "select 1 11".to_string(),
            "scan".to_string(),
            "50005042501".to_string(),
        ] {
            assert_eq!(console.handle_line(&line).await, Flow::Continue);
        }

        let releases = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|request| request.url.path() == "/liberar-entrega")
            .count();
        assert_eq!(releases, 1);

        let text = output(console);
        assert!(text.contains("明细已放行"));
        assert!(text.contains("该明细已放行"));
    }
}
