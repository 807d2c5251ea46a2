//! 仓库扫描终端

mod command;
mod console;
mod input;

use delivery::delivery_migrations;
use tracing::info;

use console::Console;

/// 输入队列容量
const INPUT_QUEUE_CAPACITY: usize = 32;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_dir = std::env::var("ESTOQUE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    estoque_bootstrap::run(&config_dir, delivery_migrations(), |infra| async move {
        info!("Terminal ready");
        let lines = input::spawn_stdin_reader(INPUT_QUEUE_CAPACITY);
        Console::new(infra, std::io::stdout()).run(lines).await
    })
    .await?;

    Ok(())
}
