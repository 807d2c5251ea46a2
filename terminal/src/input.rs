//! 标准输入读取
//!
//! 读取在独立线程中阻塞进行，每行送入单消费者队列

use std::io::BufRead;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// 启动标准输入读取线程
pub fn spawn_stdin_reader(capacity: usize) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(capacity);

    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        debug!("Console closed, stdin reader exiting");
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    return;
                }
            }
        }
        debug!("Stdin closed");
    });

    rx
}
