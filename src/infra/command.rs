//! # Process Execution Module / 进程执行模块
//!
//! Spawns child test processes and captures their combined output.
//! 派生子测试进程并捕获其合并输出。

use anyhow::{Context, Result, anyhow};
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Spawns a command with piped output and captures stdout and stderr into a
/// single string. The two streams are read concurrently so a child that
/// fills one pipe while the other is full cannot deadlock.
///
/// 以管道输出派生命令，并将 stdout 和 stderr 捕获到同一个字符串中。
/// 两个流被并发读取，因此子进程在一个管道满时写另一个也不会死锁。
pub async fn spawn_and_capture(mut cmd: Command) -> Result<(ExitStatus, String)> {
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

    let mut child = cmd.spawn().context("failed to spawn test process")?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("failed to capture child stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("failed to capture child stderr"))?;

    let stdout_task = tokio::spawn(read_lines(BufReader::new(stdout)));
    let stderr_task = tokio::spawn(read_lines(BufReader::new(stderr)));

    let status = child
        .wait()
        .await
        .context("failed to wait for test process")?;

    // Join both readers after the process exits so no trailing output is lost.
    // 进程退出后再汇合两个读取任务，确保不丢失尾部输出。
    let mut output = stdout_task.await.context("stdout reader task failed")?;
    let stderr_output = stderr_task.await.context("stderr reader task failed")?;
    if !stderr_output.is_empty() {
        output.push_str(&stderr_output);
    }

    Ok((status, output))
}

async fn read_lines<R>(reader: BufReader<R>) -> String
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut collected = String::new();
    let mut lines = reader.lines();
    while let Ok(Some(line)) = lines.next_line().await {
        collected.push_str(&line);
        collected.push('\n');
    }
    collected
}
