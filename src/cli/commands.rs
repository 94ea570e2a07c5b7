//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Args, Commands, OutputFormat};
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::fetch::{GithubFileSource, NoOpSource, UrlListSource};
use crate::notification::{NoOpNotifier, Notifier, TelegramNotifier};
use crate::probe::HttpProber;
use crate::scheduler::Orchestrator;
use crate::web::AckServer;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, args: &Args) -> Result<()>;
}

/// 按配置构建通知发送器，未配置时降级为空实现
fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>> {
    match (&config.telegram.token, &config.telegram.chat_id) {
        (Some(token), Some(chat_id)) => {
            info!("Telegram通知已启用");
            Ok(Arc::new(TelegramNotifier::new(
                token.clone(),
                chat_id.clone(),
            )?))
        }
        _ => {
            info!("Telegram令牌或会话ID未配置，通知功能已禁用");
            Ok(Arc::new(NoOpNotifier))
        }
    }
}

/// 按配置构建远程清单来源，未配置时降级为空实现
fn build_source(config: &Config) -> Result<Arc<dyn UrlListSource>> {
    match GithubFileSource::from_config(&config.github)? {
        Some(source) => Ok(Arc::new(source)),
        None => Ok(Arc::new(NoOpSource)),
    }
}

/// 组装保活周期编排器及其全部依赖
fn build_orchestrator(config: Config) -> Result<Orchestrator> {
    let notifier = build_notifier(&config)?;
    let source = build_source(&config)?;
    let prober = Arc::new(HttpProber::new(
        config.probe,
        notifier.clone(),
        config.timezone,
    )?);

    Ok(Orchestrator::new(config, prober, notifier, source))
}

/// 启动保活服务命令
pub struct RunCommand;

#[async_trait]
impl Command for RunCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let (interval_secs, listen) = match &args.command {
            Commands::Run { interval, listen } => (*interval, listen.clone()),
            _ => return Ok(()),
        };

        let listen_addr: SocketAddr =
            listen
                .parse()
                .map_err(|_| ConfigError::InvalidListenAddr {
                    addr: listen.clone(),
                })?;

        let config = Config::from_env();
        if let Err(e) = crate::config::validate_config(&config) {
            warn!("配置校验未通过: {}", e);
        }

        let orchestrator = build_orchestrator(config)?;

        // 确认端点与保活循环共用一个关闭广播
        let (shutdown_tx, _) = broadcast::channel(1);
        let mut server = AckServer::new(listen_addr, shutdown_tx.subscribe());
        let server_handle = tokio::spawn(async move { server.start().await });

        info!(
            "保活服务已启动，周期间隔 {} 秒，确认端点 {}",
            interval_secs, listen_addr
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = orchestrator.run_cycle().await;
                    info!(
                        "本轮完成: 全天候 {} 个, 分时段 {} 个, 失败 {} 个",
                        report.always_on.len(),
                        report.time_gated.len(),
                        report.failure_count()
                    );
                }
                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        error!("监听关闭信号失败: {}", e);
                    }
                    info!("接收到关闭信号，正在停止保活服务...");
                    break;
                }
            }
        }

        let _ = shutdown_tx.send(());
        match server_handle.await {
            Ok(result) => result?,
            Err(e) => warn!("确认服务器任务异常退出: {}", e),
        }

        info!("保活服务已停止");
        Ok(())
    }
}

/// 单轮执行命令
pub struct OnceCommand;

#[async_trait]
impl Command for OnceCommand {
    async fn execute(&self, _args: &Args) -> Result<()> {
        let config = Config::from_env();
        let orchestrator = build_orchestrator(config)?;

        let report = orchestrator.run_cycle().await;

        println!("保活周期完成 (当前小时: {})", report.hour);
        println!("  全天候批次: {} 个URL", report.always_on.len());
        if report.suppressed {
            println!("  分时段批次: 处于暂停时段，已跳过");
        } else {
            println!("  分时段批次: {} 个URL", report.time_gated.len());
        }
        println!("  失败: {} 个", report.failure_count());

        Ok(())
    }
}

/// 通知测试命令
pub struct TestNotifyCommand;

#[async_trait]
impl Command for TestNotifyCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let message = match &args.command {
            Commands::TestNotify { message } => message.clone(),
            _ => return Ok(()),
        };

        let config = Config::from_env();
        if !config.telegram.is_configured() {
            println!("Telegram令牌或会话ID未配置，无法发送测试通知");
            return Ok(());
        }

        let notifier = build_notifier(&config)?;
        notifier
            .send(&format!("<b>Keep-alive Test:</b> {message}"))
            .await?;

        println!("测试通知发送成功");
        Ok(())
    }
}

/// 配置展示命令
pub struct ShowConfigCommand;

#[async_trait]
impl Command for ShowConfigCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let format = match &args.command {
            Commands::ShowConfig { format } => format.clone(),
            _ => return Ok(()),
        };

        let config = Config::from_env();

        match format {
            OutputFormat::Json => {
                // 令牌类配置只展示是否已配置
                let rendered = serde_json::json!({
                    "telegram_configured": config.telegram.is_configured(),
                    "github_configured": config.github.is_configured(),
                    "github_repo": config.github.repo,
                    "github_branch": config.github.branch,
                    "always_on_file": config.always_on_file,
                    "time_gated_files": config.time_gated_files,
                    "static_always_on_urls": config.static_always_on_urls,
                    "static_time_gated_urls": config.static_time_gated_urls,
                    "pause_start_hour": config.pause.start_hour,
                    "pause_end_hour": config.pause.end_hour,
                    "timezone": config.timezone.name(),
                    "timeout_ms": config.probe.timeout_ms,
                    "max_retries": config.probe.max_retries,
                    "send_summary": config.send_summary,
                });
                println!("{}", serde_json::to_string_pretty(&rendered)?);
            }
            OutputFormat::Text => {
                println!("当前生效配置:");
                println!(
                    "  Telegram通知: {}",
                    if config.telegram.is_configured() {
                        "已配置"
                    } else {
                        "未配置"
                    }
                );
                println!(
                    "  GitHub远程清单: {}",
                    match &config.github.repo {
                        Some(repo) if config.github.is_configured() =>
                            format!("{} (分支 {})", repo, config.github.branch),
                        _ => "未配置".to_string(),
                    }
                );
                println!("  全天候清单文件: {}", config.always_on_file);
                println!("  分时段清单文件: {}", config.time_gated_files.join(", "));
                println!(
                    "  静态全天候URL: {} 个",
                    config.static_always_on_urls.len()
                );
                println!(
                    "  静态分时段URL: {} 个",
                    config.static_time_gated_urls.len()
                );
                println!(
                    "  暂停时段: {}:00-{}:00 ({})",
                    config.pause.start_hour,
                    config.pause.end_hour,
                    config.timezone.name()
                );
                println!("  请求超时: {} 毫秒", config.probe.timeout_ms);
                println!("  最大重试次数: {}", config.probe.max_retries);
                println!(
                    "  汇总通知: {}",
                    if config.send_summary { "开启" } else { "关闭" }
                );
            }
        }

        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, args: &Args) -> Result<()> {
        let format = match &args.command {
            Commands::Version { format } => format.clone(),
            _ => return Ok(()),
        };

        match format {
            OutputFormat::Json => {
                let version_info = serde_json::json!({
                    "name": crate::APP_NAME,
                    "version": crate::VERSION,
                    "description": crate::APP_DESCRIPTION
                });
                println!("{}", serde_json::to_string_pretty(&version_info)?);
            }
            OutputFormat::Text => {
                println!("{} {}", crate::APP_NAME, crate::VERSION);
                println!("{}", crate::APP_DESCRIPTION);
            }
        }

        Ok(())
    }
}
