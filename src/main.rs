//! Keep Vitals 主程序入口
//!
//! 部署保活服务：定时访问配置的URL，防止托管平台休眠

use anyhow::{Context, Result};
use clap::Parser;
use keep_vitals::cli::args::{Args, Commands};
use keep_vitals::cli::commands::{
    Command, OnceCommand, RunCommand, ShowConfigCommand, TestNotifyCommand, VersionCommand,
};
use keep_vitals::logging::{LogConfig, LoggingSystem};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        console: true,
        json_format: false,
        ..Default::default()
    };

    let _logging_system = LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    // 按子命令分派
    let command: Box<dyn Command> = match &args.command {
        Commands::Run { .. } => Box::new(RunCommand),
        Commands::Once => Box::new(OnceCommand),
        Commands::TestNotify { .. } => Box::new(TestNotifyCommand),
        Commands::ShowConfig { .. } => Box::new(ShowConfigCommand),
        Commands::Version { .. } => Box::new(VersionCommand),
    };

    command.execute(&args).await.context("命令执行失败")?;

    Ok(())
}
