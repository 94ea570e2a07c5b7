//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};

/// Keep Vitals - 部署保活服务
#[derive(Parser, Debug, Clone)]
#[command(
    name = "keep-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        default_value = "info",
        help = "日志级别",
        env = "KEEP_VITALS_LOG_LEVEL"
    )]
    pub log_level: LogLevel,

    /// 是否启用详细输出
    #[arg(short, long, help = "启用详细输出")]
    pub verbose: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 启动保活服务
    Run {
        /// 保活周期间隔（秒）
        #[arg(
            short,
            long,
            value_name = "SECONDS",
            default_value = "300",
            help = "保活周期间隔（秒）",
            env = "CYCLE_INTERVAL_SECONDS"
        )]
        interval: u64,

        /// 确认端点监听地址
        #[arg(
            long,
            value_name = "ADDR",
            default_value = "0.0.0.0:8080",
            help = "确认端点监听地址",
            env = "LISTEN_ADDR"
        )]
        listen: String,
    },

    /// 执行一轮保活周期后退出
    Once,

    /// 测试通知功能
    TestNotify {
        /// 测试消息内容
        #[arg(short, long, default_value = "这是一条测试消息", help = "测试消息内容")]
        message: String,
    },

    /// 显示当前生效的配置
    ShowConfig {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 显示版本信息
    Version {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 是否启用详细输出
    pub fn is_verbose(&self) -> bool {
        self.verbose || matches!(self.log_level, LogLevel::Debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
    }

    #[test]
    fn test_run_defaults() {
        let args = Args::parse_from(["keep-vitals", "run"]);

        if let Commands::Run { interval, listen } = args.command {
            assert_eq!(interval, 300);
            assert_eq!(listen, "0.0.0.0:8080");
        } else {
            panic!("期望解析为run子命令");
        }
    }

    #[test]
    fn test_run_overrides() {
        let args = Args::parse_from([
            "keep-vitals",
            "--log-level",
            "debug",
            "run",
            "--interval",
            "60",
            "--listen",
            "127.0.0.1:9000",
        ]);

        assert_eq!(args.log_level, LogLevel::Debug);
        assert!(args.is_verbose());

        if let Commands::Run { interval, listen } = args.command {
            assert_eq!(interval, 60);
            assert_eq!(listen, "127.0.0.1:9000");
        } else {
            panic!("期望解析为run子命令");
        }
    }

    #[test]
    fn test_show_config_format() {
        let args = Args::parse_from(["keep-vitals", "show-config", "--format", "json"]);

        if let Commands::ShowConfig { format } = args.command {
            assert_eq!(format, OutputFormat::Json);
        } else {
            panic!("期望解析为show-config子命令");
        }
    }
}
