//! 保活周期编排
//!
//! 聚合静态配置与远程清单中的URL，按时段分派拨测批次并汇总结果

use crate::config::Config;
use crate::fetch::UrlListSource;
use crate::notification::{message, Notifier};
use crate::probe::{ProbeResult, Prober};
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// 单轮保活周期的汇总报告
#[derive(Debug)]
pub struct CycleReport {
    /// 周期执行时配置时区下的小时
    pub hour: u32,
    /// 分时段批次是否因暂停时段被跳过
    pub suppressed: bool,
    /// 全天候批次结果（按提交顺序）
    pub always_on: Vec<ProbeResult>,
    /// 分时段批次结果（按提交顺序）
    pub time_gated: Vec<ProbeResult>,
}

impl CycleReport {
    /// 本轮全部结果中的失败数量
    pub fn failure_count(&self) -> usize {
        self.always_on
            .iter()
            .chain(self.time_gated.iter())
            .filter(|result| !result.success)
            .count()
    }
}

/// 保活周期编排器
pub struct Orchestrator {
    /// 应用配置
    config: Config,
    /// 拨测器
    prober: Arc<dyn Prober>,
    /// 通知发送器
    notifier: Arc<dyn Notifier>,
    /// 远程清单来源
    source: Arc<dyn UrlListSource>,
}

impl Orchestrator {
    /// 创建新的编排器
    ///
    /// # 参数
    /// * `config` - 应用配置
    /// * `prober` - 拨测器
    /// * `notifier` - 通知发送器
    /// * `source` - 远程清单来源
    ///
    /// # 返回
    /// * `Self` - 编排器实例
    pub fn new(
        config: Config,
        prober: Arc<dyn Prober>,
        notifier: Arc<dyn Notifier>,
        source: Arc<dyn UrlListSource>,
    ) -> Self {
        Self {
            config,
            prober,
            notifier,
            source,
        }
    }

    /// 执行一轮保活周期，小时取配置时区下的当前时间
    pub async fn run_cycle(&self) -> CycleReport {
        let hour = Utc::now().with_timezone(&self.config.timezone).hour();
        self.run_cycle_at_hour(hour).await
    }

    /// 在指定小时语境下执行一轮保活周期
    ///
    /// 全天候批次无条件执行；分时段批次在暂停时段内跳过。
    ///
    /// # 参数
    /// * `hour` - 配置时区下的当前小时
    ///
    /// # 返回
    /// * `CycleReport` - 本轮汇总报告
    pub async fn run_cycle_at_hour(&self, hour: u32) -> CycleReport {
        let cycle_id = Uuid::new_v4();
        let started_at = self.now_in_timezone();
        info!("开始保活周期: {} (当前小时: {})", cycle_id, hour);

        let (always_on_urls, time_gated_urls) = self.collect_urls().await;
        info!(
            "全天候URL共 {} 个，分时段URL共 {} 个",
            always_on_urls.len(),
            time_gated_urls.len()
        );

        let always_on = if always_on_urls.is_empty() {
            info!("未配置全天候URL，跳过全天候批次");
            Vec::new()
        } else {
            let results = self.prober.probe_batch(&always_on_urls).await;
            self.log_results(&results);
            results
        };

        let suppressed = self.config.pause.contains(hour);
        let time_gated = if suppressed {
            info!(
                "当前处于暂停时段 {}:00-{}:00，跳过分时段批次",
                self.config.pause.start_hour, self.config.pause.end_hour
            );
            Vec::new()
        } else if time_gated_urls.is_empty() {
            info!("未配置分时段URL，跳过分时段批次");
            Vec::new()
        } else {
            info!("当前小时 {}:00，执行分时段批次", hour);
            let results = self.prober.probe_batch(&time_gated_urls).await;
            self.log_results(&results);
            results
        };

        if self.config.send_summary {
            let summary = message::summary_message(
                &started_at,
                always_on_urls.len(),
                time_gated_urls.len(),
            );
            if let Err(e) = self.notifier.send(&summary).await {
                error!("汇总通知发送失败: {}", e);
            }
        }

        info!("保活周期完成: {}", cycle_id);

        CycleReport {
            hour,
            suppressed,
            always_on,
            time_gated,
        }
    }

    /// 汇总静态配置与远程清单中的URL
    ///
    /// 全天候集合的顺序为：平台自身URL与环境变量URL在前，远程清单在后；
    /// 分时段集合同理，远程清单按文件声明顺序追加。
    async fn collect_urls(&self) -> (Vec<String>, Vec<String>) {
        let mut always_on = self.config.static_always_on_urls.clone();
        let remote_always_on = self
            .source
            .fetch_url_list(&self.config.always_on_file)
            .await;
        info!(
            "远程全天候清单 {} 返回 {} 个URL",
            self.config.always_on_file,
            remote_always_on.len()
        );
        always_on.extend(remote_always_on);

        let mut time_gated = self.config.static_time_gated_urls.clone();
        for file in &self.config.time_gated_files {
            let urls = self.source.fetch_url_list(file).await;
            if !urls.is_empty() {
                info!("远程分时段清单 {} 返回 {} 个URL", file, urls.len());
                time_gated.extend(urls);
            }
        }

        // 剔除空项
        always_on.retain(|url| !url.is_empty());
        time_gated.retain(|url| !url.is_empty());

        (always_on, time_gated)
    }

    /// 按提交顺序记录批次结果
    fn log_results(&self, results: &[ProbeResult]) {
        for result in results {
            if result.success {
                info!(
                    "{} 访问成功: {}",
                    message::format_timestamp(&result.timestamp),
                    result.url
                );
            } else {
                error!(
                    "{} 访问失败: {} 状态码: {}",
                    message::format_timestamp(&result.timestamp),
                    result.url,
                    result.status
                );
            }
        }
    }

    /// 当前时刻在配置时区下的时间戳
    fn now_in_timezone(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.config.timezone).fixed_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GithubConfig, ProbeConfig, TelegramConfig};
    use crate::scheduler::window::PauseWindow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn test_timestamp() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .unwrap()
    }

    /// 记录拨测调用并返回成功结果的拨测桩
    struct StubProber {
        calls: Mutex<Vec<String>>,
    }

    impl StubProber {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Prober for StubProber {
        async fn probe(&self, index: usize, url: &str) -> ProbeResult {
            self.calls.lock().unwrap().push(url.to_string());
            ProbeResult::new(index, url.to_string(), 200, test_timestamp())
        }
    }

    /// 记录所有收到消息的通知桩
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                messages: Mutex::new(Vec::new()),
            })
        }

        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str) -> anyhow::Result<()> {
            self.messages.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn test_connection(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// 返回固定文件内容的清单来源桩
    struct FixedSource {
        files: HashMap<String, String>,
    }

    impl FixedSource {
        fn new(files: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                files: files
                    .iter()
                    .map(|(path, content)| (path.to_string(), content.to_string()))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl UrlListSource for FixedSource {
        async fn fetch_file(&self, path: &str) -> String {
            self.files.get(path).cloned().unwrap_or_default()
        }
    }

    fn test_config() -> Config {
        Config {
            telegram: TelegramConfig {
                token: None,
                chat_id: None,
            },
            github: GithubConfig::default(),
            probe: ProbeConfig::default(),
            pause: PauseWindow::default(),
            timezone: chrono_tz::Asia::Hong_Kong,
            always_on_file: "url.yaml".to_string(),
            time_gated_files: vec!["url1.yaml".to_string(), "url2.yaml".to_string()],
            static_always_on_urls: vec!["https://static.example/".to_string()],
            static_time_gated_urls: vec![],
            send_summary: false,
        }
    }

    fn build_orchestrator(
        config: Config,
        prober: Arc<StubProber>,
        notifier: Arc<RecordingNotifier>,
        source: Arc<FixedSource>,
    ) -> Orchestrator {
        Orchestrator::new(config, prober, notifier, source)
    }

    #[tokio::test]
    async fn test_cycle_probes_both_batches_outside_pause() {
        let prober = StubProber::new();
        let notifier = RecordingNotifier::new();
        let source = FixedSource::new(&[
            ("url.yaml", "https://remote.example/\n"),
            ("url1.yaml", "https://gated-a.example/\n"),
            ("url2.yaml", "https://gated-b.example/\n"),
        ]);

        let orchestrator =
            build_orchestrator(test_config(), prober.clone(), notifier, source);
        let report = orchestrator.run_cycle_at_hour(12).await;

        assert_eq!(report.hour, 12);
        assert!(!report.suppressed);
        assert_eq!(report.always_on.len(), 2);
        assert_eq!(report.time_gated.len(), 2);
        assert_eq!(prober.calls().len(), 4);
        assert_eq!(report.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_static_urls_precede_remote_urls() {
        let prober = StubProber::new();
        let notifier = RecordingNotifier::new();
        let source = FixedSource::new(&[("url.yaml", "https://remote.example/\n")]);

        let orchestrator =
            build_orchestrator(test_config(), prober, notifier, source);
        let report = orchestrator.run_cycle_at_hour(12).await;

        assert_eq!(report.always_on[0].url, "https://static.example/");
        assert_eq!(report.always_on[0].index, 0);
        assert_eq!(report.always_on[1].url, "https://remote.example/");
        assert_eq!(report.always_on[1].index, 1);
    }

    #[tokio::test]
    async fn test_pause_window_suppresses_time_gated_batch() {
        let prober = StubProber::new();
        let notifier = RecordingNotifier::new();
        let source = FixedSource::new(&[
            ("url.yaml", "https://remote.example/\n"),
            ("url1.yaml", "https://gated.example/\n"),
        ]);

        let orchestrator =
            build_orchestrator(test_config(), prober.clone(), notifier, source);
        let report = orchestrator.run_cycle_at_hour(3).await;

        assert!(report.suppressed);
        assert_eq!(report.always_on.len(), 2);
        assert!(report.time_gated.is_empty());

        let calls = prober.calls();
        assert!(!calls.contains(&"https://gated.example/".to_string()));
    }

    #[tokio::test]
    async fn test_pause_window_boundary_hours() {
        let source = FixedSource::new(&[("url1.yaml", "https://gated.example/\n")]);
        let orchestrator = build_orchestrator(
            test_config(),
            StubProber::new(),
            RecordingNotifier::new(),
            source,
        );

        // 默认暂停时段 [1, 6)
        assert!(orchestrator.run_cycle_at_hour(1).await.suppressed);
        assert!(orchestrator.run_cycle_at_hour(5).await.suppressed);
        assert!(!orchestrator.run_cycle_at_hour(6).await.suppressed);
        assert!(!orchestrator.run_cycle_at_hour(0).await.suppressed);
    }

    #[tokio::test]
    async fn test_summary_sent_when_enabled() {
        let mut config = test_config();
        config.send_summary = true;

        let notifier = RecordingNotifier::new();
        let source = FixedSource::new(&[
            ("url.yaml", "https://remote.example/\n"),
            ("url1.yaml", "https://gated.example/\n"),
        ]);

        let orchestrator =
            build_orchestrator(config, StubProber::new(), notifier.clone(), source);
        orchestrator.run_cycle_at_hour(12).await;

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("<b>Keep-alive Summary:</b>"));
        assert!(messages[0].contains("<b>24-hour URLs:</b> 2"));
        assert!(messages[0].contains("<b>Time-specific URLs:</b> 1"));
    }

    #[tokio::test]
    async fn test_summary_not_sent_when_disabled() {
        let notifier = RecordingNotifier::new();
        let source = FixedSource::new(&[("url.yaml", "https://remote.example/\n")]);

        let orchestrator = build_orchestrator(
            test_config(),
            StubProber::new(),
            notifier.clone(),
            source,
        );
        orchestrator.run_cycle_at_hour(12).await;

        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_empty_url_sets_skip_probing() {
        let mut config = test_config();
        config.static_always_on_urls = vec![];

        let prober = StubProber::new();
        let source = FixedSource::new(&[]);

        let orchestrator =
            build_orchestrator(config, prober.clone(), RecordingNotifier::new(), source);
        let report = orchestrator.run_cycle_at_hour(12).await;

        assert!(report.always_on.is_empty());
        assert!(report.time_gated.is_empty());
        assert!(prober.calls().is_empty());
    }
}
