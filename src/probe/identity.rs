//! 请求身份随机化
//!
//! 为每次拨测生成随机来源IP与浏览器User-Agent，
//! 避免目标平台按固定客户端特征聚类请求

use rand::seq::SliceRandom;
use rand::Rng;

/// 随机浏览器主版本号下界
const MIN_BROWSER_VERSION: u32 = 100;

/// 随机浏览器主版本号上界（含）
const MAX_BROWSER_VERSION: u32 = 131;

/// 生成随机的点分十进制IP，每段取值范围为[0,255)
pub fn random_ip() -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}.{}.{}.{}",
        rng.gen_range(0..255),
        rng.gen_range(0..255),
        rng.gen_range(0..255),
        rng.gen_range(0..255)
    )
}

/// 生成[100,131]区间内的随机浏览器主版本号
pub fn random_browser_version() -> u32 {
    rand::thread_rng().gen_range(MIN_BROWSER_VERSION..=MAX_BROWSER_VERSION)
}

/// 从四个模板中随机选择User-Agent
///
/// 桌面浏览器模板填入随机主版本号，移动端模板为固定字符串。
pub fn random_user_agent() -> String {
    let version = random_browser_version();
    let agents = [
        format!(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36",
            version
        ),
        format!(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{}.0.0.0 Safari/537.36",
            version
        ),
        format!(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/{}.0.0.0",
            version
        ),
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1"
            .to_string(),
    ];

    let mut rng = rand::thread_rng();
    match agents.choose(&mut rng) {
        Some(agent) => agent.clone(),
        None => agents[0].clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ip_has_four_octets_below_255() {
        for _ in 0..100 {
            let ip = random_ip();
            let octets: Vec<&str> = ip.split('.').collect();

            assert_eq!(octets.len(), 4, "IP格式错误: {}", ip);
            for octet in octets {
                let value: u32 = octet.parse().unwrap();
                assert!(value < 255, "IP段超出范围: {}", ip);
            }
        }
    }

    #[test]
    fn test_random_browser_version_range() {
        for _ in 0..200 {
            let version = random_browser_version();
            assert!((MIN_BROWSER_VERSION..=MAX_BROWSER_VERSION).contains(&version));
        }
    }

    #[test]
    fn test_random_user_agent_uses_known_templates() {
        for _ in 0..100 {
            let agent = random_user_agent();
            assert!(agent.starts_with("Mozilla/5.0"));
            assert!(
                agent.contains("Chrome/") || agent.contains("Edge/") || agent.contains("iPhone"),
                "未知的User-Agent模板: {}",
                agent
            );
        }
    }

    #[test]
    fn test_desktop_user_agent_version_in_range() {
        for _ in 0..200 {
            let agent = random_user_agent();
            for marker in ["Chrome/", "Edge/"] {
                if let Some(pos) = agent.find(marker) {
                    let rest = &agent[pos + marker.len()..];
                    let major = rest.split('.').next().unwrap();
                    let version: u32 = major.parse().unwrap();
                    assert!((MIN_BROWSER_VERSION..=MAX_BROWSER_VERSION).contains(&version));
                }
            }
        }
    }
}
