//! 应用配置
//!
//! 所有配置在编译期由 Trunk 构建环境注入（`option_env!`），
//! 未设置时回退到本地开发默认值。

use clubhouse_shared::SESSION_STORAGE_KEY;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端 API 根地址（不含末尾 `/`）
    pub api_base_url: String,
    /// 会话快照在 LocalStorage 中的键
    pub storage_key: String,
}

impl AppConfig {
    pub fn new(api_base_url: &str, storage_key: &str) -> Self {
        Self {
            api_base_url: normalize_base_url(api_base_url),
            storage_key: storage_key.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let base = option_env!("CLUBHOUSE_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        let key = option_env!("CLUBHOUSE_STORAGE_KEY")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(SESSION_STORAGE_KEY);
        Self::new(base, key)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, SESSION_STORAGE_KEY)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AppConfig::new(" https://api.club.org/ ", "k");
        assert_eq!(config.api_base_url, "https://api.club.org");
    }

    #[test]
    fn test_default_uses_fixed_storage_key() {
        assert_eq!(AppConfig::default().storage_key, "user-store");
    }
}
