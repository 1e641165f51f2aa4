use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub endpoints: ApiPaths,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub token: Option<String>,
}

/// 各端點相對於 base_url 的路徑
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiPaths {
    pub testimonials: String,
    pub products: String,
    pub latest_products: String,
    pub subscriptions: String,
    pub users: String,
    pub auth: String,
    pub metadata: String,
    pub goto: String,
    pub render: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            testimonials: "/api/testimonials".to_string(),
            products: "/api/products".to_string(),
            latest_products: "/api/products/latest".to_string(),
            subscriptions: "/api/subscriptions".to_string(),
            users: "/api/users".to_string(),
            auth: "/api/auth".to_string(),
            metadata: "/api/metadata".to_string(),
            goto: "/api/goto".to_string(),
            render: "/api/render".to_string(),
        }
    }
}

impl ApiPaths {
    fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("endpoints.testimonials", self.testimonials.as_str()),
            ("endpoints.products", self.products.as_str()),
            ("endpoints.latest_products", self.latest_products.as_str()),
            ("endpoints.subscriptions", self.subscriptions.as_str()),
            ("endpoints.users", self.users.as_str()),
            ("endpoints.auth", self.auth.as_str()),
            ("endpoints.metadata", self.metadata.as_str()),
            ("endpoints.goto", self.goto.as_str()),
            ("endpoints.render", self.render.as_str()),
        ]
    }
}

/// 組合 base_url 與端點路徑後的完整 URL 表
#[derive(Debug, Clone, PartialEq)]
pub struct ApiUrls {
    base_url: String,
    paths: ApiPaths,
}

impl ApiUrls {
    pub fn new(base_url: &str, paths: ApiPaths) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            paths,
        }
    }

    fn join(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn testimonials(&self) -> String {
        self.join(&self.paths.testimonials)
    }

    pub fn products(&self) -> String {
        self.join(&self.paths.products)
    }

    pub fn latest_products(&self) -> String {
        self.join(&self.paths.latest_products)
    }

    pub fn subscriptions(&self) -> String {
        self.join(&self.paths.subscriptions)
    }

    pub fn users(&self) -> String {
        self.join(&self.paths.users)
    }

    pub fn auth(&self) -> String {
        self.join(&self.paths.auth)
    }

    pub fn metadata(&self) -> String {
        self.join(&self.paths.metadata)
    }

    pub fn goto(&self) -> String {
        self.join(&self.paths.goto)
    }

    pub fn render(&self) -> String {
        self.join(&self.paths.render)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
            },
            endpoints: ApiPaths::default(),
            session: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ClientError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ClientError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn urls(&self) -> ApiUrls {
        ApiUrls::new(&self.api.base_url, self.endpoints.clone())
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.token.as_deref())
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api.base_url)?;

        for (field, path) in self.endpoints.entries() {
            validation::validate_non_empty_string(field, path)?;
            if !path.starts_with('/') {
                return Err(ClientError::InvalidConfigValue {
                    field: field.to_string(),
                    value: path.to_string(),
                    reason: "Endpoint path must start with '/'".to_string(),
                });
            }
        }

        Ok(())
    }
}
