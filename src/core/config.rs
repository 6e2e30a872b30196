use std::env;

use reqwest::Url;

use crate::chat::ClientError;

pub const DEFAULT_API_BASE_URL: &str = "https://cliquish-unsaluted-pablo.ngrok-free.dev";
pub const DEFAULT_MAX_TOKENS: u32 = 256;
pub const DEFAULT_CHAT_PATHS: [&str; 2] = ["/api/chat", "/chat"];

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: String,
    /// Tried in order when sending a message. The first 2xx wins.
    pub chat_paths: Vec<String>,
    pub max_tokens: u32,
    pub storage_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_base_url =
            env::var("SOFAI_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let api_key = env::var("SOFAI_API_KEY").unwrap_or_default();
        let chat_paths = env::var("SOFAI_CHAT_PATHS")
            .map(|paths| parse_chat_paths(&paths))
            .unwrap_or_else(|_| default_chat_paths());
        let max_tokens = env::var("SOFAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let storage_path = env::var("SOFAI_STORAGE_PATH").unwrap_or("./".to_string());

        Self {
            api_base_url,
            api_key,
            chat_paths,
            max_tokens,
            storage_path,
        }
    }
}

impl AppConfig {
    /// Config pointing at `api_base_url` with every other field at its
    /// default. Does not read the environment.
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            api_key: String::new(),
            chat_paths: default_chat_paths(),
            max_tokens: DEFAULT_MAX_TOKENS,
            storage_path: "./".to_string(),
        }
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    pub fn with_chat_paths(mut self, paths: &[&str]) -> Self {
        self.chat_paths = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_storage_path(mut self, storage_path: &str) -> Self {
        self.storage_path = storage_path.to_string();
        self
    }

    pub fn db_path(&self) -> String {
        format!("{}/sofai.db", self.storage_path.trim_end_matches('/'))
    }

    /// Checks the parts of the config the client can't work without.
    pub fn validate(&self) -> Result<(), ClientError> {
        Url::parse(&self.api_base_url).map_err(|e| {
            ClientError::Configuration(format!(
                "Invalid API base URL {:?}: {}",
                self.api_base_url, e
            ))
        })?;
        if self.chat_paths.is_empty() {
            return Err(ClientError::Configuration(
                "No chat endpoint paths configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute URL for `path` relative to the API base.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let url = format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&url)
            .map_err(|e| ClientError::Configuration(format!("Invalid endpoint {:?}: {}", url, e)))
    }
}

fn default_chat_paths() -> Vec<String> {
    DEFAULT_CHAT_PATHS.iter().map(|p| p.to_string()).collect()
}

fn parse_chat_paths(paths: &str) -> Vec<String> {
    paths
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
