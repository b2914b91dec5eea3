use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub download: DownloadSettings,
    #[serde(default)]
    pub proxy: ProxySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_depth")]
    pub default_depth: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    #[serde(default = "default_output_dir")]
    pub default_output_dir: PathBuf,
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
    #[serde(default)]
    pub extra_ytdlp_flags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProxySettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_proxy_type")]
    pub proxy_type: String,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_proxy_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl ProxySettings {
    pub fn url(&self) -> Option<String> {
        if !self.enabled || self.host.is_empty() {
            return None;
        }
        let scheme = match self.proxy_type.as_str() {
            "socks5" => "socks5",
            "https" => "https",
            _ => "http",
        };
        if !self.username.is_empty() {
            Some(format!(
                "{}://{}:{}@{}:{}",
                scheme, self.username, self.password, self.host, self.port
            ))
        } else {
            Some(format!("{}://{}:{}", scheme, self.host, self.port))
        }
    }
}

pub fn default_endpoint() -> String {
    "https://yt.lemnoslife.com/noKey/search".into()
}

fn default_depth() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    concat!("ytmp3/", env!("CARGO_PKG_VERSION")).into()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_audio_format() -> String {
    "mp3".into()
}

fn default_audio_quality() -> String {
    "192K".into()
}

fn default_proxy_type() -> String {
    "http".into()
}

fn default_proxy_port() -> u16 {
    8080
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_depth: default_depth(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            default_output_dir: default_output_dir(),
            audio_format: default_audio_format(),
            audio_quality: default_audio_quality(),
            extra_ytdlp_flags: Vec::new(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            download: DownloadSettings::default(),
            proxy: ProxySettings::default(),
        }
    }
}
