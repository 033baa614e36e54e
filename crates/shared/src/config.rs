use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

const DEFAULT_RSS_SOURCES: &[&str] = &[
    "http://feeds.bbci.co.uk/news/rss.xml",
    "http://feeds.bbci.co.uk/news/world/rss.xml",
    "https://www.nasa.gov/rss/dyn/breaking_news.rss",
    "https://pib.gov.in/rssfeed/technology.aspx",
    "https://pib.gov.in/rssfeed/science_technology.aspx",
    "https://pib.gov.in/rssfeed/economic_affairs.aspx",
];

/// Pipeline configuration. Built once at startup and passed into each stage.
#[derive(Debug, Clone)]
pub struct Config {
    pub rss_sources: Vec<String>,
    pub processed_file: PathBuf,
    pub good_dir: PathBuf,
    pub bad_dir: PathBuf,
    pub media_dir: PathBuf,
    pub feed_file: PathBuf,
    pub podcast_title: String,
    pub base_url: String,
    pub min_words: usize,
    pub min_duration_secs: f64,
    pub max_candidates: usize,
    pub ollama_url: String,
    pub ollama_model: String,
    pub tts_url: String,
    pub cover_font: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Pick up an optional .env for local overrides
        Self::try_load_dotenv();

        let rss_sources = match env::var("RSS_SOURCES") {
            Ok(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => DEFAULT_RSS_SOURCES.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            rss_sources,
            processed_file: PathBuf::from("data/processed/processed.json"),
            good_dir: PathBuf::from("data/good"),
            bad_dir: PathBuf::from("data/bad"),
            media_dir: PathBuf::from("docs/media"),
            feed_file: PathBuf::from("docs/feed.xml"),
            podcast_title: env_or("PODCAST_TITLE", "Insight Echo: Daily Trends"),
            base_url: env_or(
                "BASE_URL",
                "https://arkshinigami.github.io/dailytrends-ai/media",
            ),
            min_words: 300,
            min_duration_secs: 180.0,
            max_candidates: 3,
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434/api/generate"),
            ollama_model: env_or("OLLAMA_MODEL", "llama3.1"),
            tts_url: env_or("TTS_URL", "http://localhost:5002/api/tts"),
            cover_font: PathBuf::from(env_or(
                "COVER_FONT",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            )),
        })
    }

    /// Create every directory the pipeline writes into. Safe to call on every
    /// run; existing directories are left alone.
    pub fn ensure_dirs(&self) -> Result<()> {
        let mut targets: Vec<&std::path::Path> =
            vec![&self.good_dir, &self.bad_dir, &self.media_dir];
        if let Some(parent) = self.processed_file.parent() {
            targets.push(parent);
        }
        if let Some(parent) = self.feed_file.parent() {
            targets.push(parent);
        }
        for dir in targets {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }
        Ok(())
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/insight-echo/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("insight-echo").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - defaults cover every setting
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
