use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Config;
use crate::processed::ProcessedSet;

/// Pulls candidate headlines from the configured RSS sources, skipping
/// anything already processed. Each source contributes at most one headline
/// per run.
pub struct HeadlineCollector {
    client: Client,
    sources: Vec<String>,
    max_candidates: usize,
}

impl HeadlineCollector {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            sources: config.rss_sources.clone(),
            max_candidates: config.max_candidates,
        })
    }

    /// Collect up to `max_candidates` fresh headlines, in source order. A feed
    /// that cannot be fetched or parsed contributes nothing and only a
    /// warning.
    pub async fn collect(&self, processed: &ProcessedSet) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();

        for url in &self.sources {
            if candidates.len() >= self.max_candidates {
                break;
            }

            match self.fetch_titles(url).await {
                Ok(titles) => {
                    extend_candidates(&mut candidates, &titles, processed, self.max_candidates)
                }
                Err(e) => eprintln!("Warning: skipping feed {}: {}", url, e),
            }
        }

        candidates
    }

    async fn fetch_titles(&self, url: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("feed returned {}", status);
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body of {}", url))?;

        let feed = feed_rs::parser::parse(&bytes[..])
            .with_context(|| format!("Failed to parse feed {}", url))?;

        Ok(feed
            .entries
            .iter()
            .filter_map(|entry| entry.title.as_ref())
            .map(|title| title.content.trim().to_string())
            .collect())
    }
}

/// Add this feed's contribution: the first title that is non-empty, not yet
/// processed, and not already chosen this run. Does nothing once `max`
/// candidates are held.
fn extend_candidates(
    candidates: &mut Vec<String>,
    titles: &[String],
    processed: &ProcessedSet,
    max: usize,
) {
    if candidates.len() >= max {
        return;
    }

    let fresh = titles.iter().find(|title| {
        !title.is_empty() && !processed.contains(title) && !candidates.contains(title)
    });
    if let Some(title) = fresh {
        candidates.push(title.clone());
    }
}
