use anyhow::{Context, Result};
use chrono::Utc;
use rss::{ChannelBuilder, Enclosure, Guid, Item, ItemBuilder};
use std::fs;
use std::path::Path;

use crate::config::Config;

const EPISODE_DESCRIPTION: &str = "Support on Patreon: https://patreon.com/TechEkta";
const CHANNEL_DESCRIPTION: &str = "Automated daily trend podcast";

/// Filename stem for a headline. Path separators and NUL would otherwise
/// escape the media directory, so they are replaced; everything else is kept
/// verbatim because the feed entry title is recovered from the filename.
pub fn episode_stem(title: &str) -> String {
    title.replace(['/', '\\', '\0'], "-")
}

/// Regenerate the podcast feed from the media directory and write it to
/// `config.feed_file`. Returns the number of episodes listed.
///
/// The feed is always rebuilt from scratch; there is no merge with any
/// previous feed state.
pub fn build_feed(config: &Config) -> Result<usize> {
    let episodes = list_audio_files(&config.media_dir)?;

    let items: Vec<Item> = episodes
        .iter()
        .map(|filename| feed_item(&config.base_url, filename))
        .collect();

    let channel = ChannelBuilder::default()
        .title(config.podcast_title.clone())
        .link(config.base_url.clone())
        .description(CHANNEL_DESCRIPTION.to_string())
        .last_build_date(Utc::now().to_rfc2822())
        .items(items)
        .build();

    let file = fs::File::create(&config.feed_file)
        .with_context(|| format!("Failed to create {}", config.feed_file.display()))?;
    channel
        .pretty_write_to(file, b' ', 2)
        .context("Failed to write feed XML")?;

    Ok(episodes.len())
}

/// MP3 filenames in the media directory, lexicographically sorted.
fn list_audio_files(media_dir: &Path) -> Result<Vec<String>> {
    let mut filenames = Vec::new();

    for entry in fs::read_dir(media_dir)
        .with_context(|| format!("Failed to read {}", media_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("mp3") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            filenames.push(name.to_string());
        }
    }

    filenames.sort_unstable();
    Ok(filenames)
}

fn feed_item(base_url: &str, filename: &str) -> Item {
    let url = format!("{}/{}", base_url, filename);
    let stem = filename.strip_suffix(".mp3").unwrap_or(filename);

    ItemBuilder::default()
        .guid(Guid {
            value: url.clone(),
            permalink: false,
        })
        .title(stem.to_string())
        .description(EPISODE_DESCRIPTION.to_string())
        .enclosure(Enclosure {
            url,
            length: "0".to_string(),
            mime_type: "audio/mpeg".to_string(),
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::load().unwrap();
        config.media_dir = dir.join("media");
        config.feed_file = dir.join("feed.xml");
        config.base_url = "https://example.com/media".to_string();
        config.podcast_title = "Test Podcast".to_string();
        std::fs::create_dir_all(&config.media_dir).unwrap();
        config
    }

    #[test]
    fn stem_replaces_path_separators() {
        assert_eq!(episode_stem("A/B\\C"), "A-B-C");
        assert_eq!(episode_stem("Plain headline"), "Plain headline");
    }

    #[test]
    fn audio_files_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join("c.png"), b"x").unwrap();

        let files = list_audio_files(dir.path()).unwrap();
        assert_eq!(files, vec!["a.mp3", "b.mp3"]);
    }

    #[test]
    fn empty_directory_yields_no_episodes() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let count = build_feed(&config).unwrap();
        assert_eq!(count, 0);

        let file = fs::File::open(&config.feed_file).unwrap();
        let channel = rss::Channel::read_from(BufReader::new(file)).unwrap();
        assert!(channel.items().is_empty());
    }

    #[test]
    fn one_item_per_audio_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        fs::write(config.media_dir.join("Episode One.mp3"), b"x").unwrap();
        fs::write(config.media_dir.join("Episode Two.mp3"), b"x").unwrap();
        fs::write(config.media_dir.join("cover.png"), b"x").unwrap();

        let count = build_feed(&config).unwrap();
        assert_eq!(count, 2);

        let file = fs::File::open(&config.feed_file).unwrap();
        let channel = rss::Channel::read_from(BufReader::new(file)).unwrap();
        assert_eq!(channel.title(), "Test Podcast");
        assert_eq!(channel.items().len(), 2);

        let first = &channel.items()[0];
        assert_eq!(first.title(), Some("Episode One"));
        let enclosure = first.enclosure().unwrap();
        assert_eq!(enclosure.url(), "https://example.com/media/Episode One.mp3");
        assert_eq!(enclosure.mime_type(), "audio/mpeg");
        assert_eq!(enclosure.length(), "0");
    }

    #[test]
    fn rebuilding_overwrites_the_previous_feed() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        fs::write(config.media_dir.join("one.mp3"), b"x").unwrap();

        build_feed(&config).unwrap();
        fs::write(config.media_dir.join("two.mp3"), b"x").unwrap();
        let count = build_feed(&config).unwrap();
        assert_eq!(count, 2);

        let file = fs::File::open(&config.feed_file).unwrap();
        let channel = rss::Channel::read_from(BufReader::new(file)).unwrap();
        assert_eq!(channel.items().len(), 2);
    }
}
