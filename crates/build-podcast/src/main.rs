use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    classify, git, select_cover_subject, Config, EpisodeResult, HeadlineCollector, ProcessedSet,
    ScriptGenerator, Synthesizer, Verdict,
};
use shared::{cover, episode_stem, feed};
use std::fs;

#[derive(Parser)]
#[command(name = "build-podcast")]
#[command(about = "Collect headlines, draft scripts, synthesize audio, and publish the feed")]
struct Args {
    /// Skip the git pull/add/commit/push steps (useful for local runs)
    #[arg(long)]
    skip_git: bool,

    /// Override the maximum number of headlines to process this run
    #[arg(long)]
    max_candidates: Option<usize>,
}

fn git_step(args: &[&str]) {
    if let Err(e) = git::run_git(args) {
        eprintln!("Warning: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load()?;
    if let Some(max) = args.max_candidates {
        config.max_candidates = max;
    }

    if !args.skip_git {
        git_step(&["pull"]);
    }

    config.ensure_dirs()?;
    let mut processed = ProcessedSet::load(&config.processed_file)?;

    println!("📰 Collecting headlines...");
    let collector = HeadlineCollector::new(&config)?;
    let headlines = collector.collect(&processed).await;
    println!(
        "✓ Found {} new headline{}",
        headlines.len(),
        if headlines.len() == 1 { "" } else { "s" }
    );

    let generator = ScriptGenerator::new(&config);
    let synthesizer = Synthesizer::new(&config)?;
    let mut results: Vec<EpisodeResult> = Vec::new();

    for title in &headlines {
        println!("\n🎙 {}", title);
        let stem = episode_stem(title);

        let script = generator
            .generate_script(title)
            .await
            .with_context(|| format!("Script generation failed for \"{}\"", title))?;

        let audio_path = config.media_dir.join(format!("{}.mp3", stem));
        let report = synthesizer
            .synthesize(&script, &audio_path)
            .await
            .with_context(|| format!("Audio synthesis failed for \"{}\"", title))?;

        let verdict = classify(
            report.word_count,
            report.duration_seconds,
            config.min_words,
            config.min_duration_secs,
        );
        let text_dir = match verdict {
            Verdict::Good => &config.good_dir,
            Verdict::Bad => &config.bad_dir,
        };
        let script_path = text_dir.join(format!("{}.txt", stem));
        fs::write(&script_path, &script)
            .with_context(|| format!("Failed to write {}", script_path.display()))?;

        println!(
            "  {} words, {:.0}s → {:?}",
            report.word_count, report.duration_seconds, verdict
        );

        results.push(EpisodeResult {
            title: title.clone(),
            word_count: report.word_count,
            duration_seconds: report.duration_seconds,
        });
        processed.insert(title.clone());
    }

    if let Some(best) = select_cover_subject(&results, config.min_words, config.min_duration_secs)
    {
        println!("\n🎨 Rendering cover art for \"{}\"", best.title);
        let cover_path = config
            .media_dir
            .join(format!("{}.png", episode_stem(&best.title)));
        cover::render_cover(&best.title, &config.cover_font, &cover_path)?;
    }

    println!("\n📡 Rebuilding feed...");
    let episode_count = feed::build_feed(&config)?;
    println!("✓ Feed lists {} episodes", episode_count);

    processed.save(&config.processed_file)?;

    if !args.skip_git {
        let message = format!("Auto-publish batch: {}", headlines.join(", "));
        git_step(&["add", "."]);
        git_step(&["commit", "-m", &message]);
        git_step(&["push"]);
    }

    println!(
        "\n✅ Done. Processed {} headline{}.",
        headlines.len(),
        if headlines.len() == 1 { "" } else { "s" }
    );

    Ok(())
}
