//! Quick reachability check for the two local services the pipeline depends
//! on: the Ollama generation endpoint and the TTS server.

use anyhow::Result;
use shared::{Config, ScriptGenerator};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    println!("Generation endpoint: {}", config.ollama_url);
    match ScriptGenerator::new(&config)
        .generate("Reply with the single word: ready")
        .await
    {
        Ok(reply) => {
            let preview: String = reply.trim().chars().take(60).collect();
            println!("  ✓ model {} answered: {}", config.ollama_model, preview);
        }
        Err(e) => println!("  ✗ {}", e),
    }

    println!("TTS server: {}", config.tts_url);
    let client = reqwest::Client::new();
    let request = client
        .get(&config.tts_url)
        .query(&[
            ("text", "Insight Echo check."),
            ("speaker_id", "Gracie Wise"),
            ("language_id", "en"),
        ])
        .send()
        .await;
    match request {
        Ok(response) if response.status().is_success() => {
            let bytes = response.bytes().await?;
            println!("  ✓ returned {} bytes of audio", bytes.len());
        }
        Ok(response) => println!("  ✗ returned {}", response.status()),
        Err(e) => println!("  ✗ {}", e),
    }

    Ok(())
}
