// Public modules
pub mod classify;
pub mod config;
pub mod cover;
pub mod feed;
pub mod generator;
pub mod git;
pub mod headlines;
pub mod processed;
pub mod synth;

// Re-export commonly used types
pub use classify::{classify, select_cover_subject, EpisodeResult, Verdict};
pub use config::Config;
pub use feed::{build_feed, episode_stem};
pub use generator::ScriptGenerator;
pub use headlines::HeadlineCollector;
pub use processed::ProcessedSet;
pub use synth::{Synthesizer, SynthesisReport};
