use anyhow::{Context, Result};
use std::process::Command;

/// Run one git subcommand to completion. Returns an error on spawn failure or
/// nonzero exit; the caller decides whether that is fatal (for this pipeline
/// it never is).
pub fn run_git(args: &[&str]) -> Result<()> {
    let status = Command::new("git")
        .args(args)
        .status()
        .with_context(|| format!("Failed to launch git {}", args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("git {} exited with {}", args.join(" "), status);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_subcommand_is_an_error() {
        // "git definitely-not-a-subcommand" exits nonzero without touching
        // the working tree
        let result = run_git(&["definitely-not-a-subcommand"]);
        assert!(result.is_err());
    }
}
