use std::{
    env, fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use mdreflow::FormatterConfig;
use rayon::prelude::*;

#[derive(Parser)]
#[command(about = "Reflow Markdown paragraphs to a character limit")]
struct Cli {
    /// Rewrite files in place
    #[arg(long = "in-place", requires = "files", conflicts_with = "check")]
    in_place: bool,
    /// Exit with an error if any file would change, without writing
    #[arg(long = "check", requires = "files")]
    check: bool,
    /// Override the configured character limit
    #[arg(long = "limit")]
    limit: Option<usize>,
    /// Configuration file to use instead of discovering .mdreflow.toml
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Markdown files to format
    files: Vec<PathBuf>,
}

fn load_config(cli: &Cli) -> anyhow::Result<FormatterConfig> {
    let mut config = match &cli.config {
        Some(path) => FormatterConfig::from_file(path)?,
        None => FormatterConfig::discover(&env::current_dir()?)?
            .map(|(_, config)| config)
            .unwrap_or_default(),
    };
    if let Some(limit) = cli.limit {
        config.character_limit = limit;
    }
    Ok(config)
}

fn read_and_format(path: &Path, config: &FormatterConfig) -> anyhow::Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    mdreflow::format(&text, config).with_context(|| format!("failed to format {}", path.display()))
}

/// Entry point for the command-line formatter.
///
/// With no files, reads a document from standard input and prints the
/// formatted result. With files, formats each one (in parallel) and either
/// prints the results in order, rewrites the files in place (`--in-place`),
/// or reports which ones would change (`--check`).
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.files.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        print!("{}", mdreflow::format(&input, &config)?);
        return Ok(());
    }

    if cli.in_place {
        cli.files
            .par_iter()
            .map(|path| {
                mdreflow::rewrite_with(path, &config)
                    .with_context(|| format!("failed to rewrite {}", path.display()))
            })
            .collect::<anyhow::Result<()>>()?;
        return Ok(());
    }

    if cli.check {
        let unformatted: usize = cli
            .files
            .par_iter()
            .map(|path| {
                let formatted = mdreflow::is_formatted(path, &config)
                    .with_context(|| format!("failed to check {}", path.display()))?;
                if formatted {
                    Ok(0)
                } else {
                    eprintln!("{}: not formatted", path.display());
                    Ok(1)
                }
            })
            .collect::<anyhow::Result<Vec<usize>>>()?
            .into_iter()
            .sum();
        anyhow::ensure!(unformatted == 0, "{unformatted} file(s) would be reformatted");
        return Ok(());
    }

    let outputs = cli
        .files
        .par_iter()
        .map(|path| read_and_format(path, &config))
        .collect::<anyhow::Result<Vec<String>>>()?;
    for output in outputs {
        print!("{output}");
    }

    Ok(())
}
