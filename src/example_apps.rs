use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::config::{CaptionDatasetConfig, FormatErrorPolicy};
use crate::constants::dataset::{DEFAULT_MAX_PLAYERS, DEFAULT_SEED};
use crate::dataset::CaptionDataset;
use crate::splits::{SplitLabel, SplitRatios};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SplitArg {
    Train,
    Validation,
    Test,
}

impl From<SplitArg> for SplitLabel {
    fn from(value: SplitArg) -> Self {
        match value {
            SplitArg::Train => SplitLabel::Train,
            SplitArg::Validation => SplitLabel::Validation,
            SplitArg::Test => SplitLabel::Test,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "inspect_dataset",
    disable_help_subcommand = true,
    about = "Build a caption dataset split and print its entries",
    long_about = "Pair images with annotation documents, split them deterministically, and print the serialized captions of the selected split."
)]
/// CLI for `inspect_dataset`.
///
/// Common usage:
/// - `--images data/images --annotations data/annotations --caption-key emotion --show 3`
/// - Repeat `--caption-key <FIELD>` to request fields in output order
struct InspectDatasetCli {
    #[arg(long, value_name = "DIR", help = "Directory containing .png/.jpg/.jpeg images")]
    images: PathBuf,
    #[arg(
        long,
        value_name = "DIR",
        help = "Directory containing <stem>.json annotation documents"
    )]
    annotations: PathBuf,
    #[arg(long, value_enum, default_value = "train", help = "Split to inspect")]
    split: SplitArg,
    #[arg(
        long = "caption-key",
        value_name = "FIELD",
        help = "Caption field to include, repeat as needed in output order"
    )]
    caption_keys: Vec<String>,
    #[arg(
        long = "max-players",
        default_value_t = DEFAULT_MAX_PLAYERS,
        help = "Characters kept per document"
    )]
    max_players: usize,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "Deterministic seed used for split allocation")]
    seed: u64,
    #[arg(
        long = "split-ratios",
        value_name = "TRAIN,VALIDATION,TEST",
        value_parser = parse_split_ratios_arg,
        default_value = "0.8,0.1,0.1",
        help = "Comma-separated split ratios that must sum to 1.0"
    )]
    split_ratios: SplitRatios,
    #[arg(long, help = "Print the literal structure instead of token strings")]
    literal: bool,
    #[arg(long, help = "Fail on malformed hashtags, ranking scores, or coordinates")]
    strict: bool,
    #[arg(long = "no-follow-links", help = "Skip symlinked images instead of following them")]
    no_follow_links: bool,
    #[arg(long = "task-prompt", help = "Task prompt passed through to the dataset")]
    task_prompt: Option<String>,
    #[arg(
        long,
        default_value_t = 5,
        help = "Number of entries to print (0 prints only the summary)"
    )]
    show: usize,
}

/// Build the requested split and print a summary plus the first entries.
pub fn run_inspect_dataset<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<InspectDatasetCli, _>(
        std::iter::once("inspect_dataset".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let mut config = CaptionDatasetConfig::new(cli.images, cli.annotations)
        .with_split(cli.split.into())
        .with_caption_keys(cli.caption_keys)
        .with_max_players(cli.max_players)
        .with_convert_to_tokens(!cli.literal)
        .with_split_ratios(cli.split_ratios)
        .with_seed(cli.seed)
        .with_follow_links(!cli.no_follow_links);
    if cli.strict {
        config = config.with_format_error_policy(FormatErrorPolicy::Abort);
    }
    if let Some(prompt) = cli.task_prompt {
        config = config.with_task_prompt(prompt);
    }

    let dataset = CaptionDataset::new(config)?;
    println!("=== caption dataset ===");
    println!("split: {}", dataset.split());
    println!("split seed: {}", cli.seed);
    println!(
        "split ratios: train={:.4}, validation={:.4}, test={:.4}",
        cli.split_ratios.train, cli.split_ratios.validation, cli.split_ratios.test
    );
    if let Some(prompt) = dataset.task_prompt() {
        println!("task prompt: {prompt}");
    }
    println!("entries: {}", dataset.len());
    println!();

    for (idx, entry) in dataset.entries().iter().take(cli.show).enumerate() {
        println!("[{idx}] {}", entry.image_path.display());
        println!("    {}", entry.caption);
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_split_ratios_arg(raw: &str) -> Result<SplitRatios, String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err("--split-ratios expects exactly 3 comma-separated values".to_string());
    }
    let parse = |name: &str, part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid {name} ratio '{}': must be a float", part.trim()))
    };
    let ratios = SplitRatios::new(
        parse("train", parts[0])?,
        parse("validation", parts[1])?,
        parse("test", parts[2])?,
    );
    ratios.normalized().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn split_ratio_argument_is_validated() {
        let ratios = parse_split_ratios_arg("0.7, 0.2, 0.1").unwrap();
        assert_eq!(ratios, SplitRatios::new(0.7, 0.2, 0.1));
        assert!(parse_split_ratios_arg("0.7,0.3").is_err());
        assert!(parse_split_ratios_arg("0.7,x,0.1").is_err());
        assert!(parse_split_ratios_arg("0.7,0.7,0.1").is_err());
    }

    #[test]
    fn cli_parses_repeated_caption_keys() {
        let cli = InspectDatasetCli::try_parse_from([
            "inspect_dataset",
            "--images",
            "imgs",
            "--annotations",
            "anns",
            "--caption-key",
            "emotion",
            "--caption-key",
            "pose",
            "--split",
            "validation",
        ])
        .unwrap();
        assert_eq!(cli.caption_keys, vec!["emotion", "pose"]);
        assert!(matches!(cli.split, SplitArg::Validation));
        assert_eq!(cli.max_players, 10);
        assert_eq!(cli.seed, 42);
        assert!(!cli.no_follow_links);
    }

    #[test]
    fn runner_builds_dataset_and_handles_help() {
        let images = tempdir().unwrap();
        let annotations = tempdir().unwrap();
        fs::write(images.path().join("a.png"), b"a").unwrap();
        fs::write(annotations.path().join("a.json"), r#"{"characters": []}"#).unwrap();
        let args = vec![
            "--images".to_string(),
            images.path().display().to_string(),
            "--annotations".to_string(),
            annotations.path().display().to_string(),
            "--split-ratios".to_string(),
            "1.0,0.0,0.0".to_string(),
        ];
        run_inspect_dataset(args.into_iter()).unwrap();
        run_inspect_dataset(vec!["--help".to_string()].into_iter()).unwrap();
    }
}
