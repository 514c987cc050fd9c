use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::{LevelFilter, debug, error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use chanbench_analyzer::analyzer::{LogLoader, MissingEventPolicy, aggregate, index_tasks};
use chanbench_analyzer::config::AnalysisConfig;
use chanbench_analyzer::report::{JsonChartWriter, render_question};

/// Latency analysis for user/kernel channel benchmark logs
#[derive(Debug, Parser)]
#[command(name = "chanbench-analyzer")]
#[command(about = "Pair benchmark events and export per-message latency series", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Benchmark log to analyze (overrides `log-path`)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Output directory for chart data (overrides `output-dir`)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Number of messages per run to analyze (overrides `max-ticks`)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Question to run; repeat for several (overrides `questions`)
    #[arg(short, long = "question", value_name = "NAME")]
    questions: Vec<String>,

    /// Leave out tasks with missing events instead of failing
    #[arg(long)]
    skip_missing: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(log) = self.log {
            config.log_path = log;
        }
        if let Some(out) = self.out {
            config.output_dir = out;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if !self.questions.is_empty() {
            config.questions = self.questions;
        }
        if self.skip_missing {
            config.on_missing = MissingEventPolicy::Skip;
        }
        Ok(config)
    }
}

fn run(config: &AnalysisConfig) -> Result<()> {
    let questions = config.resolve_questions()?;

    let loader = LogLoader::open(&config.log_path)?;
    let tasks = loader
        .tasks(config.max_ticks)
        .with_context(|| format!("Failed to parse {}", loader.path().display()))?;
    for task in &tasks {
        debug!(
            "`{}` [{}]: {} event(s), bytes {:?}, sync {:?}",
            task.label(),
            task.header.fields.join(" "),
            task.events.len(),
            task.summary.as_ref().and_then(|s| s.bytes_transferred()),
            task.summary.as_ref().and_then(|s| s.synchronized())
        );
    }
    let tasks = index_tasks(tasks)?;
    info!("{} task(s), {} question(s), max ticks {}", tasks.len(), questions.len(), config.max_ticks);

    let mut writer = JsonChartWriter::new(&config.output_dir)?;
    for question in &questions {
        let series = aggregate(question, &tasks, config.max_ticks, config.on_missing)
            .with_context(|| format!("Question `{}` failed", question.name))?;
        let written = render_question(&mut writer, &series, &question.ranges)?;
        info!("{}: wrote {} chart(s)", question.name, written.len());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let crate_level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("chanbench_analyzer"), crate_level)
        .parse_default_env()
        .init();

    let result = cli.into_config().and_then(|config| run(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "chanbench-analyzer",
            "--log",
            "other.log",
            "--max-ticks",
            "10",
            "-q",
            "write_copy",
            "--skip-missing",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.log_path, PathBuf::from("other.log"));
        assert_eq!(config.max_ticks, 10);
        assert_eq!(config.questions, vec!["write_copy"]);
        assert_eq!(config.on_missing, MissingEventPolicy::Skip);
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log");
        fs::write(
            &log_path,
            "@fsrw_atomic_cstmsg[512B*8] 512 8\n1024 true\n\
             WriteStart kernel 0 100\nWriteEnd kernel 0 300\n\
             WriteStart kernel 1 400\nWriteEnd kernel 1 450\n\
             WriteStart kernel 2 900\nWriteEnd kernel 2 950\n",
        )
        .unwrap();

        let config = AnalysisConfig {
            log_path,
            output_dir: dir.path().join("pic"),
            max_ticks: 2,
            questions: vec!["write_copy".to_string()],
            ..AnalysisConfig::default()
        };
        run(&config).unwrap();

        let chart = fs::read_to_string(dir.path().join("pic").join("write_copy_0.json")).unwrap();
        let chart: serde_json::Value = serde_json::from_str(&chart).unwrap();
        assert_eq!(chart["series"][0]["values"], serde_json::json!([200, 50]));
        assert!(dir.path().join("pic").join("write_copy_2.json").exists());
    }

    #[test]
    fn test_run_fails_on_incomplete_log() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("log");
        fs::write(&log_path, "@mmap[4k*8] 4096 8\n4096 true\nWriteStart kernel 0 1\n").unwrap();

        let config = AnalysisConfig {
            log_path,
            output_dir: dir.path().join("pic"),
            max_ticks: 1,
            questions: vec!["write_copy".to_string()],
            ..AnalysisConfig::default()
        };
        let err = run(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("WriteEnd"));
    }
}
