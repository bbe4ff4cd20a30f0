//! Train the internet-usage encoder and the random forest from the student CSV.

use std::path::PathBuf;

use gradecast::config::{self, AppConfig};
use gradecast::dataset::{Outcome, load_dataset};
use gradecast::logging::{self, ConsoleStream};
use gradecast::ml::metrics::Evaluation;
use gradecast::training::{TrainingRun, train};

fn main() {
    if let Err(err) = logging::init("gradecast-train", ConsoleStream::Stdout) {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let config = options.resolve_config()?;

    let dataset = load_dataset(&config.paths.dataset).map_err(|err| err.to_string())?;
    let run = train(&dataset, &config.training).map_err(|err| err.to_string())?;
    run.artifacts
        .save(&config.paths.model, &config.paths.encoder)
        .map_err(|err| err.to_string())?;

    print_summary(&run, &config);
    Ok(())
}

fn print_summary(run: &TrainingRun, config: &AppConfig) {
    println!(
        "trained {} trees on {} rows ({} held out)",
        run.artifacts.model.trees.len(),
        run.train_rows,
        run.test_rows
    );
    println!("categories: {}", run.artifacts.encoder.classes().join(", "));
    println!("model:   {}", config.paths.model.display());
    println!("encoder: {}", config.paths.encoder.display());
    match &run.evaluation {
        Some(evaluation) => print_evaluation(evaluation),
        None => println!("no held-out rows; evaluation skipped"),
    }
}

fn print_evaluation(evaluation: &Evaluation) {
    println!("test accuracy: {:.4}", evaluation.accuracy);
    for (idx, stats) in evaluation.per_class.iter().enumerate() {
        println!(
            "class {} {:<5}  precision={:.3}  recall={:.3}  support={}",
            idx,
            Outcome::CLASS_NAMES[idx],
            stats.precision,
            stats.recall,
            stats.support
        );
    }
    let cm = &evaluation.confusion;
    println!("confusion matrix (rows=true, cols=pred):");
    for truth in 0..cm.n_classes {
        let mut row = String::new();
        for pred in 0..cm.n_classes {
            row.push_str(&format!("{:6}", cm.get(truth, pred)));
        }
        println!("{row}");
    }
}

#[derive(Debug, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    dataset: Option<PathBuf>,
    model: Option<PathBuf>,
    encoder: Option<PathBuf>,
    seed: Option<u64>,
    trees: Option<usize>,
    max_depth: Option<usize>,
    test_fraction: Option<f32>,
}

impl CliOptions {
    /// Config file values with command-line flags layered on top.
    fn resolve_config(&self) -> Result<AppConfig, String> {
        let mut config = match &self.config {
            Some(path) => config::load_from(path),
            None => config::load_or_default(),
        }
        .map_err(|err| err.to_string())?;
        if let Some(path) = &self.dataset {
            config.paths.dataset = path.clone();
        }
        if let Some(path) = &self.model {
            config.paths.model = path.clone();
        }
        if let Some(path) = &self.encoder {
            config.paths.encoder = path.clone();
        }
        let training = &mut config.training;
        if let Some(seed) = self.seed {
            training.seed = seed;
        }
        if let Some(trees) = self.trees {
            training.trees = trees;
        }
        if self.max_depth.is_some() {
            training.max_depth = self.max_depth;
        }
        if let Some(fraction) = self.test_fraction {
            training.test_fraction = fraction;
        }
        config.training = config.training.normalized();
        Ok(config)
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        if matches!(flag, "-h" | "--help") {
            return Err(help_text());
        }
        idx += 1;
        let value = args
            .get(idx)
            .ok_or_else(|| format!("{flag} requires a value"))?;
        match flag {
            "--config" => options.config = Some(PathBuf::from(value)),
            "--dataset" => options.dataset = Some(PathBuf::from(value)),
            "--model" => options.model = Some(PathBuf::from(value)),
            "--encoder" => options.encoder = Some(PathBuf::from(value)),
            "--seed" => options.seed = Some(parse_value(flag, value)?),
            "--trees" => options.trees = Some(parse_value(flag, value)?),
            "--max-depth" => options.max_depth = Some(parse_value(flag, value)?),
            "--test-fraction" => options.test_fraction = Some(parse_value(flag, value)?),
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(options)
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid {flag} value: {value}"))
}

fn help_text() -> String {
    [
        "gradecast-train",
        "",
        "Fits the Internet_Usage encoder and a class-balanced random forest,",
        "then writes both artifacts and prints a held-out evaluation.",
        "",
        "Usage:",
        "  gradecast-train [options]",
        "",
        "Options:",
        "  --config <file>          Config file (default: <config dir>/.gradecast/config.toml).",
        "  --dataset <file>         Student CSV (default: online_exam_performance_data.csv).",
        "  --model <file>           Classifier output path (default: model.json).",
        "  --encoder <file>         Encoder output path (default: label_encoder.json).",
        "  --seed <n>               Split and forest seed (default: 42).",
        "  --trees <n>              Number of trees (default: 100).",
        "  --max-depth <n>          Maximum tree depth (default: unlimited).",
        "  --test-fraction <f32>    Held-out share, clamped to 0.05..0.5 (default: 0.2).",
    ]
    .join("\n")
}
