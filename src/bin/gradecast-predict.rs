//! Headless prediction for a single roll number.

use std::path::PathBuf;
use std::sync::Arc;

use gradecast::config::{self, AppConfig};
use gradecast::dataset::load_dataset;
use gradecast::logging::{self, ConsoleStream};
use gradecast::ml::artifacts::Artifacts;
use gradecast::pipeline::{PredictionReport, Predictor};

fn main() {
    if let Err(err) = logging::init("gradecast-predict", ConsoleStream::Stderr) {
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
    let artifacts =
        Artifacts::load(&config.paths.model, &config.paths.encoder).map_err(|err| err.to_string())?;
    let predictor = Predictor::new(Arc::new(artifacts), Arc::new(dataset));

    let report = predictor
        .predict_input(&options.id)
        .map_err(|err| err.to_string())?;
    if options.json {
        let text = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{text}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &PredictionReport) {
    let record = &report.record;
    println!("Roll No:        {}", record.roll_no);
    println!("Name:           {}", record.name);
    println!("Hours Studied:  {}", record.hours_studied);
    println!("Sleep Hours:    {}", record.sleep_hours);
    println!("Attendance:     {}%", record.attendance);
    println!("Internet Usage: {}", record.internet_usage);
    println!("Score:          {}", record.score);
    println!();
    println!("Prediction: {}", report.result.text());
    println!("Usage intensity: {}", report.usage_intensity);
    for value in report.study_vs_score.iter().chain(&report.category_mix) {
        println!("  {:<15} {}", value.category, value.value);
    }
}

#[derive(Debug, Default)]
struct CliOptions {
    id: String,
    json: bool,
    config: Option<PathBuf>,
    dataset: Option<PathBuf>,
    model: Option<PathBuf>,
    encoder: Option<PathBuf>,
}

impl CliOptions {
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
        Ok(config)
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut id = None;
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => return Err(help_text()),
            "--json" => {
                options.json = true;
                idx += 1;
                continue;
            }
            _ => {}
        }
        idx += 1;
        let value = args
            .get(idx)
            .ok_or_else(|| format!("{flag} requires a value"))?;
        match flag {
            "--id" => id = Some(value.clone()),
            "--config" => options.config = Some(PathBuf::from(value)),
            "--dataset" => options.dataset = Some(PathBuf::from(value)),
            "--model" => options.model = Some(PathBuf::from(value)),
            "--encoder" => options.encoder = Some(PathBuf::from(value)),
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    options.id = id.ok_or_else(help_text)?;
    Ok(options)
}

fn help_text() -> String {
    [
        "gradecast-predict",
        "",
        "Looks up a student by roll number and prints the predicted PASS/FAIL verdict.",
        "",
        "Usage:",
        "  gradecast-predict --id <roll_no> [options]",
        "",
        "Options:",
        "  --id <roll_no>      Student roll number (required).",
        "  --json              Print the full report as JSON.",
        "  --config <file>     Config file (default: <config dir>/.gradecast/config.toml).",
        "  --dataset <file>    Student CSV (default: online_exam_performance_data.csv).",
        "  --model <file>      Classifier artifact (default: model.json).",
        "  --encoder <file>    Encoder artifact (default: label_encoder.json).",
    ]
    .join("\n")
}
