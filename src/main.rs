use std::env;
use std::path::Path;

use pantry_chef::{Analyzer, AnalyzerConfig};

const USAGE: &str = "Usage: pantry-chef [--image <path>] [--text <description>] \
[--dataset <csv>] [--match <n>] [--generate <n>] [--prefs <text>]";

fn flag_value(args: &[String], i: usize, flag: &str) -> Result<String, String> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| format!("{} requires a value\n{}", flag, USAGE))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut image: Option<String> = None;
    let mut text: Option<String> = None;
    let mut dataset: Option<String> = None;
    let mut match_n: Option<usize> = None;
    let mut generate_n: Option<usize> = None;
    let mut prefs: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--image" => image = Some(flag_value(&args, i, "--image")?),
            "--text" => text = Some(flag_value(&args, i, "--text")?),
            "--dataset" => dataset = Some(flag_value(&args, i, "--dataset")?),
            "--match" => match_n = Some(flag_value(&args, i, "--match")?.parse()?),
            "--generate" => generate_n = Some(flag_value(&args, i, "--generate")?.parse()?),
            "--prefs" => prefs = Some(flag_value(&args, i, "--prefs")?),
            other => return Err(format!("Unknown argument: {}\n{}", other, USAGE).into()),
        }
        i += 2;
    }

    if image.is_none() && text.is_none() {
        return Err(format!("Please provide --image or --text\n{}", USAGE).into());
    }

    let config = AnalyzerConfig::load()?;
    let mut analyzer = Analyzer::from_config(config)?;

    if let Some(csv_path) = &dataset {
        let count = analyzer.load_dataset(Path::new(csv_path))?;
        eprintln!("Loaded {} recipes", count);
    }

    let analysis = analyzer.analyze(image.as_deref(), text.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);

    if let Some(top_n) = match_n {
        let recipes = analyzer.matching_recipes(top_n).await?;
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    }

    if let Some(count) = generate_n {
        let recipes = analyzer.generate_recipes(count, prefs.as_deref()).await?;
        println!("{}", serde_json::to_string_pretty(&recipes)?);
    }

    Ok(())
}
