use std::path::PathBuf;

use clap::Parser;
use hylogic::prelude::*;
use termcolor::{ColorChoice, StandardStream};

/// Print the truth table of one or more formulas
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Object language of the formulas
    #[arg(short, long, default_value = Language::SENTENTIAL)]
    pub language: String,

    /// Basic formula, in ascending order (repeatable)
    #[arg(short, long, required = true)]
    pub basic: Vec<String>,

    /// Main formula (repeatable)
    #[arg(short, long)]
    pub main: Vec<String>,

    /// Declared number of rows
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut stdout = stdout.lock();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    };
    let languages = config.and_then(|c| Ok((c.languages()?, c)));
    let (languages, config) = match languages {
        Ok(v) => v,
        Err(e) => {
            Diagnostic::from(&e).write_to(&mut stdout).unwrap();
            std::process::exit(1);
        }
    };
    let language = match languages.get(&args.language) {
        Ok(l) => l,
        Err(e) => {
            Diagnostic::from(&e).write_to(&mut stdout).unwrap();
            std::process::exit(1);
        }
    };

    let mut setup = TruthTableSetup::new(language)
        .with_config(&config)
        .basic(args.basic)
        .main(args.main);
    if let Some(rows) = args.rows {
        setup = setup.rows(rows);
    }

    match setup.build() {
        Ok(table) => table.write_to(&mut stdout).unwrap(),
        Err(e) => {
            Diagnostic::from(&e).write_to(&mut stdout).unwrap();
            std::process::exit(1);
        }
    }
}
