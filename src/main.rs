use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wowsgen::error::IResult;
use wowsgen::game_params::RawGraph;
use wowsgen::unpack::Generator;
use wowsgen::unpack::registry::{LangTable, LangTables, SUPPORTED_LOCALES};

/// Normalizes a decoded GameParams dump into the app's JSON data set
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the decoded GameParams JSON file
    #[clap(long, default_value = "GameParams-0.json")]
    game_params: PathBuf,

    /// Directory containing <locale>_lang.json files
    #[clap(long, default_value = "langs")]
    langs: PathBuf,

    /// Directory the output artifacts are written to
    #[clap(short, long, default_value = ".")]
    out: PathBuf,
}

fn load_langs(dir: &PathBuf) -> IResult<LangTables> {
    let mut tables = std::collections::BTreeMap::new();
    for locale in SUPPORTED_LOCALES {
        let path = dir.join(format!("{locale}_lang.json"));
        if !path.exists() {
            warn!(locale, "language file not found, skipping");
            continue;
        }
        info!(locale, "reading language table");
        let table: LangTable = serde_json::from_str(&fs::read_to_string(&path)?)?;
        tables.insert(locale.to_string(), table);
    }
    LangTables::new(tables)
}

fn run(args: Args) -> IResult<()> {
    info!(path = %args.game_params.display(), "reading game params");
    let graph = RawGraph::from_value(serde_json::from_str(&fs::read_to_string(
        &args.game_params,
    )?)?)?;
    info!(params = graph.len(), "loaded game params");

    let langs = load_langs(&args.langs)?;

    let data = Generator::new(&graph, &langs).generate()?;

    fs::create_dir_all(&args.out)?;
    for (file_name, json) in data.artifacts()? {
        let path = args.out.join(file_name);
        info!(path = %path.display(), bytes = json.len(), "writing artifact");
        fs::write(path, json)?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {}", err.kind);
        std::process::exit(1);
    }
}
