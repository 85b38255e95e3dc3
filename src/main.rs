//! `Carousel` - populate carousel templates in a scene file.
//!
//! Usage:
//!   `carousel process <scene.json> <request.json> [--out <file>]`
//!   `carousel format <scene.json> --select <name>... [--out <file>]`
//!   `carousel relay <scene.json> [--manual] [--out <file>]`
//!
//! The scene is rewritten in place unless `--out` is given.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use carousel::config::Config;
use carousel::pipeline::Pipeline;
use carousel::relay::{CursorStore, RelayClient};
use carousel::scene::{MemoryScene, SceneDocument, SceneGraph};
use carousel::services::HttpFetcher;

const USAGE: &str = "Usage:
  carousel process <scene.json> <request.json> [--out <file>]
  carousel format <scene.json> --select <name>... [--out <file>]
  carousel relay <scene.json> [--manual] [--out <file>]";

/// Parsed command line.
struct Args {
    command: String,
    scene: PathBuf,
    positional: Vec<String>,
    select: Vec<String>,
    out: Option<PathBuf>,
    manual: bool,
}

impl Args {
    fn parse(raw: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut raw = raw.into_iter();
        let Some(command) = raw.next() else { bail!("{USAGE}") };
        let mut scene = None;
        let mut positional = Vec::new();
        let mut select = Vec::new();
        let mut out = None;
        let mut manual = false;

        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--out" | "-o" => {
                    out = Some(PathBuf::from(raw.next().context("--out needs a file")?));
                }
                "--select" | "-s" => select.push(raw.next().context("--select needs a node name")?),
                "--manual" => manual = true,
                "-h" | "--help" => bail!("{USAGE}"),
                _ if scene.is_none() => scene = Some(PathBuf::from(arg)),
                _ => positional.push(arg),
            }
        }

        let scene = scene.with_context(|| format!("missing scene file\n{USAGE}"))?;
        Ok(Self { command, scene, positional, select, out, manual })
    }

    fn output(&self) -> &PathBuf {
        self.out.as_ref().unwrap_or(&self.scene)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = Config::load()?;
    tracing::info!("{} {}", config.app_name(), config.app_version());

    let doc = SceneDocument::load(&args.scene)?;
    let mut scene = MemoryScene::from_document(&doc)?;
    let fetcher = HttpFetcher::new(config.http_timeout);

    match args.command.as_str() {
        "process" => {
            let request = args.positional.first().with_context(|| format!("missing request file\n{USAGE}"))?;
            let json = fs_err::read_to_string(request)?;
            let result = Pipeline::new(&mut scene, &fetcher, config.templates_url.as_str())
                .process_json(&json)
                .await?;
            println!("{}", result.message());
        }
        "format" => {
            if !args.select.is_empty() {
                let ids = args
                    .select
                    .iter()
                    .map(|name| scene.find_by_name(name).with_context(|| format!("no node named \"{name}\"")))
                    .collect::<Result<Vec<_>>>()?;
                scene.select(&ids);
            }
            let report = carousel::pipeline::format_selection(&mut scene).await?;
            println!("{}", report.message());
        }
        "relay" => run_relay(&config, &mut scene, &fetcher, args.manual).await?,
        other => bail!("unknown command \"{other}\"\n{USAGE}"),
    }

    scene.to_document().save(args.output())?;
    tracing::info!("Wrote {}", args.output().display());
    Ok(())
}

async fn run_relay(config: &Config, scene: &mut MemoryScene, fetcher: &HttpFetcher, manual: bool) -> Result<()> {
    if !config.has_relay() {
        bail!("Set RELAY_API_URL and RELAY_WORKSPACE to use the relay");
    }
    let client = RelayClient::new(fetcher.client().clone(), &config.relay_api_url, &config.relay_workspace)?;
    let cursor_path = config
        .cursor_path
        .clone()
        .context("no cursor location; set CURSOR_PATH")?;
    let mut store = CursorStore::open(cursor_path)?;

    let (docs, next) = client.poll(store.get(client.workspace()), manual).await?;
    if docs.is_empty() {
        println!("Nothing new for workspace \"{}\"", client.workspace());
    }

    let mut pipeline = Pipeline::new(scene, fetcher, config.templates_url.as_str());
    for doc in &docs {
        match pipeline.process_json(doc).await {
            Ok(result) => println!("{}", result.message()),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    store.set(client.workspace(), next)?;
    Ok(())
}
