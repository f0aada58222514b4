#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use json_translate_core::config::{
    default_output_dir, resolve_api_key, resolve_string_with_default, ApiKeys, AppConfig,
    BackendKind, Endpoints, Env, RunConfig, StdEnv, TargetLang, DEFAULT_DEEPL_API_URL,
    DEFAULT_GOOGLE_API_URL, ENV_DEEPL_API_KEY, ENV_DEEPL_API_URL,
};
use json_translate_core::document::to_pretty_json;
use json_translate_core::pipeline::{Pipeline, PipelineConfig};
use json_translate_core::progress::{BarProgress, NoProgress, ProgressReporter};
use json_translate_core::translate::Backends;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json-translate")]
#[command(about = "Translate a flat JSON file of strings with DeepL or Google Translate")]
struct Args {
    /// Path to the JSON file
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// Target language code (e.g. fr, es, de)
    #[arg(short = 'l', long)]
    lang: String,

    /// Use free Google Translate instead of DeepL
    #[arg(long)]
    free: bool,

    /// Output directory for the translated file [default: the source file's directory]
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print the loaded JSON before translating
    #[arg(long)]
    verbose: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// DeepL API key (overrides DEEPL_API_KEY; not needed with --free)
    #[arg(long)]
    deepl_api_key: Option<String>,

    /// DeepL API base URL (use https://api.deepl.com for Pro keys)
    #[arg(long)]
    deepl_url: Option<String>,

    #[arg(long, hide = true, default_value = DEFAULT_GOOGLE_API_URL)]
    google_url: String,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let cfg = build_config(args, &env)?;
    let backend = cfg.run.backend();

    tracing::info!(
        source = %cfg.source.display(),
        target_lang = %cfg.target_lang,
        backend = %backend,
        "config loaded"
    );
    if backend == BackendKind::DeepL && cfg.api_keys.deepl.is_none() {
        tracing::warn!("{ENV_DEEPL_API_KEY} is not set; every DeepL request will fail");
    }

    let backends = Backends::from_config(&cfg.api_keys, &cfg.endpoints)
        .context("failed to build http client")?;
    let progress: Box<dyn ProgressReporter> = if cfg.run.show_progress {
        Box::new(BarProgress::new())
    } else {
        Box::new(NoProgress)
    };

    let pipeline = Pipeline {
        translate: backends.select(backend),
        progress: progress.as_ref(),
        config: PipelineConfig::from_app(&cfg),
    };

    let source = pipeline.load()?;
    if cfg.run.verbose {
        let pretty = to_pretty_json(&source).context("failed to render loaded JSON")?;
        println!("Loaded JSON: {pretty}");
    }
    println!("Target Language: {}", cfg.target_lang);

    let report = pipeline.translate(&source).await;
    let path = pipeline
        .write(&report.document)
        .context("failed to write translated document")?;
    println!("Translation complete! Saved to {}", path.display());

    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let target_lang = TargetLang::new(args.lang)?;
    let deepl = resolve_api_key(args.deepl_api_key, ENV_DEEPL_API_KEY, env)?;
    let output_dir = args
        .output
        .unwrap_or_else(|| default_output_dir(&args.file));

    Ok(AppConfig {
        source: args.file,
        target_lang,
        api_keys: ApiKeys { deepl },
        endpoints: Endpoints {
            deepl: resolve_string_with_default(
                args.deepl_url,
                ENV_DEEPL_API_URL,
                env,
                DEFAULT_DEEPL_API_URL,
            ),
            google: args.google_url,
        },
        run: RunConfig {
            free_mode: args.free,
            output_dir,
            verbose: args.verbose,
            show_progress: !args.no_progress,
        },
    })
}
