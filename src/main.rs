use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use geo_tracker::application::services::{BootstrapService, PromptService, RunService};
use geo_tracker::application::signals::extract_signals;
use geo_tracker::domain::entities::{BootstrapRequest, ProviderKind, RunTarget, SettingsUpdate};
use geo_tracker::domain::traits::Store;
use geo_tracker::infrastructure::config::Config;
use geo_tracker::infrastructure::database::SqliteStore;
use geo_tracker::infrastructure::llm::HttpProviderFactory;
use geo_tracker::infrastructure::webcrawler::HttpFetcher;

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "geo-tracker")]
#[command(about = "Track how AI assistants mention and cite a website", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Database path (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a website and seed a prompt collection from it
    Bootstrap {
        domain: String,
        /// Number of prompts (10-40, default 30)
        #[arg(short = 'n', long)]
        count: Option<i64>,
    },
    /// Extract visibility signals from a response (stdin unless --file)
    Signals {
        domain: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Send a stored prompt to provider models
    Run {
        prompt_id: i64,
        /// provider:model, repeatable
        #[arg(short, long = "target", required = true)]
        targets: Vec<RunTarget>,
    },
    /// Show recent runs
    Runs,
    /// Manage the prompt library
    Prompts {
        #[command(subcommand)]
        action: PromptAction,
    },
    /// Manage prompt collections
    Collections {
        #[command(subcommand)]
        action: CollectionAction,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// List providers and their models
    Providers,
    /// Check an API key against a provider
    TestProvider { provider: ProviderKind, api_key: String },
    /// Draft one prompt about a topic
    Generate {
        topic: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Generate default config
    InitConfig,
    /// Show version
    Version,
}

#[derive(Subcommand)]
enum PromptAction {
    List {
        #[arg(short, long)]
        limit: Option<i64>,
    },
    Add {
        name: String,
        content: String,
        #[arg(long)]
        category: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum CollectionAction {
    List,
    Create {
        name: String,
        #[arg(long = "prompt")]
        prompt_ids: Vec<i64>,
    },
    /// Replace the prompts of a collection
    Set {
        id: i64,
        #[arg(long = "prompt")]
        prompt_ids: Vec<i64>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print settings with keys masked
    Show,
    /// Update settings; an empty key clears it
    Set {
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        openai_key: Option<String>,
        #[arg(long)]
        anthropic_key: Option<String>,
        #[arg(long)]
        perplexity_key: Option<String>,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("geo-tracker v{}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Commands::InitConfig => {
            if let Err(e) = init_config() {
                tracing::error!("Failed to render config: {}", e);
                std::process::exit(1);
            }
            return;
        }
        _ => {}
    }

    let mut config = load_config(&cli.config);
    if let Some(db) = cli.db {
        config.database.path = db;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(execute(cli.command, config)) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str) -> Config {
    if std::path::Path::new(path).exists() {
        match Config::load(path) {
            Ok(config) => config.with_env(),
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Config::load_env()
            }
        }
    } else {
        Config::load_env()
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn execute(command: Commands, config: Config) -> CliResult {
    match command {
        // Neither needs storage
        Commands::Signals { domain, file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            print_json(&extract_signals(&text, &domain))
        }
        Commands::Providers => {
            for kind in ProviderKind::ALL {
                println!("{} ({})", kind.display_name(), kind);
                for model in kind.models() {
                    println!("  {}", model);
                }
            }
            Ok(())
        }
        command => execute_with_store(command, config).await,
    }
}

async fn execute_with_store(command: Commands, config: Config) -> CliResult {
    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(&config.database.path)?);
    tracing::info!("Database ready at {}", config.database.path.display());
    let providers = Arc::new(HttpProviderFactory);

    match command {
        Commands::Bootstrap { domain, count } => {
            let fetcher = Arc::new(HttpFetcher::new(&config.crawler)?);
            let service = BootstrapService::new(store, fetcher, providers, config);
            let request = BootstrapRequest { domain: Some(domain), count };
            match service.bootstrap(&request).await {
                Ok(report) => print_json(&report)?,
                Err(e) => {
                    tracing::error!("Bootstrap failed ({}): {}", e.status_code(), e);
                    return Err(e.reason().into());
                }
            }
        }
        Commands::Run { prompt_id, targets } => {
            let service = RunService::new(store, providers, config.llm);
            print_json(&service.execute_run(prompt_id, &targets).await?)?;
        }
        Commands::Runs => {
            let service = RunService::new(store, providers, config.llm);
            print_json(&service.list_runs().await?)?;
        }
        Commands::TestProvider { provider, api_key } => {
            let service = RunService::new(store, providers, config.llm);
            let success = service.test_provider(provider, &api_key).await?;
            print_json(&serde_json::json!({ "success": success, "provider": provider }))?;
        }
        Commands::Prompts { action } => {
            let service = PromptService::new(store, providers, config.llm);
            match action {
                PromptAction::List { limit } => print_json(&service.list_prompts(limit).await?)?,
                PromptAction::Add { name, content, category } => {
                    print_json(&service.create_prompt(&name, &content, category.as_deref()).await?)?
                }
                PromptAction::Delete { id } => {
                    service.delete_prompt(id).await?;
                    println!("Deleted prompt {}", id);
                }
            }
        }
        Commands::Collections { action } => {
            let service = PromptService::new(store, providers, config.llm);
            match action {
                CollectionAction::List => print_json(&service.list_collections().await?)?,
                CollectionAction::Create { name, prompt_ids } => {
                    print_json(&service.create_collection(&name, &prompt_ids).await?)?
                }
                CollectionAction::Set { id, prompt_ids } => {
                    service.set_collection_prompts(id, &prompt_ids).await?;
                    println!("Updated collection {}", id);
                }
                CollectionAction::Delete { id } => {
                    service.delete_collection(id).await?;
                    println!("Deleted collection {}", id);
                }
            }
        }
        Commands::Generate { topic, category } => {
            let service = PromptService::new(store, providers, config.llm);
            println!("{}", service.generate_prompt(&topic, category.as_deref()).await?);
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => print_json(&store.get_settings().await?.masked())?,
            SettingsAction::Set {
                domain,
                openai_key,
                anthropic_key,
                perplexity_key,
            } => {
                let update = SettingsUpdate {
                    tracked_domain: domain,
                    openai_api_key: openai_key,
                    anthropic_api_key: anthropic_key,
                    perplexity_api_key: perplexity_key,
                };
                store.update_settings(&update).await?;
                print_json(&store.get_settings().await?.masked())?;
            }
        },
        Commands::Signals { .. } | Commands::Providers | Commands::InitConfig | Commands::Version => {}
    }

    Ok(())
}

fn init_config() -> Result<(), serde_yaml::Error> {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
