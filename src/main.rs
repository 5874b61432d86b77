//! Aithentica CLI
//!
//! Command-line client for the Aithentica backend:
//! - Sign in, register and sign out
//! - Chat with any catalog provider
//! - Generate images
//! - Inspect the profile and chat history

use aithentica::api::{self, auth, HttpBackend, RegisteredUser};
use aithentica::config::{generate_default_config, Config, LoggingConfig};
use aithentica::dashboard::{self, ChatPanel, ModelSelection, VisionPanel};
use aithentica::forms::{self, LoginForm, RegisterForm};
use aithentica::routes::{resolve, AppRoute, RouteDecision};
use aithentica::session::{FileStore, Session};
use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliSession = Session<HttpBackend, FileStore>;

#[derive(Parser)]
#[command(name = "aithentica")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat and image generation against the Aithentica backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Password again
        #[arg(short, long)]
        confirm: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user and token usage
    Whoami,

    /// Print the chat history, oldest first
    History,

    /// Send a chat message
    Chat {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
        /// Provider (default: from config)
        #[arg(long)]
        provider: Option<String>,
        /// Model (default: the provider's first model)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Generate an image
    Imagine {
        /// Image prompt
        #[arg(required = true)]
        prompt: Vec<String>,
        /// Image model (default: from config)
        #[arg(short, long)]
        model: Option<String>,
        /// Seed (default: random)
        #[arg(short, long)]
        seed: Option<u32>,
    },

    /// List providers and models
    Providers,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    init_tracing(&config.logging);

    match cli.command {
        Commands::Providers => {
            for (provider, models) in dashboard::PROVIDERS {
                println!("{}", provider);
                for model in models.iter() {
                    println!("  {}", model);
                }
            }
            println!("{} (vision)", dashboard::VISION_PROVIDER);
            for model in dashboard::VISION_MODELS {
                println!("  {}", model);
            }
        }

        Commands::Config { output } => {
            let template = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &template)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", template);
                }
            }
        }

        Commands::Register {
            username,
            email,
            password,
            confirm,
        } => {
            let form = RegisterForm {
                username,
                email,
                password,
                password2: confirm,
            };
            let backend = connect(&config)?;
            match register(&backend, &form).await {
                Ok(user) => println!("{}", auth::welcome_message(&user)),
                Err(errors) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{}: {}", field, message);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Login { username, password } => {
            let session = open_session(&config).await?;
            match resolve(AppRoute::Login, session.phase()) {
                RouteDecision::Redirect(_) => bail!("Already logged in. Run `aithentica logout` first."),
                _ => {
                    let request = LoginForm { username, password }
                        .validate()
                        .map_err(|e| anyhow!(e))?;
                    match session.login(&request).await {
                        Ok(user) => println!("Logged in as {}", user.username),
                        Err(e) => bail!(forms::login_error_message(&e)),
                    }
                }
            }
        }

        Commands::Logout => {
            let session = open_session(&config).await?;
            session.logout();
            println!("Logged out");
        }

        Commands::Whoami => {
            let session = signed_in(&config).await?;
            let profile = session
                .profile()
                .context("Could not load the user profile")?;
            println!("{} <{}>", profile.username, profile.email);
            println!(
                "Tokens used: {} (prompt {}, completion {})",
                profile.token_usage.total_tokens,
                profile.token_usage.prompt_tokens,
                profile.token_usage.completion_tokens
            );
        }

        Commands::History => {
            let session = signed_in(&config).await?;
            let transcript = api::chat::load_history(&session).await;
            if transcript.is_empty() {
                println!("{}", dashboard::EMPTY_TRANSCRIPT);
            }
            for message in transcript.messages() {
                println!("> {}", message.user_message);
                println!("{}\n", message.ai_response);
            }
        }

        Commands::Chat {
            message,
            provider,
            model,
        } => {
            let selection = match provider {
                Some(provider) => ModelSelection::new(&provider, model.as_deref())?,
                None => {
                    let mut selection = config.chat_selection()?;
                    if let Some(model) = model.as_deref() {
                        selection.select_model(model)?;
                    }
                    selection
                }
            };

            let session = signed_in(&config).await?;
            let mut chat = ChatPanel::new(Default::default(), selection);
            chat.input = message.join(" ");

            let Some(result) = chat.submit(&session).await else {
                bail!("Nothing to send");
            };
            if let Some(last) = chat.transcript.last() {
                println!("{}", last.ai_response);
            }
            if result.is_err() {
                std::process::exit(1);
            }
        }

        Commands::Imagine {
            prompt,
            model,
            seed,
        } => {
            let mut vision = VisionPanel::default();
            vision.select_model(model.as_deref().unwrap_or(config.vision.model.as_str()))?;
            vision.prompt = prompt.join(" ");

            let session = signed_in(&config).await?;
            match vision.submit(&session, seed).await {
                Some(Ok(url)) => println!("{}", url),
                Some(Err(e)) => bail!("Image generation failed: {}", e),
                None => bail!("Nothing to generate"),
            }
        }
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("aithentica={}", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn connect(config: &Config) -> anyhow::Result<HttpBackend> {
    let cookies = config.session.data_dir().join("cookies");
    let backend = HttpBackend::new(&config.api)?.with_cookie_file(cookies);
    tracing::debug!("Using backend {}", backend.base_url());
    Ok(backend)
}

/// Session after the silent refresh has settled
async fn open_session(config: &Config) -> anyhow::Result<CliSession> {
    let store = FileStore::in_dir(&config.session.data_dir());
    let session = Session::new(connect(config)?, store);
    session.bootstrap().await;
    Ok(session)
}

/// Session allowed onto the dashboard, or an error
async fn signed_in(config: &Config) -> anyhow::Result<CliSession> {
    let session = open_session(config).await?;
    match resolve(AppRoute::Dashboard, session.phase()) {
        RouteDecision::Render(_) => Ok(session),
        _ => bail!("Not logged in. Run `aithentica login` first."),
    }
}

async fn register(
    backend: &HttpBackend,
    form: &RegisterForm,
) -> Result<RegisteredUser, aithentica::api::FieldErrors> {
    let request = form.validate()?;
    auth::register(backend, &request)
        .await
        .map_err(|e| forms::registration_errors(&e))
}
