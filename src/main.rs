use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scribe::api::types::EmailRequest;
use scribe::api::{AppState, create_router};
use scribe::banner::{BannerInfo, NO_MODEL, auth_status, print_banner, print_session_summary};
use scribe::client::{ApiClient, Attachment, ChatSession};
use scribe::commands::{self, CommandResult, Parsed};
use scribe::completion::anthropic::AnthropicClient;
use scribe::config::{CompletionConfig, Config};
use scribe::consts::{DEFAULT_SERVER_URL, format_bytes};
use scribe::spinner::with_spinner;
use scribe::tasks::{TARGET_LANGUAGE, TaskFactory, TaskKind, TaskOptions};

#[derive(Parser)]
#[command(
    name = "scribe",
    version,
    about = "Translation, email, code and chat helpers over one LLM."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (TOML)
    #[arg(short, long, global = true, env = "SCRIBE_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "SCRIBE_BIND")]
        bind: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "SCRIBE_PORT")]
        port: Option<u16>,

        #[command(flatten)]
        completion: CompletionArgs,
    },
    /// Run one task locally against the model, without a server
    Run {
        /// Task to run
        task: TaskKind,

        /// Input text
        input: String,

        /// Target language (translate only)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        completion: CompletionArgs,
    },
    /// Translate text through a running server
    Translate {
        input: String,

        /// Target language (default: English)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        server: ServerArgs,
    },
    /// Compose an email through a running server
    Email {
        /// What the email should say
        content: String,

        #[arg(long)]
        subject: Option<String>,

        /// Extra context for the writer
        #[arg(long)]
        context: Option<String>,

        #[command(flatten)]
        server: ServerArgs,
    },
    /// Ask for coding help, optionally with screenshots
    Code {
        prompt: String,

        /// Image to attach (repeatable)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        #[command(flatten)]
        server: ServerArgs,
    },
    /// Interactive chat with a running server
    Chat {
        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(Args)]
struct CompletionArgs {
    /// Model name
    #[arg(short, long, env = "SCRIBE_MODEL")]
    model: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Args)]
struct ServerArgs {
    /// Base URL of a running `scribe serve`
    #[arg(short, long, env = "SCRIBE_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            bind,
            port,
            completion,
        } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, completion).await
        }
        Command::Run {
            task,
            input,
            to,
            completion,
        } => run_task(config, completion, task, &input, to).await,
        Command::Translate { input, to, server } => {
            let api = ApiClient::new(server.server);
            let result = with_spinner("translating", api.translate(&input, to.as_deref())).await;
            print_result(result)
        }
        Command::Email {
            content,
            subject,
            context,
            server,
        } => {
            let api = ApiClient::new(server.server);
            let request = EmailRequest {
                subject,
                content,
                context,
            };
            let result = with_spinner("writing", api.email(&request)).await;
            print_result(result)
        }
        Command::Code {
            prompt,
            images,
            server,
        } => {
            let api = ApiClient::new(server.server);
            let mut attachments = Vec::with_capacity(images.len());
            for path in &images {
                attachments.push(Attachment::from_path(path).await?);
            }
            let result = with_spinner("thinking", api.code_assist(&prompt, &attachments)).await;
            print_result(result)
        }
        Command::Chat { server } => chat(ApiClient::new(server.server)).await,
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scribe={level},tower_http={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

/// Layer the CLI model and key over the file settings.
fn completion_config(mut config: Config, args: CompletionArgs) -> CompletionConfig {
    if let Some(model) = args.model {
        config.completion.model = model;
    }
    config.completion_config(args.api_key.unwrap_or_default())
}

async fn serve(config: Config, args: CompletionArgs) -> Result<()> {
    let key_status = auth_status(args.api_key.as_deref());
    let client = AnthropicClient::new(completion_config(config.clone(), args))?;
    let addr = config.server.addr();

    print_banner(&BannerInfo {
        mode: "serve",
        model: client.model(),
        endpoint: &addr,
        auth_status: key_status,
    });

    let state = AppState::new(Arc::new(client)).with_max_upload_size(config.server.max_upload_size);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        addr = %addr,
        max_upload = %format_bytes(config.server.max_upload_size as u64),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await
        .context("server error")
}

async fn run_task(
    config: Config,
    args: CompletionArgs,
    kind: TaskKind,
    input: &str,
    to: Option<String>,
) -> Result<()> {
    let factory = TaskFactory::from_config(completion_config(config, args))?;
    let task = factory.create(kind);

    let mut options = TaskOptions::new();
    if let Some(to) = to {
        options.insert(TARGET_LANGUAGE.to_string(), to);
    }

    let result = with_spinner(task.name(), task.execute(input, &options)).await;
    print_result(result)
}

fn print_result(result: Result<String>) -> Result<()> {
    match result {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn chat(api: ApiClient) -> Result<()> {
    let health = api.health().await?;
    info!(version = %health.version, server = %api.base_url(), "connected");

    print_banner(&BannerInfo {
        mode: "chat",
        model: NO_MODEL,
        endpoint: api.base_url(),
        auth_status: "N/A",
    });
    println!("   type /help for commands\n");

    let mut session = ChatSession::new();
    session.new_chat();
    let mut pending: Vec<Attachment> = Vec::new();

    // Async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let marker = if pending.is_empty() {
            String::new()
        } else {
            format!(" +{}", pending.len())
        };
        print!("\nscribe{marker}> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {e}");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match commands::parse(input) {
            Parsed::Command(command) => {
                if commands::apply(command, &mut session, &mut pending).await
                    == CommandResult::Quit
                {
                    break;
                }
                continue;
            }
            Parsed::Invalid(msg) => {
                eprintln!("  {msg}");
                continue;
            }
            Parsed::NotACommand => {}
        }

        // Ctrl+C during a request abandons it, not the REPL
        tokio::select! {
            outcome = with_spinner("thinking", session.send(&api, input, &pending)) => {
                match outcome {
                    Ok(outcome) => {
                        println!("\n{}", outcome.reply.content);
                        if let Some(title) = outcome.title {
                            println!("\n  [{title}]");
                        }
                        if !outcome.failed {
                            pending.clear();
                        }
                    }
                    Err(e) => eprintln!("\nerror: {e:#}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n\ninterrupted");
            }
        }
    }

    let messages = session.chats().iter().map(|c| c.messages.len()).sum();
    print_session_summary(session.chats().len(), messages);
    Ok(())
}
