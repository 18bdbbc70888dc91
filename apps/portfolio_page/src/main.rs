use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use page_controller::{Document, HttpBackend, PageAction, PageController, SeededPicker};
use shared::protocol::{CommentSubmission, ImageUpload};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Drive the portfolio page against its backend and print the rendered markup")]
struct Args {
    /// Backend base URL; overrides settings.
    #[arg(long)]
    backend_url: Option<String>,
    /// Settings file; defaults to ./portfolio.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Value typed into the comments-limit input.
    #[arg(long)]
    comments_limit: Option<String>,
    /// Seed for quote and image selection.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full page-load sequence.
    Load,
    Quote,
    Image,
    Name,
    Comments,
    DeleteAll,
    LoginStatus,
    Submit {
        message: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Nickname {
        nickname: String,
    },
}

async fn page_action(command: Command) -> Result<PageAction> {
    let action = match command {
        Command::Load => PageAction::LoadPage,
        Command::Quote => PageAction::ShowRandomQuote,
        Command::Image => PageAction::RandomizeImage,
        Command::Name => PageAction::GetRandomName,
        Command::Comments => PageAction::GetComments,
        Command::DeleteAll => PageAction::DeleteAllComments,
        Command::LoginStatus => PageAction::UpdateVisibilityForLoginStatus,
        Command::Submit { message, image } => {
            let mut submission = CommentSubmission::text(message);
            if let Some(path) = image {
                submission = submission.with_image(read_image(path).await?);
            }
            PageAction::SubmitComment(submission)
        }
        Command::Nickname { nickname } => PageAction::SetNickname(nickname),
    };
    Ok(action)
}

async fn read_image(path: PathBuf) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read image '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime_type = mime_guess::from_path(&path)
        .first()
        .map(|mime| mime.essence_str().to_string());
    Ok(ImageUpload {
        filename,
        mime_type,
        bytes,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(backend_url) = args.backend_url {
        settings.backend_url = backend_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;
    let backend = HttpBackend::with_client(http, &settings.backend_url)?;
    let mut controller =
        PageController::new(backend, Document::portfolio_page(settings.comments_limit));
    if let Some(seed) = args.seed {
        controller = controller.with_picker(SeededPicker::new(seed));
    }
    if let Some(limit) = &args.comments_limit {
        controller.set_comments_limit_input(limit).await?;
    }

    let action = page_action(args.command.unwrap_or(Command::Load)).await?;
    info!(backend_url = %settings.backend_url, action = action.name(), "running page action");
    let outcome = controller.dispatch(action).await;

    let alerts = controller.take_alerts().await;
    print!("{}", controller.render_html().await);
    for alert in alerts {
        eprintln!("alert: {alert}");
    }
    outcome.context("page action failed")?;
    Ok(())
}
