//! ProTief admin command line.
//!
//! Edits the site content through the content API, falling back to the local
//! store when the API is unreachable.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use protief_admin::application_service::{
    default_export_file_name, AdminEditor, ContentManager, ImageFile, ImageTarget, Placement,
};
use protief_admin::infrastructure::{HttpContentApi, SledKeyValueStore};
use protief_admin::{AdminConfig, ContentSaved};
use protief_content::ContentDocument;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "protief-admin")]
#[command(about = "ProTief site content administration")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "PROTIEF_ADMIN_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Content API base URL, e.g. http://localhost:3001/api.
    #[arg(long, env = "PROTIEF_API_URL", global = true)]
    api_url: Option<String>,

    /// Local store directory.
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current content document.
    Show,
    /// Save a content document (admin JSON shape).
    Save { file: PathBuf },
    /// Upload an image and attach it to an entity.
    Upload {
        file: PathBuf,
        /// hero, about, project or partner.
        #[arg(long)]
        placement: Placement,
        /// Slide, project or partner id. Not used for `about`.
        #[arg(long)]
        item_id: Option<String>,
    },
    /// Remove locally stored images the content no longer uses.
    Cleanup,
    /// Write a backup of content and local images.
    Export {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace local content and images with a backup.
    Import { file: PathBuf },
    /// List job postings.
    Jobs {
        #[arg(long)]
        active: bool,
    },
    /// Resolve an image reference to a displayable URL.
    ImageUrl { reference: String },
}

impl Args {
    fn load_config(&self) -> Result<AdminConfig> {
        let mut config = match &self.config {
            Some(path) => AdminConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => AdminConfig::default(),
        }
        .with_env_overrides();
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(store_path) = &self.store_path {
            config.store_path = store_path.clone();
        }
        Ok(config)
    }
}

fn image_target(placement: Placement, item_id: Option<String>) -> Result<ImageTarget> {
    let target = match (placement, item_id) {
        (Placement::About, _) => ImageTarget::About,
        (Placement::Hero, Some(id)) => ImageTarget::HeroSlide(id),
        (Placement::Project, Some(id)) => ImageTarget::Project(id),
        (Placement::Partner, Some(id)) => ImageTarget::Partner(id),
        (placement, None) => bail!("--item-id is required for {}", placement.as_str()),
    };
    Ok(target)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.load_config()?;
    let store = SledKeyValueStore::open(&config.store_path)
        .with_context(|| format!("Failed to open store {}", config.store_path.display()))?;
    let api = HttpContentApi::new(&config).context("Failed to create API client")?;
    tracing::debug!("Using API {}", api.base_url());

    let manager = Arc::new(ContentManager::new(config, Arc::new(store), Arc::new(api)));
    manager.events().subscribe(|event: &ContentSaved| {
        eprintln!("{}", event.status_message());
    });

    match args.command {
        Command::Show => {
            let content = manager.load_content().await;
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Save { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let content: ContentDocument =
                serde_json::from_str(&raw).context("Invalid content document")?;
            manager.save_content(&content).await?;
        }
        Command::Upload {
            file,
            placement,
            item_id,
        } => {
            let target = image_target(placement, item_id)?;
            let image = ImageFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let mut editor = AdminEditor::open(manager.clone()).await;
            let reference = editor.upload_image(target, &image).await?;
            editor.save().await?;
            println!("{reference}");
        }
        Command::Cleanup => {
            let content = manager.load_content().await;
            let report = manager.cleanup_unused_images(&content)?;
            for key in &report.removed_keys {
                println!("removed {key}");
            }
            println!(
                "{} image(s) removed, {} upload record(s) pruned",
                report.removed_keys.len(),
                report.pruned_records
            );
        }
        Command::Export { out } => {
            let path = out
                .unwrap_or_else(|| PathBuf::from(default_export_file_name(chrono::Utc::now())));
            manager.export_to_file(&path).await?;
            println!("{}", path.display());
        }
        Command::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let summary = manager.import_all_data(&raw)?;
            println!(
                "Imported {} image(s) and {} upload record(s)",
                summary.images, summary.uploaded_files
            );
        }
        Command::Jobs { active } => {
            let content = manager.load_content().await;
            let jobs: Vec<_> = if active {
                content.active_jobs().collect()
            } else {
                content.jobs.iter().collect()
            };
            for job in jobs {
                let state = if job.is_active { "aktiv" } else { "inaktiv" };
                println!(
                    "{}\t{}\t{}\t{}\t{state}",
                    job.id,
                    job.title,
                    job.job_type.as_str(),
                    job.location
                );
            }
        }
        Command::ImageUrl { reference } => {
            println!("{}", manager.get_image_url(&reference));
        }
    }

    Ok(())
}
