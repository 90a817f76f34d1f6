//! `covershelf` command line: refresh, inspect and delete cached covers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covershelf_config::{
    CoverConfig, CoverConfigLoader, CoverConfigSource, build_cover_service,
    telemetry,
};
use covershelf_core::pipeline::MediaCoverService;
use covershelf_model::{Cover, CoverType, ItemId};
use tracing::info;

#[derive(Parser)]
#[command(name = "covershelf", about = "Cover art cache maintenance")]
struct Cli {
    /// Config file (TOML or JSON). Skips the usual lookup order.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the cover root folder.
    #[arg(long, global = true, env = "COVERSHELF_COVER_ROOT")]
    cover_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download, refresh and resize covers, then print their URLs
    Ensure {
        #[arg(long)]
        item: i32,
        /// `type=url`, repeatable
        #[arg(long = "cover", required = true)]
        covers: Vec<Cover>,
    },
    /// Print the URLs covers would be served under
    Urls {
        #[arg(long)]
        item: i32,
        #[arg(long = "cover", required = true)]
        covers: Vec<Cover>,
    },
    /// Print the on-disk path of a cover or one of its variants
    Path {
        #[arg(long)]
        item: i32,
        #[arg(long = "type")]
        cover_type: CoverType,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Remove every cover of an item
    Delete {
        #[arg(long)]
        item: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    let service = build_cover_service(&config)
        .context("failed to build cover service")?;

    match cli.command {
        Command::Ensure { item, mut covers } => {
            let item = ItemId::new(item);
            let updated = service.ensure_covers(item, &covers).await;
            info!(%item, updated, "ensure finished");
            print_urls(&service, item, &mut covers).await?;
        }
        Command::Urls { item, mut covers } => {
            print_urls(&service, ItemId::new(item), &mut covers).await?;
        }
        Command::Path {
            item,
            cover_type,
            height,
        } => {
            let path =
                service.get_cover_path(ItemId::new(item), cover_type, height);
            println!("{}", path.display());
        }
        Command::Delete { item } => {
            service.delete_covers(ItemId::new(item)).await.with_context(
                || format!("failed to delete covers of item {item}"),
            )?;
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<CoverConfig> {
    let mut config = match &cli.config {
        Some(path) => CoverConfigLoader::load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            let load = CoverConfigLoader::new()
                .load()
                .context("failed to load cover configuration")?;
            if load.source == CoverConfigSource::Default {
                info!("no config file found; using defaults");
            }
            load.config
        }
    };

    if let Some(root) = &cli.cover_root {
        config.cover_root = root.clone();
    }
    config.validate().context("invalid cover configuration")?;
    Ok(config)
}

async fn print_urls(
    service: &MediaCoverService,
    item: ItemId,
    covers: &mut [Cover],
) -> Result<()> {
    let snapshot = if item.is_ephemeral() {
        None
    } else {
        Some(
            service
                .get_cover_file_infos()
                .await
                .context("failed to scan cover root")?,
        )
    };
    service
        .convert_to_local_urls(item, covers, snapshot.as_ref())
        .await;

    for cover in covers.iter() {
        match &cover.url {
            Some(url) => println!("{}\t{url}", cover.cover_type),
            None => println!("{}\t-", cover.cover_type),
        }
    }
    Ok(())
}
