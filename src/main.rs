use std::path::PathBuf;
use std::process::ExitCode;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use futures::StreamExt;

use obsfs::fs::WriteOptions;
use obsfs::{Filesystem, FsEntry, ObsConfig, create_filesystem};

/// obsfs: virtual filesystem operations against a Huawei OBS bucket
#[derive(Parser, Debug)]
#[command(name = "obsfs")]
#[command(about = "Browse and manage objects in an OBS bucket as a filesystem", long_about = None)]
struct Cli {
    /// Path to a JSON configuration file (overrides the individual options)
    #[arg(short, long, env = "OBSFS_CONFIG")]
    config: Option<PathBuf>,

    /// OBS access key
    #[arg(long, env = "OBS_ACCESS_KEY", default_value = "")]
    access_key: String,

    /// OBS secret key
    #[arg(long, env = "OBS_SECRET_KEY", default_value = "", hide_env_values = true)]
    secret_key: String,

    /// Bucket name
    #[arg(short, long, env = "OBS_BUCKET", default_value = "")]
    bucket: String,

    /// Key prefix prepended to every path
    #[arg(long, env = "OBS_PREFIX", default_value = "")]
    prefix: String,

    /// Region, e.g. cn-north-4
    #[arg(long, env = "OBS_REGION")]
    region: Option<String>,

    /// Endpoint override, e.g. obs.cn-north-4.myhuaweicloud.com
    #[arg(long, env = "OBS_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a directory
    Ls {
        #[arg(default_value = "")]
        path: String,
        /// Recurse into subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
    /// Print a file to stdout
    Get { path: String },
    /// Upload a local file
    Put {
        file: PathBuf,
        path: String,
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Delete a file
    Rm { path: String },
    /// Create a directory marker
    Mkdir { path: String },
    /// Delete a directory and everything below it
    Rmdir { path: String },
    /// Server-side copy
    Cp { source: String, destination: String },
    /// Move (copy + delete source)
    Mv { source: String, destination: String },
    /// Print file metadata
    Stat { path: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ObsConfig::from_file(path) {
            Ok(config) => {
                tracing::info!("loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                tracing::error!("failed to load config file '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ObsConfig {
            access_key: cli.access_key.clone(),
            secret_key: cli.secret_key.clone(),
            bucket: cli.bucket.clone(),
            prefix: cli.prefix.clone(),
            region: cli.region.clone(),
            endpoint: cli.endpoint.clone(),
        },
    };

    let filesystem = match create_filesystem(&config) {
        Ok(filesystem) => filesystem,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&filesystem, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    filesystem: &dyn Filesystem,
    command: Command,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Ls { path, recursive } => {
            let mut entries = filesystem.list_contents(&path, recursive);
            while let Some(entry) = entries.next().await {
                match entry? {
                    FsEntry::File(file) => {
                        println!("{:>12}  {}", file.file_size.unwrap_or(0), file.path)
                    }
                    FsEntry::Directory(dir) => println!("{:>12}  {}/", "-", dir.path),
                }
            }
        }
        Command::Get { path } => {
            let contents = filesystem.read(&path).await?;
            use std::io::Write;
            std::io::stdout().write_all(&contents)?;
        }
        Command::Put {
            file,
            path,
            content_type,
        } => {
            let contents = tokio::fs::read(&file).await?;
            let options = WriteOptions {
                content_type,
                ..Default::default()
            };
            filesystem
                .write(&path, Bytes::from(contents), &options)
                .await?;
            println!("uploaded {} -> {}", file.display(), path);
        }
        Command::Rm { path } => filesystem.delete(&path).await?,
        Command::Mkdir { path } => filesystem.create_directory(&path).await?,
        Command::Rmdir { path } => filesystem.delete_directory(&path).await?,
        Command::Cp {
            source,
            destination,
        } => {
            filesystem
                .copy(&source, &destination, &WriteOptions::default())
                .await?
        }
        Command::Mv {
            source,
            destination,
        } => {
            filesystem
                .move_file(&source, &destination, &WriteOptions::default())
                .await?
        }
        Command::Stat { path } => {
            let attributes = filesystem.file_size(&path).await?;
            println!("path:          {}", attributes.path);
            println!(
                "size:          {}",
                attributes
                    .file_size
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string())
            );
            println!(
                "mime type:     {}",
                attributes.mime_type.as_deref().unwrap_or("-")
            );
            println!(
                "last modified: {}",
                attributes
                    .last_modified
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string())
            );
        }
    }

    Ok(())
}
