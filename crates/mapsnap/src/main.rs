use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use futures::StreamExt;
use mapsnap::{
    Annotation, ColorScheme, Image, ImageFetcher, KeySource, MapRequest, MapType, Overlay, Size,
    Snapshot, Span,
};
use tokio::io::AsyncWriteExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(about = "Build a signed Apple Maps snapshot URL and optionally download the image")]
struct Args {
    #[clap(long, env = "MAPKIT_TEAM_ID")]
    team_id: String,
    #[clap(long, env = "MAPKIT_KEY_ID")]
    key_id: String,
    /// PEM private key (.p8 or `openssl ec` output)
    #[clap(long, env = "MAPKIT_KEY_PATH")]
    key_path: PathBuf,

    /// Address, or "latitude,longitude"; sent exactly as typed
    #[clap(long)]
    center: String,
    #[clap(long)]
    zoom: Option<f64>,
    /// "latitudeDelta,longitudeDelta"
    #[clap(long)]
    span: Option<String>,
    /// "WIDTHxHEIGHT"
    #[clap(long)]
    size: Option<Size>,
    #[clap(long, default_value = "2")]
    scale: u8,
    #[clap(long)]
    map_type: Option<MapType>,
    #[clap(long)]
    color_scheme: Option<ColorScheme>,
    #[clap(long)]
    poi: Option<bool>,
    #[clap(long, default_value = "en-US")]
    lang: String,
    /// JSON array of annotation objects
    #[clap(long)]
    annotations: Option<String>,
    /// JSON overlay object
    #[clap(long)]
    overlay: Option<String>,
    /// JSON array of image objects
    #[clap(long)]
    images: Option<String>,
    #[clap(long)]
    referer: Option<String>,
    /// Seconds from now until the URL expires
    #[clap(long)]
    expires_in: Option<i64>,

    /// Download the PNG here instead of printing the URL
    #[clap(long, short)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let output = args.output.clone();
    let key = KeySource::file(&args.key_path);
    let request = build_request(args)?;

    let snapshot = Snapshot::new(request, key).context("creating signed snapshot URL")?;

    match output {
        Some(path) => download(&snapshot, &path).await,
        None => {
            println!("{snapshot}");
            Ok(())
        }
    }
}

fn build_request(args: Args) -> Result<MapRequest> {
    let mut request = MapRequest::new(args.team_id, args.key_id, args.center)
        .scale(Some(args.scale))
        .lang(Some(args.lang));

    request.zoom = args.zoom;
    request.span = args.span.as_deref().map(parse_span).transpose()?;
    request.size = args.size;
    request.map_type = args.map_type;
    request.color_scheme = args.color_scheme;
    request.poi = args.poi;
    request.referer = args.referer;

    if let Some(json) = args.annotations {
        let annotations: Vec<Annotation> =
            serde_json::from_str(&json).context("parsing --annotations")?;
        request = request.annotations(annotations);
    }
    if let Some(json) = args.overlay {
        let overlay: Overlay = serde_json::from_str(&json).context("parsing --overlay")?;
        request = request.overlay(overlay);
    }
    if let Some(json) = args.images {
        let images: Vec<Image> = serde_json::from_str(&json).context("parsing --images")?;
        request = request.images(images);
    }
    if let Some(seconds) = args.expires_in {
        request = request.expires_at(Utc::now() + Duration::seconds(seconds));
    }

    Ok(request)
}

fn parse_span(span: &str) -> Result<Span> {
    let (lat, lon) = span
        .split_once(',')
        .with_context(|| format!("span '{span}' is not latitudeDelta,longitudeDelta"))?;
    Ok(Span::new(
        lat.trim().parse().context("parsing span latitude delta")?,
        lon.trim().parse().context("parsing span longitude delta")?,
    ))
}

async fn download(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let fetcher = ImageFetcher::new();
    let mut stream = Box::pin(
        fetcher
            .stream(snapshot.url())
            .await
            .context("requesting snapshot image")?,
    );

    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("creating {}", path.display()))?;
    let mut written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("reading snapshot image")?;
        file.write_all(&chunk).await.context("writing snapshot image")?;
        written += chunk.len();
    }
    file.flush().await.context("flushing snapshot image")?;

    info!(bytes = written, path = %path.display(), "saved snapshot");
    Ok(())
}
