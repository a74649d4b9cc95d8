use clap::Parser;
use log::{error, info, warn};
use plant_gallery::media::{self, GalleryItem};
use plant_gallery::{AppConfig, Screen, Session};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, PartialEq)]
#[command(
    name = "plant-gallery",
    about = "Upload plant photos, identify them and save them to a gallery"
)]
struct Args {
    /// Name to save the photo under (single image only; defaults to the file stem)
    #[arg(long)]
    name: Option<String>,

    /// Message to send to the plant before saving; repeatable
    #[arg(long = "chat")]
    chats: Vec<String>,

    /// Image files to upload
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

impl Args {
    fn validate(&self) -> Result<(), String> {
        if self.name.is_some() && self.images.len() > 1 {
            return Err("--name can only be used with a single image".to_string());
        }
        Ok(())
    }
}

fn default_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string())
}

async fn save_image(session: &mut Session, path: &Path, args: &Args) -> Result<(), String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let file_name = path.file_name().map(|n| n.to_string_lossy().to_string());

    session
        .upload(bytes, file_name.as_deref())
        .map_err(|e| e.to_string())?;
    let dimensions = session.pending().staged_image().and_then(|i| i.dimensions());
    if let Some((width, height)) = dimensions {
        info!("[main] Staged {} ({}x{})", path.display(), width, height);
    }

    let analysis = session.analyze().await.map_err(|e| e.to_string())?;
    match &analysis.species {
        Some(species) => info!(
            "[main] {} looks like {} (care info: {})",
            path.display(),
            species,
            if analysis.care_found { "found" } else { "none" }
        ),
        None => warn!("[main] Could not identify {}", path.display()),
    }

    for message in &args.chats {
        let reply = session.chat(message).await.map_err(|e| e.to_string())?;
        println!("You: {}\nPlant: {}", message, reply);
    }

    let name = args.name.clone().unwrap_or_else(|| default_name(path));
    session.request_save().map_err(|e| e.to_string())?;
    session.set_draft_name(&name).map_err(|e| e.to_string())?;
    match session.confirm_save() {
        Ok(Screen::Saved { name, replaced }) => {
            if replaced {
                warn!("[main] Replaced existing photo '{}'", name);
            }
            Ok(())
        }
        Ok(other) => Err(format!("Unexpected screen after save: {:?}", other)),
        Err(e) => {
            session.discard();
            Err(e.to_string())
        }
    }
}

fn write_gallery_page(session: &Session, out: &Path) -> Result<(), String> {
    let mut items = Vec::new();
    for entry in session.gallery().entries() {
        let viewer_url = session.viewer_url(&entry.name).map_err(|e| e.to_string())?;
        items.push(GalleryItem {
            name: &entry.name,
            image_data_url: entry.image.data_url(),
            viewer_url,
        });
    }
    std::fs::write(out, media::gallery_html(&items))
        .map_err(|e| format!("Failed to write {}: {}", out.display(), e))
}

async fn run() -> Result<(), String> {
    let args = Args::parse();
    args.validate()?;

    let config = AppConfig::load().map_err(|e| e.to_string())?;
    let mut session = Session::from_config(&config).map_err(|e| e.to_string())?;

    for path in &args.images {
        if let Err(e) = save_image(&mut session, path, &args).await {
            error!("[main] Skipping {}: {}", path.display(), e);
            session.discard();
        }
    }

    let summaries = session.gallery().summaries();
    let json = serde_json::to_string_pretty(&summaries)
        .map_err(|e| format!("Failed to serialize gallery: {}", e))?;
    println!("{}", json);

    let out = PathBuf::from("gallery.html");
    write_gallery_page(&session, &out)?;
    info!(
        "[main] Wrote {} photo(s) to {}",
        session.gallery().len(),
        out.display()
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("plant_gallery=info")),
        )
        .init();

    info!("=== Plant Gallery Starting ===");
    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
