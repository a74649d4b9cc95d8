//! Plant Gallery: stage a photo, identify the plant, chat with it, and keep
//! named photos in an in-memory gallery for the life of the process.

pub mod care;
pub mod chat;
pub mod config;
pub mod error;
pub mod flow;
pub mod gallery;
pub mod identify;
pub mod media;
pub mod models;
pub mod paths;
pub mod prompts;
pub mod session;

pub use care::{CareCatalog, CareInfo, Personality};
pub use config::AppConfig;
pub use error::{ConfigError, GalleryError};
pub use flow::{PendingUpload, Phase, Screen};
pub use gallery::GalleryStore;
pub use models::{ChatTurn, EntrySummary, ImageData, SavedEntry};
pub use session::{Analysis, Session};
