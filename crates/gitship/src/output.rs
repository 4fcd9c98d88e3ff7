use gitship_build::ImageReference;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The only persisted output: `{"image": "<repository-uri>:<tag>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub image: String,
}

impl ImageRecord {
    pub fn new(image: &ImageReference) -> Self {
        Self {
            image: image.full_tag(),
        }
    }
}

/// Write `record` to `path`, replacing whatever was there
pub fn write_record(path: &Path, record: &ImageRecord) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(record)?;
    std::fs::write(path, json)?;
    tracing::info!("Result written to {}", path.display());
    Ok(())
}
