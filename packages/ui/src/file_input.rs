use api::upload::ImageFile;
use dioxus::prelude::*;

/// First file of a file-input change event, read into memory.
pub async fn read_image(evt: &FormEvent) -> Option<ImageFile> {
    let file = evt.files().into_iter().next()?;
    let name = file.name();
    let content_type = file
        .content_type()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    match file.read_bytes().await {
        Ok(bytes) => Some(ImageFile::new(name, content_type, bytes.to_vec())),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", name, e);
            None
        }
    }
}
