//! Image files picked in the browser.

/// An image read from a file input, ready to upload.
#[derive(Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Lowercase extension from the file name, else from the MIME type.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
        if let Some(ext) = from_name {
            return ext;
        }
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "jpg",
        }
        .to_string()
    }

    /// Randomised object path under the owner's folder: `<owner>/<uuid>.<ext>`.
    pub fn storage_path(&self, owner_id: &str) -> String {
        format!("{owner_id}/{}.{}", uuid::Uuid::new_v4(), self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_prefers_file_name() {
        assert_eq!(ImageFile::new("Portada.PNG", "image/jpeg", vec![]).extension(), "png");
        assert_eq!(ImageFile::new("portada", "image/webp", vec![]).extension(), "webp");
        assert_eq!(ImageFile::new("x.", "application/octet-stream", vec![]).extension(), "jpg");
    }

    #[test]
    fn test_storage_paths_are_unique_per_owner() {
        let img = ImageFile::new("a.png", "image/png", vec![1]);
        let a = img.storage_path("u1");
        let b = img.storage_path("u1");
        assert!(a.starts_with("u1/") && a.ends_with(".png"));
        assert_ne!(a, b);
    }
}
