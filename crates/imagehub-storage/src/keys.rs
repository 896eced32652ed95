//! Shared key generation for stored assets.

use crate::traits::{StorageError, StorageResult};

/// Sub-namespace under each owner holding derived thumbnails. Reserved as an original file name.
const THUMBNAIL_DIR: &str = "thumbnails";

/// Namespace (directory) holding every file of one owner.
pub fn owner_namespace(owner_id: i64) -> String {
    owner_id.to_string()
}

/// Key of an original upload. Re-uploading the same file name yields the same key.
pub fn original_key(owner_id: i64, file_name: &str) -> String {
    format!("{}/{}", owner_namespace(owner_id), file_name)
}

/// Key of the thumbnail derived from `file_name`. Thumbnails live apart from originals,
/// so no original name can collide with another image's thumbnail.
pub fn thumbnail_key(owner_id: i64, file_name: &str) -> String {
    format!("{}/{}/{}", owner_namespace(owner_id), THUMBNAIL_DIR, file_name)
}

/// Rejects file names that would escape or alter the owner namespace.
pub fn validate_file_name(file_name: &str) -> StorageResult<()> {
    if file_name.trim().is_empty() {
        return Err(StorageError::InvalidKey("File name is empty".to_string()));
    }
    if file_name == "." || file_name.contains("..") {
        return Err(StorageError::InvalidKey(format!(
            "File name '{}' contains a relative path component",
            file_name
        )));
    }
    if file_name.contains('/') || file_name.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "File name '{}' contains a path separator",
            file_name
        )));
    }
    if file_name == THUMBNAIL_DIR {
        return Err(StorageError::InvalidKey(format!(
            "File name '{}' is reserved",
            file_name
        )));
    }
    if file_name.chars().any(char::is_control) {
        return Err(StorageError::InvalidKey(
            "File name contains control characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(original_key(7, "photo.jpg"), "7/photo.jpg");
        assert_eq!(thumbnail_key(7, "photo.jpg"), "7/thumbnails/photo.jpg");
        assert_eq!(owner_namespace(42), "42");
    }

    #[test]
    fn test_validate_file_name() {
        assert!(validate_file_name("photo.jpg").is_ok());
        assert!(validate_file_name("my holiday (1).png").is_ok());
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("   ").is_err());
        assert!(validate_file_name("..").is_err());
        assert!(validate_file_name("../etc/passwd").is_err());
        assert!(validate_file_name("dir/photo.jpg").is_err());
        assert!(validate_file_name("dir\\photo.jpg").is_err());
        assert!(validate_file_name("bad\nname.jpg").is_err());
        assert!(validate_file_name("thumbnails").is_err());
        assert!(validate_file_name("thumb_photo.jpg").is_ok());
    }

    #[test]
    fn test_thumbnail_never_collides_with_an_original() {
        for name in ["a.png", "thumb_a.png", "thumbnails.png", "x"] {
            for other in ["a.png", "thumb_a.png", "thumbnails.png", "x"] {
                assert_ne!(thumbnail_key(7, name), original_key(7, other));
            }
        }
    }
}
