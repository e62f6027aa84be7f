use thiserror::Error;

pub type Result<T> = std::result::Result<T, GalleryError>;

/// Failures a gallery can report to its host.
///
/// Only [`GalleryError::InvalidConfig`] and [`GalleryError::Json`] are fatal
/// to page setup. The element errors make one gallery decline initialization
/// and leave every other gallery untouched.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("gallery container not found: {id}")]
    MissingContainer { id: String },

    #[error("gallery {id} has no track element")]
    MissingTrack { id: String },

    #[error("gallery {id} has no items")]
    EmptyTrack { id: String },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GalleryError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether the error only affects a single gallery.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingContainer { .. }
                | Self::MissingTrack { .. }
                | Self::EmptyTrack { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::GalleryError;

    #[test]
    fn invalid_constructor_preserves_message() {
        let error = GalleryError::invalid("clones_count must be positive");
        assert_eq!(
            error.to_string(),
            "invalid configuration: clones_count must be positive"
        );
        assert!(!error.is_local());
    }

    #[test]
    fn element_errors_are_local() {
        let error = GalleryError::EmptyTrack {
            id: "sport-gallery".to_owned(),
        };
        assert!(error.is_local());
        assert_eq!(error.to_string(), "gallery sport-gallery has no items");
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = GalleryError::from(err);
        assert!(error.to_string().starts_with("JSON error:"));
    }
}
