use crate::Result;
use crate::specs::ImageBuildRequest;

pub trait ImageBuilder: Send + Sync {
    /// Builds the image from source and pushes it; returns the pushed reference.
    ///
    /// # Errors
    ///
    /// Returns an error if checkout, build, registry login or push fails.
    fn build_and_push(&self, request: &ImageBuildRequest) -> Result<String>;
}
