//! Source checkout and container image build/push.

mod docker;
mod error;
mod pipeline;
mod source;

pub use docker::DockerCli;
pub use error::ImageError;
pub use pipeline::{BuildRequest, ImagePipeline};
pub use source::{GitCredentials, SourceCheckout};

pub type Result<T> = std::result::Result<T, ImageError>;
