mod command;
mod error;
mod publisher;

pub use command::{PublishOptions, publish_args, publish_env, registry_scope};
pub use error::PublishError;
pub use publisher::{CargoPublisher, PublishReport};

pub type Result<T> = std::result::Result<T, PublishError>;
