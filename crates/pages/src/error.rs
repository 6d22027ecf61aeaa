use publisher::PublishError;
use thiserror::Error;

/// A page run failed as a whole. Per-asset load failures never surface
/// here; they exclude the asset and the run continues. Only the publishing
/// sink can abort a run, since no partial-publish recovery exists.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Publish(#[from] PublishError),
}
