use thiserror::Error;

/// The publishing destination rejected or failed to persist a table. This
/// is fatal for the run: the next scheduled run republishes from scratch.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("failed to reach the publishing sink: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("publishing sink rejected table '{table}' with status {status}: {body}")]
    Rejected {
        table: String,
        status: u16,
        body: String,
    },
}
