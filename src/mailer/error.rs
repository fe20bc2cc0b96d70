use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid mail address `{address}`: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("failed to render template: {0}")]
    Template(#[from] askama::Error),
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}
