use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Discord API error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("Configuration not found: {0}")]
    ConfigNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(u64),

    #[error("I couldn't parse `{0}` as a user id. Ids must be purely numeric.")]
    InvalidUserId(String),

    #[error("User {0} is not globally banned.")]
    NotGloballyBanned(u64),

    #[error("This server has opted out of global bans, so gbans are not enforced here.")]
    GbansNotEnforced(u64),

    #[error("Official servers cannot opt out of global bans.")]
    OfficialOptOut,

    #[error("Another {0} job is taking too long. Try again later.")]
    JobTimeout(&'static str),

    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn custom<S: Into<String>>(msg: S) -> Self {
        Error::Custom(msg.into())
    }
}
