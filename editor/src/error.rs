use derive_more::{Display, From};

#[derive(Debug, From, Display)]
pub enum Error {
    #[from]
    #[display("{_0}")]
    Api(crate::clients::ApiError),

    #[from]
    #[display("{_0}")]
    Config(crate::config::ConfigError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Api(e) => Some(e),
            Error::Config(e) => Some(e),
        }
    }
}

impl Error {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(e) => e.user_message(),
            Error::Config(_) => "Unable to load settings. Defaults will be used.".to_string(),
        }
    }
}
