pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] yedoc_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("workbook error: {message}")]
    Workbook { message: String },

    #[error("edited workbook is missing sheet '{name}'")]
    MissingSheet { name: String },

    #[error("bulk edit aborted at the confirmation gate; no changes applied")]
    Aborted,

    #[error("{feature} is not implemented")]
    Unsupported { feature: String },
}

impl Error {
    pub(crate) fn workbook(message: impl ToString) -> Self {
        Error::Workbook {
            message: message.to_string(),
        }
    }
}
