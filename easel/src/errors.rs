use thiserror::Error;

#[derive(Error, Debug)]
pub enum EaselError {
    #[error("ERR_ARGUMENT: {0}")]
    Argument(String),

    #[error("ERR_STATE: {0}")]
    State(String),

    #[error("ERR_STACK: {0} stack underflow")]
    StackUnderflow(&'static str),

    #[error("ERR_IMAGE: {0}")]
    Image(String),

    #[error("ERR_FONT: {0}")]
    Font(String),

    #[error("ERR_SHADER: {0}")]
    Shader(String),

    #[error("ERR_SVG: {0}")]
    Svg(String),

    #[error("ERR_PAINTER: {0}")]
    Painter(String),

    #[error("ERR_IO: {0}")]
    Io(#[from] std::io::Error),
}

impl EaselError {
    pub(crate) fn argument<S: Into<String>>(message: S) -> EaselError {
        EaselError::Argument(message.into())
    }

    pub(crate) fn state<S: Into<String>>(message: S) -> EaselError {
        EaselError::State(message.into())
    }
}

impl From<image::ImageError> for EaselError {
    fn from(err: image::ImageError) -> Self {
        EaselError::Image(err.to_string())
    }
}

impl From<regex::Error> for EaselError {
    fn from(err: regex::Error) -> Self {
        EaselError::Argument(format!("pattern: {}", err))
    }
}
