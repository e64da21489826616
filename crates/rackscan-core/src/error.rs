pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SVG load error: {message}")]
    Load { message: String },

    #[error("expected an <svg> root element, found <{root}>")]
    NotSvg { root: String },

    #[error("invalid scan options: {message}")]
    InvalidOptions { message: String },
}
