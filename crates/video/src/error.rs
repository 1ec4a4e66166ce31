use {image::ImageError, std::fmt};

#[derive(Debug)]
pub enum VideoError {
    Device(String),
    Stream(String),
    Decode(String),
    Render(String),
    Image(ImageError),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Decode(msg) => write!(f, "decode error: {msg}"),
            VideoError::Render(msg) => write!(f, "render error: {msg}"),
            VideoError::Image(err) => write!(f, "image error: {err}"),
        }
    }
}

impl std::error::Error for VideoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VideoError::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}

impl From<ImageError> for VideoError {
    fn from(err: ImageError) -> Self {
        VideoError::Image(err)
    }
}
