use {channel::ChannelError, image::ImageError, std::fmt, video::VideoError};

#[derive(Debug)]
pub enum PipelineError {
    Config(String),
    Channel(ChannelError),
    Video(VideoError),
    Transform(String),
    Thread(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Config(msg) => write!(f, "config error: {msg}"),
            PipelineError::Channel(err) => write!(f, "channel error: {err}"),
            PipelineError::Video(err) => write!(f, "video error: {err}"),
            PipelineError::Transform(msg) => write!(f, "transform error: {msg}"),
            PipelineError::Thread(msg) => write!(f, "thread error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Channel(err) => Some(err),
            PipelineError::Video(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ChannelError> for PipelineError {
    fn from(err: ChannelError) -> Self {
        PipelineError::Channel(err)
    }
}

impl From<VideoError> for PipelineError {
    fn from(err: VideoError) -> Self {
        PipelineError::Video(err)
    }
}

impl From<ImageError> for PipelineError {
    fn from(err: ImageError) -> Self {
        PipelineError::Video(VideoError::Image(err))
    }
}
