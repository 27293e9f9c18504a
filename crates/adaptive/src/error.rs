use mp4::Mp4Error;

#[derive(Debug, thiserror::Error)]
pub enum AdaptiveError {
    #[error("segment index error: {source}")]
    Index {
        #[from]
        source: Mp4Error,
    },
}
