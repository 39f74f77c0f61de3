use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("word width {width} is not a whole number of bytes")]
    UnalignedWidth { width: u32 },
    #[error("word size {bytes} bytes is not supported (1 to 8)")]
    InvalidWordSize { bytes: usize },
}
