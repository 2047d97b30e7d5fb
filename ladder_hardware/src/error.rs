use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("spi error: {0}")]
    Spi(String),
    #[error("adc channel {0} out of range (0..=7)")]
    ChannelOutOfRange(u8),
    #[error("adc sample {0} out of range (0..=1023)")]
    SampleOutOfRange(u16),
    #[error("sample trace exhausted")]
    Exhausted,
}

pub type Result<T> = std::result::Result<T, HwError>;
