use thiserror::Error;

/// Errors raised by the terminal host. The widget itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    /// Terminal I/O failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Neither the OS nor the terminal reported a size
    #[error("could not determine the terminal size")]
    TerminalSize,

    /// Canvas area has no rows left after the toolbar and hint line
    #[error("terminal too small: {cols}x{rows}, need at least {min_cols}x{min_rows}")]
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    /// Pixel ratio outside the supported range
    #[error("invalid pixel ratio {0}: expected a value between 0.25 and 8")]
    InvalidPixelRatio(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
