use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("unknown implementation \"{0}\" (available: ref, naive, opt)")]
    UnknownKernel(String),
    #[error("dimension {name} must be non-zero, got {value}")]
    InvalidDimension { name: &'static str, value: usize },
    #[error("number of runs must be at least 1, got {0}")]
    InvalidRuns(usize),
    #[error("outlier threshold must be a positive finite number, got {0}")]
    InvalidThreshold(f64),
    #[error("tolerance must be a non-negative finite number, got {0}")]
    InvalidTolerance(f32),
    #[error("buffer {name} too small: need {needed} elements, got {got}")]
    BufferTooSmall {
        name: &'static str,
        needed: usize,
        got: usize,
    },
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    MatmulMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("matrix {name} of {rows}x{cols} overflows usize")]
    DimensionOverflow {
        name: &'static str,
        rows: usize,
        cols: usize,
    },
    #[error("no runtime samples to reduce")]
    NoSamples,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
