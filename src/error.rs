use std::path::PathBuf;

use thiserror::Error;

use crate::line::LineId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid model path: {0}")]
    InvalidModelPath(PathBuf),

    #[error("Unable to load model: {0}")]
    ModelLoad(String),

    #[error("Detector Error: {0}")]
    Detector(String),

    #[error("Line {line} has {points} point(s), at least 2 are required")]
    InvalidLineGeometry { line: LineId, points: usize },

    #[error("Line {line} contains a non-finite point")]
    NonFiniteLinePoint { line: LineId },

    #[error("Line id {0} is used more than once")]
    DuplicateLineId(LineId),

    #[error("Malformed detection #{index}: {reason}")]
    MalformedDetection { index: usize, reason: &'static str },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}
