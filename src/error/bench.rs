use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Failed to create scratch file: {source}")]
    Scratch {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' exited with status {code:?}: {stderr}")]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Failed to read benchmark samples: {source}")]
    ReadSamples {
        #[source]
        source: std::io::Error,
    },
    #[error("Benchmark output is missing '{field}'.")]
    MissingField { field: &'static str },
}
