use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(String),

    #[error("Invalid line item: {0}")]
    InvalidItem(String),

    #[error("Customer name is required (pass --customer or an input document)")]
    MissingCustomer,

    #[error("Unsupported format: {0} (expected text, json or csv)")]
    UnsupportedFormat(String),

    #[error("Cannot read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
