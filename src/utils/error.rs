use thiserror::Error;

#[derive(Error, Debug)]
pub enum GazetteerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to load '{path}': {reason}")]
    LoadError { path: String, reason: String },

    #[error("Unsupported data format for '{path}' (expected .csv or .json)")]
    UnsupportedFormatError { path: String },

    #[error("Duplicate zip code '{zip}' in source data")]
    DuplicateZipError { zip: String },

    #[error("No zip codes found for {city}{}", state_suffix(.state))]
    CityNotFound { city: String, state: Option<String> },

    #[error("No information found for zipcode {zip}")]
    ZipNotFound { zip: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

fn state_suffix(state: &Option<String>) -> String {
    state.as_ref().map(|s| format!(", {}", s)).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    DataSource,
    Query,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl GazetteerError {
    pub fn load(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::LoadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_)
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::LoadError { .. }
            | Self::UnsupportedFormatError { .. }
            | Self::DuplicateZipError { .. } => ErrorCategory::DataSource,
            Self::CityNotFound { .. } | Self::ZipNotFound { .. } => ErrorCategory::Query,
            Self::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Query | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::DataSource => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::IoError(_) => "Check that the data file exists and is readable".to_string(),
            Self::CsvError(_) => {
                "Make sure the CSV has a header row with zip, city, state_id, lat, lng, population"
                    .to_string()
            }
            Self::SerializationError(_) => "Make sure the input is valid JSON".to_string(),
            Self::LoadError { path, .. } => {
                format!("Regenerate '{}' with the `reduce zips` command", path)
            }
            Self::UnsupportedFormatError { .. } => {
                "Point --zips at a .csv or .json file".to_string()
            }
            Self::DuplicateZipError { .. } => {
                "Remove the duplicate rows or run without --strict-zips".to_string()
            }
            Self::CityNotFound { state, .. } => {
                if state.is_some() {
                    "City names are case-sensitive; check spelling or drop the state filter"
                        .to_string()
                } else {
                    "City names are case-sensitive; check the spelling".to_string()
                }
            }
            Self::ZipNotFound { .. } => "Zip codes are 5 digits, zero-padded".to_string(),
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Check the command-line arguments and the config file".to_string()
            }
            Self::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::DataSource => format!("Could not read zip data: {}", self),
            ErrorCategory::Query => self.to_string(),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GazetteerError>;
