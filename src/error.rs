use thiserror::Error;

pub type ToolsheetResult<T> = Result<T, ToolsheetError>;

#[derive(Error, Debug)]
pub enum ToolsheetError {
    #[error("Error loading the Excel file: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

impl From<calamine::XlsxError> for ToolsheetError {
    fn from(err: calamine::XlsxError) -> Self {
        ToolsheetError::Load(err.to_string())
    }
}

impl From<zip::result::ZipError> for ToolsheetError {
    fn from(err: zip::result::ZipError) -> Self {
        ToolsheetError::Load(err.to_string())
    }
}

impl From<quick_xml::Error> for ToolsheetError {
    fn from(err: quick_xml::Error) -> Self {
        ToolsheetError::Load(err.to_string())
    }
}

impl From<serde_yaml::Error> for ToolsheetError {
    fn from(err: serde_yaml::Error) -> Self {
        ToolsheetError::Mapping(err.to_string())
    }
}
