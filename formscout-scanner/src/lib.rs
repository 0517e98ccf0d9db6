pub mod domain;
pub mod error;
pub mod forms;
pub mod links;
pub mod result;
pub mod scanner;

pub use error::ScanError;
pub use forms::FormSignature;
pub use result::{
    ButtonRecord, FieldRecord, FormExtraction, FormRecord, LinkExtraction, LinkRecord, OptionRecord,
};
pub use scanner::{Scanner, ScannerConfig, DEFAULT_USER_AGENT};
