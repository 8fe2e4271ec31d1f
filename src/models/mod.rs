pub mod language;
pub mod request;
pub mod response;

pub use language::{Language, OutputMethod};
pub use request::{FileType, PdfUrlRequest, QrPayload, QrProcessRequest, QueryRequest, UploadFile};
pub use response::{
    BackendStatus, DocumentList, DocumentStatus, HealthResponse, MessageResponse, QueryResponse,
};
