pub mod query_page;
pub mod scan_session;
pub mod upload_flow;

pub use query_page::{
    categorize_query_error, PageCommand, PageError, PageEvent, Phase, QueryPage, QueryPageState,
};
pub use scan_session::{classify_scan, ScanSession, ScannedContent};
pub use upload_flow::{validate_manual_url, validate_selected_file, Severity, UploadFlow, UploadStatus};
