pub mod camera;
pub mod speech;
pub mod transport;

pub use camera::{Camera, CameraError, CameraGuard};
pub use speech::{SpeechController, SpeechEngine, TracingSpeechEngine, Utterance};
pub use transport::{HttpReply, MultipartFile, MultipartForm, ReqwestTransport, Transport};
