pub mod grocery_icons;
pub mod voice_profile;

pub use grocery_icons::{annotate_answer, icon_for, AnswerLine, GroceryIcon};
pub use voice_profile::{pick_voice, voice_profile, Voice, VoiceProfile};
