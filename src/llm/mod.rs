pub mod offline;
pub mod traits;
pub mod types;

pub use offline::OfflineClient;
pub use traits::ModelClient;
pub use types::{ChatMessage, ChatRole, Completion};
