pub mod directory;
pub mod feed;
pub mod models;

pub use directory::SessionDirectory;
pub use feed::SessionFeed;
pub use models::{Session, SessionHandle, SESSIONS};
