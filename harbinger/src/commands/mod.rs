/// Image inventory commands
pub mod image;

/// Notification commands
pub mod notif;

/// Version command handlers
pub mod version;
