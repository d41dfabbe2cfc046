pub mod clock;
pub mod notifications;
