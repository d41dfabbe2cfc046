pub mod quota;
pub mod reminders;
pub mod scheduling;
