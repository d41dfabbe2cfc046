pub mod app;
pub mod config;
pub mod db;
pub mod reminder_worker;
pub mod seed_plans;
pub mod setup;
