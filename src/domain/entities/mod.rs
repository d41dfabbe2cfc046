pub mod creator_profile;
pub mod monthly_usage;
pub mod plan;
pub mod planned_slot;
pub mod subscription;
