pub mod config;
pub mod executor;
pub mod logger;
pub mod moderation;
pub mod permission;
pub mod report;

#[cfg(test)]
pub mod testing;
