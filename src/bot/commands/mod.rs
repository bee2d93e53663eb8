pub mod help;
pub mod moderation;
pub mod social;
