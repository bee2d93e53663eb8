use std::sync::Arc;

use crate::utils::config::ConfigManager;

#[derive(Clone)]
pub struct BotData {
    pub config: Arc<ConfigManager>,
}
