//! Help command - displays available commands.

use crate::commands::CommandHandler;
use crate::error::AppResult;
use async_trait::async_trait;
use chat_client::IncomingMessage;
use pagination::Glyphs;

pub struct HelpHandler {
    text: String,
}

impl HelpHandler {
    /// Build the help text for the given `(trigger, description)` commands.
    pub fn new(commands: &[(&str, &str)], glyphs: &Glyphs) -> Self {
        let mut text = String::from("**Commands:**\n");
        for (trigger, description) in commands {
            text.push_str(&format!("- {} <query> - {}\n", trigger, description));
        }
        text.push_str("- !help - Show this message\n\n");
        text.push_str(&format!(
            "**Browsing:**\nReact with {} or {} to flip pages and {} to close the results. \
             Only the person who searched can page, and idle results stop responding after a while.",
            glyphs.back, glyphs.forward, glyphs.stop
        ));
        Self { text }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    fn trigger(&self) -> &str {
        "!help"
    }

    async fn execute(&self, _message: &IncomingMessage) -> AppResult<Option<String>> {
        Ok(Some(self.text.clone()))
    }
}
