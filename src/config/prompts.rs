//! Prompt templates for Spor.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub ask: AskPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AskPrompts {
    /// System prompt for the completion call.
    pub system: String,
    /// Prompt header placed before the transcript sections.
    pub introduction: String,
    /// Footer template carrying the question; appended unconditionally.
    pub question: String,
}

impl Default for AskPrompts {
    fn default() -> Self {
        Self {
            system: "You answer questions about podcasts when given the content of a podcast."
                .to_string(),

            introduction: "You are a very enthusiastic podcast analyst who loves to help people! \
                           Given the podcast transcript, answer the question using the information \
                           provided as much as possible. If you are unsure and the answer is not \
                           explicitly written, tell the user that you are unsure, and that you \
                           would recommend they listen to the podcast again. Responses that are \
                           detailed, specific, nuanced and long will be rewarded."
                .to_string(),

            question: "\n\nQuestion: {{question}}".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom
    /// directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let ask_path = custom_path.join("ask.toml");
            if ask_path.exists() {
                let content = std::fs::read_to_string(&ask_path)?;
                prompts.ask = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom
    /// config variables. Provided variables take precedence.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.ask.system.is_empty());
        assert!(prompts.ask.question.contains("{{question}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "\n\nQuestion: {{question}}";
        let mut vars = std::collections::HashMap::new();
        vars.insert("question".to_string(), "Who was the guest?".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "\n\nQuestion: Who was the guest?");
    }

    #[test]
    fn test_custom_variables_do_not_override_call_vars() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("question".to_string(), "from config".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("question".to_string(), "from call".to_string());

        let result = prompts.render_with_custom("{{question}}", &vars);
        assert_eq!(result, "from call");
    }
}
