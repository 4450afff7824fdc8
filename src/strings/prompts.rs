//! # Prompts
//!
//! Persona instruction sent to the LLM for free-form replies.

pub const PERSONA_TEMPLATE: &str = "You are {{BOT}}. Reply helpfully and briefly.";

/// A builder for rendering prompts with context.
pub struct PromptRenderer<'a> {
    template: &'a str,
    replacements: Vec<(&'a str, String)>,
}

impl<'a> PromptRenderer<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            replacements: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.replacements.push((key, value.into()));
        self
    }

    pub fn render(self) -> String {
        let mut result = self.template.to_string();
        for (key, value) in self.replacements {
            result = result.replace(key, &value);
        }

        if let Some(start) = result.find("{{")
            && let Some(end) = result[start..].find("}}")
        {
            tracing::error!(
                "Unreplaced placeholder in rendered prompt: {}",
                &result[start..start + end + 2]
            );
        }

        result
    }
}

pub fn persona(bot: &str) -> String {
    PromptRenderer::new(PERSONA_TEMPLATE).set("{{BOT}}", bot).render()
}

/// Persona instruction followed by the user's full message.
pub fn free_form(bot: &str, raw: &str) -> String {
    format!("{}\n\nThe user said: {raw}", persona(bot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_form_prompt_layout() {
        let prompt = free_form("PointsBot", "what is /weird");
        assert!(prompt.starts_with("You are PointsBot. Reply helpfully and briefly."));
        assert!(prompt.ends_with("The user said: what is /weird"));
    }

    #[test]
    fn test_renderer_replaces_every_key() {
        let out = PromptRenderer::new("{{A}} and {{B}}")
            .set("{{A}}", "x")
            .set("{{B}}", "y")
            .render();
        assert_eq!(out, "x and y");
    }
}
