//! Fixed improvement template and placeholder substitution

use std::fmt;

use thiserror::Error;

use super::PromptRequest;

/// Prompt sent to the completion service. Placeholders: `{tone}`, `{variant}`, `{email}`.
pub const EMAIL_TEMPLATE: &str = r#"Below is an email that may require enhancements in its presentation or translation to English. Your tasks are:
- Translate the email to English if it's written in another language.
- Improve provided text ensuring the email has a clear structure and format.
- Modify the text to align with the chosen tone.
- Tailor the content to fit the selected English dialect.

For clarity, here are some examples:

Tones:
- Formal: "During our recent trip to Tokyo, we encountered several intriguing cultural nuances that we believe would be of interest to you."
- Informal: "Guess what? We hit up Tokyo and saw some super cool stuff! Can't wait to spill the beans!"

English Dialect Variants:
- American:
- Words: Sneakers, truck, fries, elevator, trash can, cookie, yard, pants, hood, faucet, vacation.
- Sentence: "I grabbed some fries from the diner, then took an elevator to my apartment. Planning a vacation next month!"

- British:
- Words: Trainers, lorry, chips, lift, bin, biscuit, garden, trousers, bonnet, tap, holiday.
- Sentence: "I fancied some chips from the cafe, then used the lift to reach my flat. Got a holiday lined up next month!"

It's essential for the email to have a welcoming opening. If the original email doesn't have one, please incorporate a suitable introduction.

Provided Details:
TONE: {tone}
VARIANT: {variant}
EMAIL: {email}

YOUR {variant} RESPONSE:
"#;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template placeholder {{{0}}} has no value")]
    MissingField(String),
}

/// A fully substituted prompt, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt(String);

impl RenderedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RenderedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fill [`EMAIL_TEMPLATE`] with the request's tone, dialect and email body.
pub fn render(request: &PromptRequest) -> Result<RenderedPrompt, TemplateError> {
    render_template(
        EMAIL_TEMPLATE,
        &[
            ("tone", request.tone().label()),
            ("variant", request.dialect().label()),
            ("email", request.email_body()),
        ],
    )
    .map(RenderedPrompt)
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Inserted values are never rescanned, so field text containing braces is
/// copied verbatim. Braces that do not enclose an identifier are literal.
pub fn render_template(template: &str, fields: &[(&str, &str)]) -> Result<String, TemplateError> {
    let extra: usize = fields.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let name = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|name| is_placeholder_name(name));

        match name {
            Some(name) => {
                let value = fields
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| TemplateError::MissingField(name.to_string()))?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    Ok(out)
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
