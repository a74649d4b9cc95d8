//! Default prompt templates and canned replies for plant chat

/// System prompt used when the identified plant has no personality prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly houseplant talking with the person who just photographed you. Answer in one or two short sentences, stay in character, and mention your care needs when it fits.";

/// Reply used by the offline responder
pub const CANNED_REPLY: &str = "Thanks for talking to me! I'm just a plant, but I'm listening.";

/// Reply appended when the remote chat call fails, so the turn is not lost
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't think of a reply right now.";

/// Builds the system prompt for a plant, adding its traits when known
pub fn plant_system_prompt(prompt: Option<&str>, traits: &[String]) -> String {
    let base = prompt.unwrap_or(DEFAULT_SYSTEM_PROMPT);
    if traits.is_empty() {
        base.to_string()
    } else {
        format!("{} Your traits: {}.", base, traits.join(", "))
    }
}
