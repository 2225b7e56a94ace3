//! Prompt construction for the completion service

/// Build the instruction sent as the single user message.
///
/// The trimmed English text is embedded in quotes; the reply contract asks
/// for a bare JSON object with `spanish` and `phonetic` string fields.
pub fn build_translation_prompt(text: &str) -> String {
    format!(
        r#"Translate the following English text to Spanish and provide a phonetic pronunciation guide (how to sound it out for English speakers).

English text: "{text}"

Respond with ONLY a valid JSON object in this exact format. DO NOT include any other text or explanation:
{{
  "spanish": "the Spanish translation",
  "phonetic": "the phonetic pronunciation (hyphenated syllables)"
}}

IMPORTANT: Your response must be ONLY valid JSON. No markdown, no backticks, no extra text."#
    )
}
