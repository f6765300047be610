/*!
 * Wire protocol between a batch and one chat request.
 *
 * A batch of texts is sent as a single prompt with numbered segment
 * markers; the response is split back on the same markers. The split is
 * strict: a response that does not yield exactly one segment per input
 * is an `InvalidResponse`, never zipped against the wrong spans.
 */

use crate::errors::ProviderError;
use crate::language_utils;

/// Final marker closing the last segment
const END_MARKER: &str = "<<END>>";

fn entry_marker(index: usize) -> String {
    format!("<<ENTRY_{}>>", index)
}

/// Combine ordered texts into one marked-up prompt payload
pub fn join_segments(texts: &[String]) -> String {
    let mut combined = String::new();
    for (index, text) in texts.iter().enumerate() {
        combined.push_str(&entry_marker(index));
        combined.push('\n');
        combined.push_str(text);
        combined.push('\n');
    }
    combined.push_str(END_MARKER);
    combined
}

/// Split a marked-up response back into exactly `expected` segments
pub fn split_segments(response: &str, expected: usize) -> Result<Vec<String>, ProviderError> {
    let mut segments = Vec::with_capacity(expected);
    let mut cursor = 0;

    for index in 0..expected {
        let start_marker = entry_marker(index);
        let end_marker = if index == expected - 1 {
            END_MARKER.to_string()
        } else {
            entry_marker(index + 1)
        };

        let start = response[cursor..]
            .find(&start_marker)
            .map(|pos| pos + cursor + start_marker.len())
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!("missing segment marker {}", start_marker))
            })?;

        let end = response[start..]
            .find(&end_marker)
            .map(|pos| pos + start)
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!("missing segment marker {}", end_marker))
            })?;

        segments.push(response[start..end].trim().to_string());
        cursor = end;
    }

    Ok(segments)
}

/// Render the configured system prompt for a language pair.
///
/// Language codes are expanded to readable names when they validate,
/// which is what translation models respond to best; unknown codes pass
/// through untouched.
pub fn render_system_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    let source = language_utils::get_language_name(source_language)
        .unwrap_or_else(|_| source_language.to_string());
    let target = language_utils::get_language_name(target_language)
        .unwrap_or_else(|_| target_language.to_string());

    template
        .replace("{source_language}", &source)
        .replace("{target_language}", &target)
}

/// Instruction appended to the user payload so the model echoes markers back
pub fn batch_instruction() -> &'static str {
    "Translate the text between the segment markers. Keep every <<ENTRY_n>> and <<END>> \
     marker exactly where it is and in order; translate only the text between markers."
}
