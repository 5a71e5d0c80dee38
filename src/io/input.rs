use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::DeepgramResponse;

/// Read a transcript from a file, or from stdin when the path is `-`
///
/// `.json` files are treated as saved Deepgram responses; anything else is
/// plain text and is returned unchanged.
pub fn read_transcript(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read transcript from stdin")?;
        return Ok(text);
    }

    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_deepgram_json(&content)
    } else {
        Ok(content)
    }
}

/// Extract transcript text from a Deepgram JSON document
pub fn parse_deepgram_json(json: &str) -> Result<String> {
    let response: DeepgramResponse =
        serde_json::from_str(json).context("Failed to parse Deepgram JSON")?;
    Ok(response.transcript())
}

/// Read an audio file for upload
pub fn read_audio(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read audio file: {:?}", path))
}
