pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a command's input document from `--input`, falling back to stdin.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_document(path);
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err(format!(
            "{what} is required: provide --input <file> or pipe JSON on stdin"
        )
        .into()),
    }
}
