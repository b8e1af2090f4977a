use std::io;
use std::path::{Path, PathBuf};

const TOKENIZER_FILE: &str = "tokenizer.json";
const TOKENIZER_CONFIG_FILE: &str = "tokenizer_config.json";

/// Resolves `tokenizer.json` from a model directory, an explicit tokenizer.json
/// path, or any other file inside the model directory.
pub fn resolve_tokenizer_file(model_path: &Path) -> io::Result<PathBuf> {
    if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new(TOKENIZER_FILE))
    {
        Ok(model_path.to_path_buf())
    } else if model_path.is_dir() {
        Ok(model_path.join(TOKENIZER_FILE))
    } else {
        Ok(model_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join(TOKENIZER_FILE))
    }
}

/// Returns the sibling `tokenizer_config.json` of a tokenizer file, if present.
pub fn sibling_tokenizer_config(tokenizer_file: &Path) -> Option<PathBuf> {
    let candidate = tokenizer_file.parent()?.join(TOKENIZER_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}
