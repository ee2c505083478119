// ============================================================================
// scenecut-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and input validation errors
//
// The CLI reuses CoreError so that failures from the core library and from
// argument checks print the same way.
//
// AI-ASSISTANT-INFO: CLI error handling utilities

// ---- Internal crate imports ----
use scenecut_core::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::path::Path;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Fails with a readable message when `input` does not exist.
pub fn validate_input_path(input: &Path) -> CliResult<()> {
    if input.exists() {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "Invalid input path '{}': no such file or directory",
            input.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input_path() {
        assert!(validate_input_path(Path::new(".")).is_ok());
        let err = validate_input_path(Path::new("surely/this/does/not/exist.mkv")).unwrap_err();
        assert!(err.to_string().contains("Invalid input path"));
    }
}
