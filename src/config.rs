use std::path::Path;

pub const API_URL: &str = "https://api.luxdrop.com/external/affiliates";

pub const API_KEY_VAR: &str = "LUXDROP_API_KEY";
pub const ENV_FILE: &str = ".env";

pub const DEFAULT_AFFILIATE_CODE: &str = "Colby";
pub const DEFAULT_DATE_START: &str = "2025-10-01";
pub const DEFAULT_DATE_END: &str = "2025-10-31";

// Last-resort credential for environments where no key is provisioned.
pub const FALLBACK_API_KEY: &str =
    "c1d4f9dc2df3bf5ba5c72cd6aaa96afe9a5ddc4a8f43ef495d78b2875c980bf2";

pub fn resolve_api_key() -> String {
    if let Ok(value) = std::env::var(API_KEY_VAR) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match std::fs::read_to_string(Path::new(ENV_FILE)) {
        Ok(contents) => match api_key_from_env_file(&contents) {
            Some(key) => {
                tracing::debug!("API key loaded from {ENV_FILE}");
                key
            }
            None => {
                tracing::debug!("no {API_KEY_VAR} entry in {ENV_FILE}, using fallback key");
                FALLBACK_API_KEY.to_string()
            }
        },
        Err(_) => {
            tracing::debug!("could not read {ENV_FILE}, using fallback key");
            FALLBACK_API_KEY.to_string()
        }
    }
}

// The value is everything after the first `=`, trimmed.
pub fn api_key_from_env_file(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix(API_KEY_VAR)?;
        let value = rest.trim_start().strip_prefix('=')?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_file_line_parses() {
        let contents = "SOME_OTHER=1\nLUXDROP_API_KEY=abc123\n";
        assert_eq!(api_key_from_env_file(contents).as_deref(), Some("abc123"));
    }

    #[test]
    fn value_keeps_everything_after_the_first_equals() {
        let contents = "LUXDROP_API_KEY=abc=123=xyz";
        assert_eq!(api_key_from_env_file(contents).as_deref(), Some("abc=123=xyz"));
    }

    #[test]
    fn value_is_trimmed() {
        let contents = "LUXDROP_API_KEY = abc123  \n";
        assert_eq!(api_key_from_env_file(contents).as_deref(), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_entry_yields_none() {
        assert_eq!(api_key_from_env_file("OTHER_KEY=1\n"), None);
        assert_eq!(api_key_from_env_file("LUXDROP_API_KEY=\n"), None);
        assert_eq!(api_key_from_env_file(""), None);
    }

    #[test]
    fn similar_variable_names_do_not_match() {
        assert_eq!(api_key_from_env_file("LUXDROP_API_KEY_OLD=zzz\n"), None);
    }
}
