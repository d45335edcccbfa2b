//! Path expansion shared by the CLI and the file dialog, so a texture named
//! on the command line resolves the same way a shell would resolve it.
//!
//! Types:
//!
//! - `PathResolver` remembers the caller's working directory and performs
//!   `$VAR`/`~` expansion plus relative-path normalization.
//!
//! Functions:
//!
//! - `PathResolver::expand_path` substitutes environment variables and the
//!   home prefix, logging the transformation for troubleshooting.
//! - `PathResolver::normalize_local_path` prefers a working-directory
//!   candidate when it exists on disk, falling back to the expanded path.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories_next::BaseDirs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PathResolver {
    cwd: PathBuf,
}

impl PathResolver {
    pub fn new() -> Result<Self> {
        let cwd = env::current_dir().context("failed to resolve current working directory")?;
        Ok(Self { cwd })
    }

    pub fn with_cwd<P: Into<PathBuf>>(cwd: P) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Expands `$VAR`, `${VAR}`, and a leading `~` in the input.
    pub fn expand_path(&self, input: &str) -> Result<PathBuf> {
        let expanded = expand_tilde(&expand_env(input)?)?;
        let path = PathBuf::from(expanded);
        debug!(original = %input, expanded = %path.display(), "expanded texture path");
        Ok(path)
    }

    /// Resolves a texture path the way the viewer should interpret CLI input:
    /// absolute paths pass through, relative paths prefer an existing file
    /// under the working directory.
    pub fn normalize_local_path(&self, input: &str) -> Result<PathBuf> {
        let expanded = self.expand_path(input)?;
        if expanded.is_absolute() {
            return Ok(expanded);
        }

        if expanded.as_os_str().is_empty() {
            anyhow::bail!("texture path must not be empty");
        }

        let candidate = self.cwd.join(&expanded);
        if candidate.exists() {
            debug!(original = %input, normalized = %candidate.display(), "using cwd texture path");
            return Ok(candidate);
        }

        debug!(
            original = %input,
            normalized = %expanded.display(),
            "falling back to expanded texture path"
        );
        Ok(expanded)
    }
}

fn expand_tilde(input: &str) -> Result<String> {
    if !input.starts_with('~') {
        return Ok(input.to_string());
    }

    let base_dirs =
        BaseDirs::new().ok_or_else(|| anyhow!("unable to determine home directory for '~' expansion"))?;
    let home_dir = base_dirs.home_dir();

    if input == "~" {
        return Ok(home_dir.to_string_lossy().into_owned());
    }

    if let Some(rest) = input.strip_prefix("~/") {
        return Ok(home_dir.join(rest).to_string_lossy().into_owned());
    }

    anyhow::bail!("user-specific home expansion ('{input}') is not supported")
}

fn expand_env(input: &str) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            // A backslash escapes the next character, including '$'.
            output.push(chars.next().unwrap_or('\\'));
            continue;
        }

        if ch != '$' {
            output.push(ch);
            continue;
        }

        match chars.peek() {
            None => {
                output.push('$');
                break;
            }
            Some('{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }

                if !closed {
                    anyhow::bail!("missing closing '}}' in environment variable reference");
                }
                if name.is_empty() {
                    anyhow::bail!("environment variable name must not be empty");
                }

                let value = env::var(&name)
                    .map_err(|_| anyhow!("environment variable '{name}' is not set"))?;
                output.push_str(&value);
            }
            Some(&c) if is_env_name_char(c) => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_env_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                let value = env::var(&name)
                    .map_err(|_| anyhow!("environment variable '{name}' is not set"))?;
                output.push_str(&value);
            }
            _ => {
                output.push('$');
            }
        }
    }

    Ok(output)
}

fn is_env_name_char(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_environment_variables() {
        env::set_var("DXTEX_PATH_TEST", "textures");
        let resolver = PathResolver::with_cwd("/");
        let path = resolver.expand_path("/data/$DXTEX_PATH_TEST/wood.dds").unwrap();
        assert_eq!(path, PathBuf::from("/data/textures/wood.dds"));
        env::remove_var("DXTEX_PATH_TEST");
    }

    #[test]
    fn fails_on_unset_variable() {
        let resolver = PathResolver::with_cwd("/");
        let err = resolver.expand_path("/data/$DXTEX_UNSET_TEST").unwrap_err();
        assert!(err.to_string().contains("DXTEX_UNSET_TEST"));
    }

    #[test]
    fn expands_home_prefix() {
        let resolver = PathResolver::with_cwd("/");
        let expanded = resolver.expand_path("~").unwrap();
        assert!(expanded.is_absolute());
    }

    #[test]
    fn escaped_dollar_is_literal() {
        let resolver = PathResolver::with_cwd("/");
        let path = resolver.expand_path("/data/\\$literal.dds").unwrap();
        assert_eq!(path, PathBuf::from("/data/$literal.dds"));
    }

    #[test]
    fn prefers_existing_cwd_candidate() {
        let temp = tempfile::tempdir().unwrap();
        let file_path = temp.path().join("brick.dds");
        std::fs::write(&file_path, b"DDS ").unwrap();

        let resolver = PathResolver::with_cwd(temp.path());
        let normalized = resolver.normalize_local_path("brick.dds").unwrap();
        assert_eq!(normalized, file_path);
    }

    #[test]
    fn missing_relative_path_falls_back_to_expansion() {
        let resolver = PathResolver::with_cwd("/definitely/not/here");
        let normalized = resolver.normalize_local_path("absent.dds").unwrap();
        assert_eq!(normalized, PathBuf::from("absent.dds"));
    }
}
