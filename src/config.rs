use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Flags that can be persisted in an rc file.
///
/// Files hold the same tokens as the command line, one or more per line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_wrap: bool,
    pub read_only: bool,
    pub perf: bool,
    pub tab_width: Option<usize>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets. Booleans are OR-ed; `other` wins for values.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_wrap: self.no_wrap || other.no_wrap,
            read_only: self.read_only || other.read_only,
            perf: self.perf || other.perf,
            tab_width: other.tab_width.or(self.tab_width),
            debug_log: other
                .debug_log
                .clone()
                .or_else(|| self.debug_log.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("promptpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("promptpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("promptpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("promptpad")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".promptpadrc")
}

/// Read flags from an rc file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write flags to an rc file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# promptpad defaults (saved with --save)".to_string()];
    if flags.no_wrap {
        lines.push("--no-wrap".to_string());
    }
    if flags.read_only {
        lines.push("--read-only".to_string());
    }
    if let Some(width) = flags.tab_width {
        lines.push(format!("--tab-width {width}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Delete an rc file if it exists.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the persistable flags out of a token list.
///
/// Unknown tokens are skipped, so a full argv can be passed in. Both
/// `--flag value` and `--flag=value` are accepted.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--no-wrap" => flags.no_wrap = true,
            "--read-only" => flags.read_only = true,
            "--perf" => flags.perf = true,
            "--tab-width" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.tab_width = next.parse().ok();
                    i += 1;
                }
            }
            "--debug-log" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.debug_log = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--tab-width=") {
                    flags.tab_width = value.parse().ok();
                } else if let Some(value) = token.strip_prefix("--debug-log=") {
                    flags.debug_log = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "promptpad".to_string(),
            "--no-wrap".to_string(),
            "--read-only".to_string(),
            "--tab-width".to_string(),
            "2".to_string(),
            "--debug-log=events.log".to_string(),
            "prompt.md".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_wrap);
        assert!(flags.read_only);
        assert!(!flags.perf);
        assert_eq!(flags.tab_width, Some(2));
        assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_tab_width() {
        let args = vec!["--tab-width".to_string(), "wide".to_string()];
        assert_eq!(parse_flag_tokens(&args).tab_width, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_wrap: true,
            tab_width: Some(8),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            read_only: true,
            tab_width: Some(2),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_wrap);
        assert!(merged.read_only);
        assert_eq!(merged.tab_width, Some(2));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".promptpadrc");
        let flags = ConfigFlags {
            no_wrap: true,
            read_only: true,
            perf: true,
            tab_width: Some(3),
            debug_log: Some(PathBuf::from("events.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let flags = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(flags, ConfigFlags::default());
    }
}
