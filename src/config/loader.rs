//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check and raw read (UTF-8 BOM stripped)
//! 2. Environment variable expansion (pre-parse, on raw text)
//! 3. JSON or YAML parsing, chosen by file extension
//! 4. Conversion to the tagged [`ConfigValue`] tree
//! 5. Promotion of `devices.default` / `projects.default` to identifiers
//!
//! The loader does not validate; callers run
//! [`Validator`](crate::config::validation::Validator) on the result.

use std::path::{Path, PathBuf};

use serde_yaml::Value as YamlValue;
use tracing::debug;

use crate::config::schema::{DEVICES, PROJECTS};
use crate::config::value::{ConfigValue, DEFAULT_KEY, Mapping};
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// YAML tag marking a scalar as an identifier (`default: !id living_room`).
pub const IDENTIFIER_TAG: &str = "id";

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,

    /// Expand `${VAR}` references in YAML documents before parsing.
    ///
    /// JSON documents are always read literally; `~/.roku_config.json`
    /// stores passwords verbatim and they may contain `$`.
    pub substitute_env: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_config_size: env_or("ROKU_DEPLOY_MAX_CONFIG_SIZE", 1024 * 1024),
            substitute_env: true,
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed configuration tree.
    pub config: ConfigValue,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Source syntax of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from a file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - A required `${VAR:?message}` reference is unset
    /// - Parsing fails or the document is empty
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > self.options.max_config_size {
            return Err(ConfigError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {} bytes", self.options.max_config_size),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        debug!(path = %path.display(), bytes = raw.len(), "read configuration");
        self.load_from_str(&raw, path, ConfigFormat::from_path(path))
    }

    /// Loads a configuration from in-memory text.
    ///
    /// `source` is only used for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if environment expansion or parsing fails, or the
    /// document is empty.
    pub fn load_from_str(
        &self,
        raw: &str,
        source: &Path,
        format: ConfigFormat,
    ) -> Result<LoadResult, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let mut warnings = Vec::new();
        let expanded = if self.options.substitute_env && format == ConfigFormat::Yaml {
            let mut env_sub = EnvSubstitution::new(source);
            let text = env_sub.substitute(raw)?;
            warnings.extend(env_sub.warnings);
            text
        } else {
            raw.to_string()
        };

        let mut config = match format {
            ConfigFormat::Json => parse_json(&expanded, source)?,
            ConfigFormat::Yaml => parse_yaml(&expanded, source)?,
        };

        if config.is_null() {
            return Err(ConfigError::ParseError {
                path: source.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        promote_defaults(&mut config);

        Ok(LoadResult { config, warnings })
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_yaml(text: &str, source: &Path) -> Result<ConfigValue, ConfigError> {
    let root: YamlValue = serde_yaml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: source.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })?;
    yaml_to_config(root, source)
}

fn parse_json(text: &str, source: &Path) -> Result<ConfigValue, ConfigError> {
    if text.trim().is_empty() {
        return Ok(ConfigValue::Null);
    }
    let root: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ConfigError::ParseError {
            path: source.to_path_buf(),
            line: Some(e.line()),
            message: e.to_string(),
        })?;
    Ok(json_to_config(root))
}

/// Converts a parsed YAML document into the tagged tree.
///
/// Scalars tagged `!id` become identifiers; other tags are ignored.
fn yaml_to_config(value: YamlValue, source: &Path) -> Result<ConfigValue, ConfigError> {
    Ok(match value {
        YamlValue::Null => ConfigValue::Null,
        YamlValue::Bool(b) => ConfigValue::Bool(b),
        YamlValue::Number(n) => ConfigValue::Number(n),
        YamlValue::String(s) => ConfigValue::String(s),
        YamlValue::Sequence(items) => ConfigValue::Sequence(
            items
                .into_iter()
                .map(|item| yaml_to_config(item, source))
                .collect::<Result<_, _>>()?,
        ),
        YamlValue::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, value) in map {
                out.insert(scalar_key(&key, source)?, yaml_to_config(value, source)?);
            }
            ConfigValue::Mapping(out)
        }
        YamlValue::Tagged(tagged) => {
            if tagged.tag == IDENTIFIER_TAG {
                match tagged.value {
                    YamlValue::String(name) => ConfigValue::Identifier(name),
                    YamlValue::Number(n) => ConfigValue::Identifier(n.to_string()),
                    other => {
                        return Err(ConfigError::InvalidValue {
                            field: format!("!{IDENTIFIER_TAG}"),
                            value: format!("{other:?}"),
                            expected: "a string or number".to_string(),
                        });
                    }
                }
            } else {
                yaml_to_config(tagged.value, source)?
            }
        }
    })
}

fn scalar_key(key: &YamlValue, source: &Path) -> Result<String, ConfigError> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        other => Err(ConfigError::ParseError {
            path: source.to_path_buf(),
            line: None,
            message: format!("mapping keys must be scalars, found {other:?}"),
        }),
    }
}

fn json_to_config(value: serde_json::Value) -> ConfigValue {
    match value {
        serde_json::Value::Null => ConfigValue::Null,
        serde_json::Value::Bool(b) => ConfigValue::Bool(b),
        serde_json::Value::Number(n) => ConfigValue::Number(json_number(&n)),
        serde_json::Value::String(s) => ConfigValue::String(s),
        serde_json::Value::Array(items) => {
            ConfigValue::Sequence(items.into_iter().map(json_to_config).collect())
        }
        serde_json::Value::Object(map) => ConfigValue::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, json_to_config(v)))
                .collect(),
        ),
    }
}

fn json_number(n: &serde_json::Number) -> serde_yaml::Number {
    if let Some(i) = n.as_i64() {
        i.into()
    } else if let Some(u) = n.as_u64() {
        u.into()
    } else {
        n.as_f64().unwrap_or(f64::NAN).into()
    }
}

/// Turns string `default` references into identifiers.
///
/// Non-string defaults are left alone so the validator can reject them.
fn promote_defaults(config: &mut ConfigValue) {
    let ConfigValue::Mapping(root) = config else {
        return;
    };
    for section in [DEVICES, PROJECTS] {
        let Some(ConfigValue::Mapping(entries)) = root.get_mut(section) else {
            continue;
        };
        if let Some(slot) = entries.get_mut(DEFAULT_KEY) {
            if let ConfigValue::String(name) = slot {
                let name = std::mem::take(name);
                *slot = ConfigValue::Identifier(name);
            }
        }
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Pre-parse environment variable substitution.
///
/// Supports:
/// - `${VAR}` - value, or empty string with a warning when unset
/// - `${VAR:-default}` - value, or `default` when unset
/// - `${VAR:?message}` - value, or an error carrying `message` when unset
/// - `$$` - literal `$`
struct EnvSubstitution<'a> {
    source: &'a Path,
    warnings: Vec<LoadWarning>,
}

/// What to do when a referenced variable is unset.
enum Fallback {
    Warn,
    Default(String),
    Fail(String),
}

impl<'a> EnvSubstitution<'a> {
    const fn new(source: &'a Path) -> Self {
        Self {
            source,
            warnings: Vec::new(),
        }
    }

    fn substitute(&mut self, raw: &str) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let (name, fallback) = self.parse_reference(&mut chars)?;
                    match (std::env::var(&name), fallback) {
                        (Ok(value), _) => result.push_str(&value),
                        (Err(_), Fallback::Default(value)) => result.push_str(&value),
                        (Err(_), Fallback::Fail(message)) => {
                            return Err(ConfigError::EnvVarNotSet {
                                var: name,
                                location: message,
                            });
                        }
                        (Err(_), Fallback::Warn) => self.warnings.push(LoadWarning {
                            message: format!(
                                "Environment variable '{name}' is not set, using empty string"
                            ),
                            location: Some(self.source.display().to_string()),
                        }),
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    /// Parses the inside of `${...}`; the opening brace is already consumed.
    fn parse_reference(
        &self,
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    ) -> Result<(String, Fallback), ConfigError> {
        let mut name = String::new();
        while let Some(c) = chars.next() {
            match c {
                '}' => return Ok((name, Fallback::Warn)),
                ':' if chars.peek() == Some(&'-') => {
                    chars.next();
                    return Ok((name, Fallback::Default(self.read_until_close(chars)?)));
                }
                ':' if chars.peek() == Some(&'?') => {
                    chars.next();
                    return Ok((name, Fallback::Fail(self.read_until_close(chars)?)));
                }
                _ => name.push(c),
            }
        }
        Err(self.unclosed(&name))
    }

    /// Reads up to the matching `}`, allowing nested braces.
    fn read_until_close(
        &self,
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    ) -> Result<String, ConfigError> {
        let mut value = String::new();
        let mut depth = 1usize;
        for c in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(c);
        }
        Err(self.unclosed(&value))
    }

    fn unclosed(&self, fragment: &str) -> ConfigError {
        ConfigError::ParseError {
            path: self.source.to_path_buf(),
            line: None,
            message: format!("Unclosed environment variable reference: ${{{fragment}"),
        }
    }
}

pub(crate) fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Default location of the user's configuration file.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".roku_config.json"))
}

// ============================================================================
// Tests
// ============================================================================
