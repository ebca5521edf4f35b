/// Configuration system for sentimen.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** from [`schema::SentimenConfig::default()`]
/// 2. **User global config** at `~/.sentimen/config.toml`
/// 3. **Project local config** at `.sentimen.toml` in the working directory
/// 4. **Environment variables**: `SENTIMEN_*` overrides (highest precedence)
///
/// File layers are merged key by key: a file that only sets
/// `backend.base_url` leaves every other value from the layer below intact.
///
/// # Usage
///
/// ```rust,ignore
/// use sentimen::config;
///
/// let cfg = config::load();
/// let transport = UreqTransport::new(&cfg.backend.base_url, cfg.backend.timeout());
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::SentimenConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration: defaults → global TOML → project
/// TOML → env vars.
pub fn load() -> SentimenConfig {
    let files = [global_config_path(), project_config_path()];
    let mut config = load_layers(files.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Merge the given TOML files over the defaults, in order.
///
/// Missing files are skipped. Malformed files are skipped with a warning so
/// a typo never locks the user out of the tool.
fn load_layers<'a>(paths: impl Iterator<Item = &'a Path>) -> SentimenConfig {
    let Ok(mut merged) = toml::Value::try_from(SentimenConfig::default()) else {
        return SentimenConfig::default();
    };

    for path in paths {
        if let Some(layer) = load_toml_file(path) {
            merge_values(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_else(|e| {
        log::warn!("ignoring config files: {e}");
        SentimenConfig::default()
    })
}

/// Read a TOML file as an untyped value tree. `None` if missing or malformed.
fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("skipping malformed config {}: {e}", path.display());
            None
        }
    }
}

/// Recursively overlay `overlay` onto `base`; tables merge, anything else
/// replaces.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.sentimen/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".sentimen").join("config.toml"))
}

/// `.sentimen.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".sentimen.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment overrides (highest precedence layer).
///
/// Supported variables:
/// - `SENTIMEN_BACKEND_URL`: backend origin
/// - `SENTIMEN_TIMEOUT_MS`: request timeout; `0` or empty clears it
/// - `SENTIMEN_LISTEN`: address for `sentimen serve`
/// - `SENTIMEN_STORAGE_DIR`: data directory
/// - `SENTIMEN_EVENTS`: activity log on/off (`1`/`true`/`yes`/`on`)
/// - `SENTIMEN_LOG`: console log level
fn apply_env_overrides(config: &mut SentimenConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("SENTIMEN_BACKEND_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Some(val) = var("SENTIMEN_TIMEOUT_MS") {
        config.backend.timeout_ms = val.parse::<u64>().ok().filter(|ms| *ms > 0);
    }
    if let Some(val) = var("SENTIMEN_LISTEN")
        && !val.is_empty()
    {
        config.ui.listen = val;
    }
    if let Some(val) = var("SENTIMEN_STORAGE_DIR")
        && !val.is_empty()
    {
        config.storage.dir = Some(val);
    }
    if let Some(val) = var("SENTIMEN_EVENTS") {
        config.logging.events = is_truthy(&val);
    }
    if let Some(val) = var("SENTIMEN_LOG")
        && !val.is_empty()
    {
        config.logging.level = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / show
// ---------------------------------------------------------------------------

/// Write the annotated default config to `~/.sentimen/config.toml`.
///
/// Fails if the file exists, unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.sentimen/ directory")?;
    }

    fs::write(&path, SentimenConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set one dotted key (e.g. `backend.base_url`) in the global config file,
/// keeping the type of the existing value.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SentimenConfig::default())
            .context("failed to serialize default config")?
    };

    let output = update_toml(&content, key, value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(path)
}

/// Apply one `key = value` edit to a TOML document and check the result
/// still describes a valid config.
fn update_toml(content: &str, key: &str, value: &str) -> Result<String> {
    let mut root: toml::Value =
        toml::from_str(content).context("failed to parse config as TOML value")?;

    set_toml_value(&mut root, key, value)?;

    let _: SentimenConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': '{value}'"))?;

    toml::to_string_pretty(&root).context("failed to serialize updated config")
}

/// Set a value in a TOML tree by dotted key path.
///
/// The section must exist in the schema. Existing values keep their type;
/// a key that is not set yet (e.g. an optional timeout) is typed from the
/// raw value.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must look like 'section.key', got '{key}'");
    };

    let defaults = toml::Value::try_from(SentimenConfig::default())
        .context("failed to serialize default config")?;
    let known_section = section_path
        .split('.')
        .try_fold(&defaults, |node, part| node.get(part))
        .is_some();
    if !known_section {
        anyhow::bail!("config key not found: section '{section_path}' in '{key}'");
    }

    let mut current = root;
    for part in section_path.split('.') {
        let table = current
            .as_table_mut()
            .with_context(|| format!("expected table at '{section_path}'"))?;
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section_path}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => match raw_value.parse::<i64>() {
            Ok(n) => toml::Value::Integer(n),
            Err(_) => toml::Value::String(raw_value.to_string()),
        },
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn scratch_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sentimen-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn layers_merge_key_by_key() {
        let global = scratch_file(
            "global.toml",
            "[backend]\nbase_url = \"http://global:5000\"\n[ui]\npreview_rows = 5\n",
        );
        let project = scratch_file("project.toml", "[ui]\nlisten = \"0.0.0.0:9000\"\n");

        let config = load_layers([global.as_path(), project.as_path()].into_iter());

        assert_eq!(config.backend.base_url, "http://global:5000");
        assert_eq!(config.ui.preview_rows, 5);
        assert_eq!(config.ui.listen, "0.0.0.0:9000");
        assert_eq!(config.ui.wordcloud_timeout_ms, 2000);
    }

    #[test]
    fn malformed_layer_is_skipped() {
        let broken = scratch_file("broken.toml", "[backend\nbase_url = ");
        let good = scratch_file("good.toml", "[logging]\nlevel = \"debug\"\n");

        let config = load_layers([broken.as_path(), good.as_path()].into_iter());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn missing_files_yield_defaults() {
        let missing = std::env::temp_dir().join("sentimen-no-such-config.toml");
        let config = load_layers(std::iter::once(missing.as_path()));
        assert_eq!(config, SentimenConfig::default());
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SENTIMEN_BACKEND_URL", "https://api.example.id"),
            ("SENTIMEN_TIMEOUT_MS", "2500"),
            ("SENTIMEN_EVENTS", "off"),
            ("SENTIMEN_LOG", "debug"),
        ]);
        let mut config = SentimenConfig::default();
        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.backend.base_url, "https://api.example.id");
        assert_eq!(config.backend.timeout_ms, Some(2500));
        assert!(!config.logging.events);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn zero_timeout_env_clears_timeout() {
        let mut config = SentimenConfig::default();
        config.backend.timeout_ms = Some(100);
        apply_env_overrides(&mut config, |name| {
            (name == "SENTIMEN_TIMEOUT_MS").then(|| "0".to_string())
        });
        assert!(config.backend.timeout_ms.is_none());
    }

    #[test]
    fn is_truthy_accepts_variants() {
        for yes in ["1", "true", "TRUE", "yes", "on"] {
            assert!(is_truthy(yes));
        }
        for no in ["0", "false", "no", "off", ""] {
            assert!(!is_truthy(no));
        }
    }

    #[test]
    fn update_preserves_value_types() {
        let base = toml::to_string_pretty(&SentimenConfig::default()).unwrap();

        let updated = update_toml(&base, "ui.open_browser", "no").unwrap();
        let config: SentimenConfig = toml::from_str(&updated).unwrap();
        assert!(!config.ui.open_browser);

        let updated = update_toml(&updated, "ui.preview_rows", "25").unwrap();
        let config: SentimenConfig = toml::from_str(&updated).unwrap();
        assert_eq!(config.ui.preview_rows, 25);
    }

    #[test]
    fn update_types_unset_optional_keys() {
        let base = toml::to_string_pretty(&SentimenConfig::default()).unwrap();
        let updated = update_toml(&base, "backend.timeout_ms", "30000").unwrap();
        let config: SentimenConfig = toml::from_str(&updated).unwrap();
        assert_eq!(config.backend.timeout_ms, Some(30000));
    }

    #[test]
    fn update_rejects_bad_values_and_keys() {
        let base = toml::to_string_pretty(&SentimenConfig::default()).unwrap();
        assert!(update_toml(&base, "ui.preview_rows", "many").is_err());
        assert!(update_toml(&base, "nonexistent.key", "value").is_err());
        assert!(update_toml(&base, "toplevel", "value").is_err());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: SentimenConfig = toml::from_str(&toml_str).unwrap();
    }
}
