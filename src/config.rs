use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

pub const PLACEHOLDER_SECRET: &str = "change-me";
pub const DEFAULT_DATABASE_URL: &str = "sqlite:valentui.db?mode=rwc";

const DATABASE_URL_ENV: &str = "VALENTUI_DATABASE_URL";
const ADMIN_SECRET_ENV: &str = "VALENTUI_ADMIN_SECRET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keybindings: Keybindings,
    pub store: StoreConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub secret: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            secret: PLACEHOLDER_SECRET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    pub quit: Vec<String>,
    pub open_admin: Vec<String>,
    pub back: Vec<String>,
    pub submit: Vec<String>,
    pub next_field: Vec<String>,
    pub prev_field: Vec<String>,
    pub switch_contact_method: Vec<String>,
    pub next_tab: Vec<String>,
    pub prev_tab: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub scroll_up: Vec<String>,
    pub scroll_down: Vec<String>,
    pub toggle_fulfilled: Vec<String>,
    pub refresh: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            quit: keys(&["ctrl-q"]),
            open_admin: keys(&["ctrl-a"]),
            back: keys(&["Esc"]),
            submit: keys(&["ctrl-s"]),
            next_field: keys(&["Tab"]),
            prev_field: keys(&["BackTab"]),
            switch_contact_method: keys(&["ctrl-t"]),
            next_tab: keys(&["l", "Right", "Tab"]),
            prev_tab: keys(&["h", "Left", "BackTab"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            scroll_up: keys(&["K", "ctrl-u"]),
            scroll_down: keys(&["J", "ctrl-d"]),
            toggle_fulfilled: keys(&[" ", "f"]),
            refresh: keys(&["r"]),
        }
    }
}

pub fn parse_key_string(key_str: &str) -> (KeyCode, KeyModifiers) {
    // A lone "-" is the minus key, not a separator
    if key_str == "-" {
        return (KeyCode::Char('-'), KeyModifiers::empty());
    }

    let mut parts: Vec<&str> = key_str.split('-').collect();
    let mut modifiers = KeyModifiers::empty();
    let base_key_str = parts.pop().unwrap_or("");

    for part in parts {
        match part.to_lowercase().as_str() {
            "ctrl" => modifiers.insert(KeyModifiers::CONTROL),
            "alt" => modifiers.insert(KeyModifiers::ALT),
            "shift" => modifiers.insert(KeyModifiers::SHIFT),
            _ => {}
        }
    }

    let mut chars = base_key_str.chars();
    let code = match (base_key_str, chars.next(), chars.next()) {
        ("Backspace", ..) => KeyCode::Backspace,
        ("Enter", ..) => KeyCode::Enter,
        ("Left", ..) => KeyCode::Left,
        ("Right", ..) => KeyCode::Right,
        ("Up", ..) => KeyCode::Up,
        ("Down", ..) => KeyCode::Down,
        ("Tab", ..) => KeyCode::Tab,
        ("BackTab", ..) => KeyCode::BackTab,
        ("Esc", ..) => KeyCode::Esc,
        (_, Some(c), None) => KeyCode::Char(c),
        _ => KeyCode::Null,
    };

    (code, modifiers)
}

pub fn matches_key(event: KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|b| {
        let (code, modifiers) = parse_key_string(b);
        event.code == code && event.modifiers.contains(modifiers)
    })
}

impl Config {
    /// Reads `settings.toml` when present, then applies environment overrides.
    pub fn load() -> Self {
        use std::fs;
        let mut config = match fs::read_to_string("settings.toml") {
            Ok(content) => Self::from_toml_str(&content),
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        if config.admin.secret == PLACEHOLDER_SECRET {
            warn!("admin secret is the placeholder value; set {} before deploying", ADMIN_SECRET_ENV);
        }
        config
    }

    pub fn from_toml_str(content: &str) -> Self {
        toml::from_str(content).unwrap_or_else(|e| {
            warn!("invalid settings.toml, using defaults: {}", e);
            Self::default()
        })
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV) {
            info!("database url taken from {}", DATABASE_URL_ENV);
            self.store.database_url = url;
        }
        if let Some(secret) = lookup(ADMIN_SECRET_ENV) {
            info!("admin secret taken from {}", ADMIN_SECRET_ENV);
            self.admin.secret = secret;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_string_modifiers() {
        assert_eq!(parse_key_string("ctrl-s"), (KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_string("Esc"), (KeyCode::Esc, KeyModifiers::empty()));
        assert_eq!(parse_key_string(" "), (KeyCode::Char(' '), KeyModifiers::empty()));
        assert_eq!(parse_key_string("-"), (KeyCode::Char('-'), KeyModifiers::empty()));
        assert_eq!(parse_key_string("Nonsense").0, KeyCode::Null);
    }

    #[test]
    fn test_matches_key() {
        let bindings = keys(&["ctrl-s"]);
        let hit = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        let miss = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::empty());
        assert!(matches_key(hit, &bindings));
        assert!(!matches_key(miss, &bindings));
    }

    #[test]
    fn test_scroll_keys_do_not_shadow_movement() {
        let bindings = Keybindings::default();
        let shift_j = KeyEvent::new(KeyCode::Char('J'), KeyModifiers::SHIFT);
        let plain_j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::empty());
        assert!(matches_key(shift_j, &bindings.scroll_down));
        assert!(!matches_key(shift_j, &bindings.move_down));
        assert!(matches_key(plain_j, &bindings.move_down));
        assert!(!matches_key(plain_j, &bindings.scroll_down));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [store]
            database_url = "sqlite:other.db"

            [keybindings]
            quit = ["q"]
            "#,
        );
        assert_eq!(config.store.database_url, "sqlite:other.db");
        assert_eq!(config.store.timeout_secs, 10);
        assert_eq!(config.keybindings.quit, vec!["q".to_string()]);
        assert_eq!(config.keybindings.submit, vec!["ctrl-s".to_string()]);
        assert_eq!(config.admin.secret, PLACEHOLDER_SECRET);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let config = Config::from_toml_str("store = 12");
        assert_eq!(config.store.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_toml_str("[admin]\nsecret = \"from-file\"");
        config.apply_overrides(|key| match key {
            "VALENTUI_ADMIN_SECRET" => Some("from-env".to_string()),
            _ => None,
        });
        assert_eq!(config.admin.secret, "from-env");
        assert_eq!(config.store.database_url, DEFAULT_DATABASE_URL);
    }
}
