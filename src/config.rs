//! Game configuration and preferences
//!
//! `GameConfig` is chosen before a session starts and exchanged with the
//! shareable-link layer through `to_query` / `merge_query`. `Preferences`
//! are persisted separately in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player sprite (render only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sprite {
    #[default]
    Spaceship,
    Bird,
    Robot,
}

impl Sprite {
    pub const ALL: [Sprite; 3] = [Sprite::Spaceship, Sprite::Bird, Sprite::Robot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sprite::Spaceship => "spaceship",
            Sprite::Bird => "bird",
            Sprite::Robot => "robot",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "spaceship" => Some(Sprite::Spaceship),
            "bird" => Some(Sprite::Bird),
            "robot" => Some(Sprite::Robot),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sprite::Spaceship => "Spaceship (Triangle)",
            Sprite::Bird => "Bird (Circle)",
            Sprite::Robot => "Robot (Square)",
        }
    }
}

/// Background decoration (render only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Stars,
    City,
    Grid,
}

impl Background {
    pub const ALL: [Background; 3] = [Background::Stars, Background::City, Background::Grid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Stars => "stars",
            Background::City => "city",
            Background::Grid => "grid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stars" => Some(Background::Stars),
            "city" => Some(Background::City),
            "grid" => Some(Background::Grid),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Background::Stars => "Starry Sky",
            Background::City => "Pixel City",
            Background::Grid => "Neon Grid",
        }
    }
}

/// Obstacle layout and motion rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    #[default]
    Asteroids,
    Walls,
    Blocks,
}

impl Pattern {
    pub const ALL: [Pattern; 3] = [Pattern::Asteroids, Pattern::Walls, Pattern::Blocks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Asteroids => "asteroids",
            Pattern::Walls => "walls",
            Pattern::Blocks => "blocks",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asteroids" => Some(Pattern::Asteroids),
            "walls" => Some(Pattern::Walls),
            "blocks" => Some(Pattern::Blocks),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pattern::Asteroids => "Falling Asteroids",
            Pattern::Walls => "Horizontal Walls",
            Pattern::Blocks => "Random Blocks",
        }
    }

    /// Fixed obstacle pool size for this pattern
    pub fn pool_size(&self) -> usize {
        match self {
            Pattern::Asteroids => 8,
            Pattern::Walls => 3,
            Pattern::Blocks => 12,
        }
    }

    /// Whether recycled obstacles get a fresh horizontal position
    pub fn rerolls_x(&self) -> bool {
        !matches!(self, Pattern::Walls)
    }
}

/// Obstacle speed tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 3] = [SpeedTier::Slow, SpeedTier::Medium, SpeedTier::Fast];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedTier::Slow => "slow",
            SpeedTier::Medium => "medium",
            SpeedTier::Fast => "fast",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" => Some(SpeedTier::Slow),
            "medium" => Some(SpeedTier::Medium),
            "fast" => Some(SpeedTier::Fast),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeedTier::Slow => "Slow",
            SpeedTier::Medium => "Medium",
            SpeedTier::Fast => "Fast",
        }
    }

    /// Vertical velocity magnitude in units per tick
    pub fn units(&self) -> f32 {
        match self {
            SpeedTier::Slow => 2.0,
            SpeedTier::Medium => 4.0,
            SpeedTier::Fast => 6.0,
        }
    }
}

/// Per-session game options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameConfig {
    pub sprite: Sprite,
    pub background: Background,
    pub pattern: Pattern,
    pub speed: SpeedTier,
}

impl GameConfig {
    /// Shareable-link query keys
    pub const SPRITE_KEY: &'static str = "sprite";
    pub const BACKGROUND_KEY: &'static str = "bg";
    pub const PATTERN_KEY: &'static str = "pattern";
    pub const SPEED_KEY: &'static str = "speed";

    /// Encode as a query string (without the leading `?`)
    pub fn to_query(&self) -> String {
        format!(
            "{}={}&{}={}&{}={}&{}={}",
            Self::SPRITE_KEY,
            self.sprite.as_str(),
            Self::BACKGROUND_KEY,
            self.background.as_str(),
            Self::PATTERN_KEY,
            self.pattern.as_str(),
            Self::SPEED_KEY,
            self.speed.as_str(),
        )
    }

    /// Overlay recognised query parameters onto this config.
    ///
    /// Missing keys and unknown values leave the current field untouched.
    /// A leading `?` is accepted.
    pub fn merge_query(&self, query: &str) -> Self {
        let mut merged = *self;
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                Self::SPRITE_KEY => {
                    if let Some(v) = Sprite::from_str(value) {
                        merged.sprite = v;
                    }
                }
                Self::BACKGROUND_KEY => {
                    if let Some(v) = Background::from_str(value) {
                        merged.background = v;
                    }
                }
                Self::PATTERN_KEY => {
                    if let Some(v) = Pattern::from_str(value) {
                        merged.pattern = v;
                    }
                }
                Self::SPEED_KEY => {
                    if let Some(v) = SpeedTier::from_str(value) {
                        merged.speed = v;
                    }
                }
                _ => log::debug!("Ignoring query parameter {key:?}"),
            }
        }

        merged
    }
}

/// Player preferences, persisted in LocalStorage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Looping chiptune enabled
    pub music: bool,
}

impl Preferences {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "retro_dodge_prefs";

    /// Load preferences from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(prefs) = serde_json::from_str(&json) {
                    log::info!("Loaded preferences from LocalStorage");
                    return prefs;
                }
            }
        }

        log::info!("Using default preferences");
        Self::default()
    }

    /// Save preferences to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Preferences saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
