//! Enemy skins derived from wallet holdings
//!
//! The host hands over whatever assets the connected wallet holds. Each one
//! becomes a possible enemy look; with nothing usable we fall back to the
//! built-in set so a match can always start.

use serde::{Deserialize, Serialize};

/// A wallet holding as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WalletAsset {
    /// Fungible token
    Token {
        id: String,
        #[serde(rename = "displayName")]
        display_name: String,
        #[serde(rename = "imageReference")]
        image: String,
        #[serde(default)]
        symbol: Option<String>,
    },
    /// Non-fungible collectible
    Collectible {
        id: String,
        #[serde(rename = "displayName")]
        display_name: String,
        #[serde(rename = "imageReference")]
        image: String,
        #[serde(default)]
        collection: Option<String>,
    },
}

impl WalletAsset {
    pub fn display_name(&self) -> &str {
        match self {
            WalletAsset::Token { display_name, .. } | WalletAsset::Collectible { display_name, .. } => {
                display_name
            }
        }
    }

    pub fn image(&self) -> &str {
        match self {
            WalletAsset::Token { image, .. } | WalletAsset::Collectible { image, .. } => image,
        }
    }
}

/// Where a skin came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinSource {
    Token,
    Collectible,
    Builtin,
}

/// Visual identity of an enemy (opaque to the simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySkin {
    pub name: String,
    pub image: String,
    pub source: SkinSource,
}

/// Built-in skins: (name, image reference)
pub const DEFAULT_SKINS: &[(&str, &str)] = &[
    ("Drone", "builtin:drone"),
    ("Saucer", "builtin:saucer"),
    ("Beetle", "builtin:beetle"),
    ("Wasp", "builtin:wasp"),
    ("Orb", "builtin:orb"),
];

pub fn default_skins() -> Vec<EnemySkin> {
    DEFAULT_SKINS
        .iter()
        .map(|&(name, image)| EnemySkin {
            name: name.to_string(),
            image: image.to_string(),
            source: SkinSource::Builtin,
        })
        .collect()
}

impl From<&WalletAsset> for EnemySkin {
    fn from(asset: &WalletAsset) -> Self {
        let (name, source) = match asset {
            WalletAsset::Token { symbol, .. } => (
                symbol.clone().unwrap_or_else(|| asset.display_name().to_string()),
                SkinSource::Token,
            ),
            WalletAsset::Collectible { .. } => {
                (asset.display_name().to_string(), SkinSource::Collectible)
            }
        };
        Self {
            name,
            image: asset.image().to_string(),
            source,
        }
    }
}

/// Build the skin pool from wallet assets.
///
/// Assets without an image are skipped; an empty result is replaced by the
/// defaults, so the returned list is never empty.
pub fn skins_from_assets(assets: &[WalletAsset]) -> Vec<EnemySkin> {
    let skins: Vec<EnemySkin> = assets
        .iter()
        .filter(|a| {
            let usable = !a.image().trim().is_empty();
            if !usable {
                log::debug!("Skipping {} (no image)", a.display_name());
            }
            usable
        })
        .map(EnemySkin::from)
        .collect();

    if skins.is_empty() {
        if !assets.is_empty() {
            log::warn!("No usable wallet assets ({} given), using default skins", assets.len());
        }
        default_skins()
    } else {
        log::debug!("Using {} wallet skins", skins.len());
        skins
    }
}

/// Parse a JSON asset list, falling back to defaults if it is malformed.
///
/// Individually broken entries are dropped rather than failing the list.
pub fn skins_from_json(json: &str) -> Vec<EnemySkin> {
    let raw: Vec<serde_json::Value> = match serde_json::from_str(json) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("Malformed wallet asset list ({e}), using default skins");
            return default_skins();
        }
    };

    let assets: Vec<WalletAsset> = raw
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    skins_from_assets(&assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(name: &str, image: &str) -> WalletAsset {
        WalletAsset::Token {
            id: format!("tok-{name}"),
            display_name: name.to_string(),
            image: image.to_string(),
            symbol: None,
        }
    }

    #[test]
    fn test_empty_assets_use_defaults() {
        let skins = skins_from_assets(&[]);
        assert_eq!(skins.len(), DEFAULT_SKINS.len());
        assert!(skins.iter().all(|s| s.source == SkinSource::Builtin));
    }

    #[test]
    fn test_assets_without_images_are_skipped() {
        let skins = skins_from_assets(&[token("Blank", "  "), token("Gem", "ipfs://gem")]);
        assert_eq!(skins.len(), 1);
        assert_eq!(skins[0].name, "Gem");
        assert_eq!(skins[0].source, SkinSource::Token);

        // Nothing usable falls back to the defaults
        let skins = skins_from_assets(&[token("Blank", "")]);
        assert_eq!(skins.len(), DEFAULT_SKINS.len());
    }

    #[test]
    fn test_token_prefers_symbol() {
        let asset = WalletAsset::Token {
            id: "1".into(),
            display_name: "Lumen".into(),
            image: "img".into(),
            symbol: Some("XLM".into()),
        };
        assert_eq!(EnemySkin::from(&asset).name, "XLM");
    }

    #[test]
    fn test_name_falls_back_to_display_name() {
        let asset = WalletAsset::Token {
            id: "1".into(),
            display_name: "Lumen".into(),
            image: "img".into(),
            symbol: None,
        };
        assert_eq!(asset.display_name(), "Lumen");
        assert_eq!(EnemySkin::from(&asset).name, "Lumen");
    }

    #[test]
    fn test_skins_from_json() {
        let json = r#"[
            {"kind": "collectible", "id": "7", "displayName": "Punk #7", "imageReference": "https://img/7.png"},
            {"kind": "token", "id": "2", "displayName": "Coin", "imageReference": "https://img/coin.png", "symbol": "CN"},
            {"kind": "spaceship", "id": "3"}
        ]"#;
        let skins = skins_from_json(json);
        assert_eq!(skins.len(), 2);
        assert_eq!(skins[0].source, SkinSource::Collectible);
        assert_eq!(skins[0].name, "Punk #7");
        assert_eq!(skins[1].name, "CN");
    }

    #[test]
    fn test_malformed_json_uses_defaults() {
        assert_eq!(skins_from_json("{oops").len(), DEFAULT_SKINS.len());
        assert_eq!(skins_from_json(r#"{"kind": "token"}"#).len(), DEFAULT_SKINS.len());
    }
}
