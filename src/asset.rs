//! Embedded game assets.
//!
//! Level text is compiled into the binary with `rust-embed`, so the simulation
//! never depends on the working directory at runtime.

use std::borrow::Cow;

use rust_embed::RustEmbed;

use crate::constants::LEVEL_COUNT;
use crate::error::AssetError;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

/// A named asset shipped with the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    /// The text of a numbered level, starting at 1.
    Level(u32),
}

impl Asset {
    /// The path of the asset inside the embedded folder.
    pub fn path(&self) -> String {
        match self {
            Asset::Level(number) => format!("levels/level{number}.txt"),
        }
    }
}

/// Returns the raw bytes of an asset.
pub fn get_asset_bytes(asset: Asset) -> Result<Cow<'static, [u8]>, AssetError> {
    let path = asset.path();
    Assets::get(&path).map(|file| file.data).ok_or(AssetError::NotFound(path))
}

/// Returns the text of a level.
pub fn level_text(number: u32) -> Result<Cow<'static, str>, AssetError> {
    let asset = Asset::Level(number);
    let text = match get_asset_bytes(asset)? {
        Cow::Borrowed(bytes) => std::str::from_utf8(bytes).map(Cow::Borrowed),
        Cow::Owned(bytes) => String::from_utf8(bytes)
            .map(Cow::Owned)
            .map_err(|error| error.utf8_error()),
    };
    text.map_err(|source| AssetError::InvalidUtf8 {
        name: asset.path(),
        source,
    })
}

/// Whether a level with this number is shipped.
pub fn has_level(number: u32) -> bool {
    (1..=LEVEL_COUNT).contains(&number) && Assets::get(&Asset::Level(number).path()).is_some()
}
