//! System font lookup for raster labels.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use parking_lot::Mutex;
use rusttype::Font;
use std::{collections::HashMap, fs, sync::OnceLock};

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    })
}

/// Font for `family`, falling back to the system sans-serif face.
///
/// Returns `None` when no usable face is installed; callers skip text.
pub fn font_for(family: &str) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<String, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Some(font) = cache.lock().get(family) {
        return *font;
    }

    let loaded = load_font_from_system(family).map(|font| {
        let font: &'static Font<'static> = Box::leak(Box::new(font));
        font
    });
    if loaded.is_none() {
        tracing::warn!("No font found for '{}', labels are skipped", family);
    }
    cache.lock().insert(family.to_string(), loaded);
    loaded
}

fn load_font_from_system(family: &str) -> Option<Font<'static>> {
    let families = [Family::Name(family), Family::SansSerif];
    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
        }
    }
}
