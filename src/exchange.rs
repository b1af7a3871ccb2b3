//! JSON import/export of map layouts.
//!
//! Two document shapes are accepted:
//!
//! - a flat array of objects: `[{"x":0,"y":0,"w":75,"h":45,"color":"#f00","type":"wall"}]`
//! - a mapping from category name to `{ "color": "#hex", "objects": [...] }`
//!
//! Import validates before anything is applied: `x`, `y`, `w`, `h` must be
//! numbers and `color`, when present, a 3- or 6-digit hex string. A rejected
//! document leaves the caller's state untouched because parsing produces a
//! standalone [`Layout`].

#[cfg(test)]
#[path = "exchange_test.rs"]
mod exchange_test;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::color::Color;
use crate::doc::{Layout, MapObject, ObjectStore};

/// Error returned by [`parse_layout`].
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected an array of objects or a mapping of categories")]
    UnsupportedShape,
    #[error("a category mapping must contain at least one category")]
    NoCategories,
    #[error("{path}: expected an object")]
    NotAnObject { path: String },
    #[error("{path}: missing numeric field \"{field}\"")]
    MissingNumber { path: String, field: &'static str },
    #[error("{path}: invalid color {value}")]
    InvalidColor { path: String, value: String },
    #[error("{path}: \"type\" must be a string")]
    InvalidType { path: String },
    #[error("{path}: \"objects\" must be an array")]
    ObjectsNotArray { path: String },
}

const GEOMETRY_FIELDS: [&str; 4] = ["x", "y", "w", "h"];

/// Parse and validate a layout document.
///
/// # Errors
///
/// Returns an [`ImportError`] naming the first offending element.
pub fn parse_layout(raw: &str) -> Result<Layout, ImportError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => {
            let objects = items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_object(item, &format!("[{i}]"), None))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Layout { categories: Vec::new(), objects })
        }
        Value::Object(map) => parse_categories(&map),
        _ => Err(ImportError::UnsupportedShape),
    }
}

fn parse_categories(map: &Map<String, Value>) -> Result<Layout, ImportError> {
    if map.is_empty() {
        return Err(ImportError::NoCategories);
    }
    let mut layout = Layout::default();
    for (name, entry) in map {
        let Value::Object(entry) = entry else {
            return Err(ImportError::NotAnObject { path: name.clone() });
        };
        let color = parse_color(entry.get("color"), name)?
            .ok_or_else(|| ImportError::InvalidColor { path: name.clone(), value: "null".into() })?;
        let Some(Value::Array(items)) = entry.get("objects") else {
            return Err(ImportError::ObjectsNotArray { path: name.clone() });
        };
        for (i, item) in items.iter().enumerate() {
            layout.objects.push(parse_object(item, &format!("{name}.objects[{i}]"), Some(name))?);
        }
        layout.categories.push((name.clone(), color));
    }
    Ok(layout)
}

fn parse_object(value: &Value, path: &str, category: Option<&str>) -> Result<MapObject, ImportError> {
    let Value::Object(fields) = value else {
        return Err(ImportError::NotAnObject { path: path.to_string() });
    };
    let mut geometry = [0.0; 4];
    for (slot, field) in geometry.iter_mut().zip(GEOMETRY_FIELDS) {
        *slot = fields
            .get(field)
            .and_then(Value::as_f64)
            .ok_or_else(|| ImportError::MissingNumber { path: path.to_string(), field })?;
    }
    let [x, y, w, h] = geometry;

    let kind = match (category, fields.get("type")) {
        (Some(name), _) => Some(name.to_string()),
        (None, None | Some(Value::Null)) => None,
        (None, Some(Value::String(s))) => Some(s.clone()),
        (None, Some(_)) => return Err(ImportError::InvalidType { path: path.to_string() }),
    };

    Ok(MapObject { x, y, w, h, color: parse_color(fields.get("color"), path)?, kind })
}

fn parse_color(value: Option<&Value>, path: &str) -> Result<Option<String>, ImportError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if Color::is_hex(s) => Ok(Some(s.clone())),
        Some(other) => Err(ImportError::InvalidColor { path: path.to_string(), value: other.to_string() }),
    }
}

/// Export every object as a flat JSON array, in draw order.
#[must_use]
pub fn export_flat(doc: &ObjectStore) -> String {
    let objects: Vec<&MapObject> = doc.iter().map(|(_, obj)| obj).collect();
    serde_json::to_string(&objects).unwrap_or_else(|_| "[]".to_string())
}

/// Export as a category mapping, categories in registry order and each
/// category's objects in insertion order.
///
/// The mapping groups objects by category, so the draw order between objects
/// of different categories does not survive a round trip; only
/// [`export_flat`] keeps it. Objects without a category cannot be expressed
/// and are left out; [`export_layout`] falls back to the flat form for them.
#[must_use]
pub fn export_categories(doc: &ObjectStore) -> String {
    serde_json::to_string(&CategoryMapping(doc)).unwrap_or_else(|_| "{}".to_string())
}

/// Export in the shape the document uses: a category mapping when categories
/// exist and every object belongs to one, else the flat array.
#[must_use]
pub fn export_layout(doc: &ObjectStore) -> String {
    if doc.categories().is_empty() {
        return export_flat(doc);
    }
    let uncategorized = doc.iter().filter(|(_, obj)| obj.kind.is_none()).count();
    if uncategorized > 0 {
        debug!(uncategorized, "objects without a category; exporting flat");
        return export_flat(doc);
    }
    export_categories(doc)
}

struct CategoryMapping<'a>(&'a ObjectStore);

impl Serialize for CategoryMapping<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let doc = self.0;
        serializer.collect_map(doc.categories().iter().map(|cat| {
            let objects = cat.objects.iter().filter_map(|id| doc.get(*id)).map(MemberObject::from).collect();
            (&cat.name, CategoryEntry { color: &cat.color, objects })
        }))
    }
}

#[derive(Serialize)]
struct CategoryEntry<'a> {
    color: &'a str,
    objects: Vec<MemberObject<'a>>,
}

/// A [`MapObject`] inside its category entry; the category key names its type.
#[derive(Serialize)]
struct MemberObject<'a> {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
}

impl<'a> From<&'a MapObject> for MemberObject<'a> {
    fn from(obj: &'a MapObject) -> Self {
        Self { x: obj.x, y: obj.y, w: obj.w, h: obj.h, color: obj.color.as_deref() }
    }
}
