// Tiled JSON (.json / .tmj) -> Map
use crate::error::MapError;
use crate::map::{Layer, LayerKind, Map, TileOffset, Tileset, TilesetImage};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    orientation: Option<String>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonValue>, // embedded tileset or {firstgid, source}
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: JsonValue, // GID array, or a string for base64 layers
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>, // "tilelayer" expected here
    #[serde(default)]
    encoding: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    source: String,
}

#[derive(Deserialize)]
struct JsonTileset {
    #[serde(default)]
    firstgid: Option<u32>,
    #[serde(default)]
    name: String,
    tilewidth: u32,
    tileheight: u32,
    image: String,
    imagewidth: u32,
    imageheight: u32,
    #[serde(default)]
    tileoffset: JsonTileOffset,
}

#[derive(Deserialize, Default)]
struct JsonTileOffset {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn has_json_ext(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("tmj") | Some("tsj")
    )
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"))
}

/// Read a Tiled JSON map file; tileset images resolve relative to the file that names them.
pub fn decode_map_file(path: &Path) -> Result<Map, MapError> {
    if !has_json_ext(path) {
        return Err(MapError::UnsupportedFormat(path.display().to_string()));
    }
    log::info!("loading map {}", path.display());
    let j: JsonMap = read_json(path)?;
    map_from_json(j, path, &parent_dir(path))
}

/// Parse Tiled JSON text; relative tileset paths resolve against `map_dir`.
pub fn decode_map_str(txt: &str, map_dir: &Path) -> Result<Map, MapError> {
    let origin = map_dir.join("<inline>");
    let j: JsonMap = serde_json::from_str(txt).map_err(|source| MapError::Json {
        path: origin.clone(),
        source,
    })?;
    map_from_json(j, &origin, map_dir)
}

fn tileset_from_json(
    entry: JsonValue,
    map_path: &Path,
    map_dir: &Path,
) -> Result<(Option<u32>, Tileset), MapError> {
    let (firstgid, ts, ts_dir) = if entry.get("source").is_some() {
        let r: JsonTilesetRef = serde_json::from_value(entry).map_err(|source| MapError::Json {
            path: map_path.to_path_buf(),
            source,
        })?;
        let ts_path = map_dir.join(&r.source);
        if !has_json_ext(&ts_path) {
            return Err(MapError::InvalidMap(format!(
                "External tileset must be JSON: {}",
                r.source
            )));
        }
        let ts: JsonTileset = read_json(&ts_path)?;
        (Some(r.firstgid), ts, parent_dir(&ts_path))
    } else {
        let ts: JsonTileset = serde_json::from_value(entry).map_err(|source| MapError::Json {
            path: map_path.to_path_buf(),
            source,
        })?;
        (ts.firstgid, ts, map_dir.to_path_buf())
    };

    log::debug!(
        "tileset '{}': {}x{} tiles from {} ({}x{})",
        ts.name,
        ts.tilewidth,
        ts.tileheight,
        ts.image,
        ts.imagewidth,
        ts.imageheight
    );

    Ok((
        firstgid,
        Tileset {
            name: ts.name,
            image: TilesetImage {
                source: ts_dir.join(&ts.image),
                width: ts.imagewidth,
                height: ts.imageheight,
            },
            tile_w: ts.tilewidth,
            tile_h: ts.tileheight,
            offset: TileOffset {
                x: ts.tileoffset.x,
                y: ts.tileoffset.y,
            },
        },
    ))
}

fn layer_from_json(l: JsonLayer, map_path: &Path) -> Result<Layer, MapError> {
    let kind = match l.kind.as_deref().unwrap_or("tilelayer") {
        "tilelayer" => {
            if let Some(enc) = l.encoding.as_deref().filter(|e| *e != "csv") {
                return Err(MapError::InvalidMap(format!(
                    "Layer '{}' uses unsupported encoding '{enc}'",
                    l.name
                )));
            }
            let data: Vec<u32> = match l.data {
                JsonValue::Null => Vec::new(),
                raw => serde_json::from_value(raw).map_err(|source| MapError::Json {
                    path: map_path.to_path_buf(),
                    source,
                })?,
            };
            let expected = l.width * l.height;
            if data.len() != expected {
                return Err(MapError::InvalidLayerSize {
                    layer: l.name,
                    expected,
                    actual: data.len(),
                });
            }
            LayerKind::Tiles {
                width: l.width,
                height: l.height,
                data,
            }
        }
        _ => LayerKind::Other,
    };
    Ok(Layer {
        name: l.name,
        visible: l.visible,
        kind,
    })
}

fn map_from_json(j: JsonMap, map_path: &Path, map_dir: &Path) -> Result<Map, MapError> {
    match j.orientation.as_deref() {
        Some("isometric") | None => {}
        Some(other) => log::warn!(
            "{}: orientation is '{other}', tiles will be placed isometrically",
            map_path.display()
        ),
    }

    let mut tilesets = Vec::with_capacity(j.tilesets.len());
    let mut next_gid = 1u32;
    for entry in j.tilesets {
        let (firstgid, ts) = tileset_from_json(entry, map_path, map_dir)?;
        if let Some(firstgid) = firstgid.filter(|&g| g != next_gid) {
            log::warn!(
                "tileset '{}' declares firstgid {firstgid}, but tileset order gives it {next_gid}",
                ts.name
            );
        }
        next_gid = next_gid.saturating_add(ts.tile_count());
        tilesets.push(ts);
    }

    let layers = j
        .layers
        .into_iter()
        .map(|l| layer_from_json(l, map_path))
        .collect::<Result<Vec<_>, _>>()?;

    let map = Map::new(j.width, j.height, j.tilewidth, j.tileheight, tilesets, layers)?;
    log::info!(
        "{}: {}x{} map, {} tilesets, {} tiles, {} layers",
        map_path.display(),
        map.width,
        map.height,
        map.tilesets().len(),
        map.tile_count(),
        map.layers().len()
    );
    Ok(map)
}
