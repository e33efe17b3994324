// tests/iso_scenario.rs

use image::{GenericImageView, Rgba, RgbaImage};
use macroquad_tiled_iso::{Gid, Map, MapError, PixelRect, FLIP_H};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mq_tiled_iso_{tag}_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

const MAP_JSON: &str = r#"{
  "width": 2, "height": 2,
  "tilewidth": 64, "tileheight": 32,
  "orientation": "isometric",
  "layers": [
    {"type":"tilelayer","name":"ground","width":2,"height":2,"data":[1,2,3,2147483652]}
  ],
  "tilesets": [
    {"firstgid":1,"name":"ground","image":"ground.png",
     "imagewidth":128,"imageheight":64,"tilewidth":64,"tileheight":32}
  ]
}"#;

fn write_scenario(tag: &str) -> PathBuf {
    let dir = temp_dir(tag);
    RgbaImage::from_fn(128, 64, |x, y| Rgba([x as u8, y as u8, 7, 255]))
        .save(dir.join("ground.png"))
        .expect("failed to write tileset png");
    let map_path = dir.join("map.json");
    fs::write(&map_path, MAP_JSON).expect("failed to write map");
    map_path
}

#[test]
fn two_by_two_map_end_to_end() -> anyhow::Result<()> {
    let map = Map::load(write_scenario("e2e"))?;
    let images = map.decode_tilesets()?;
    let catalog = images.catalog();

    assert_eq!(catalog.len(), 5);
    assert_eq!(map.tile_rect(0, 0), PixelRect::new(32, 32, 96, 64));
    assert_eq!(map.map_rect(), PixelRect::new(0, 0, 128, 96));

    let mut placed = Vec::new();
    for layer in map.layers() {
        for (col, row, gid) in layer.tiles() {
            let sprite = catalog.get(gid).expect("sprite for every placed gid");
            let (w, h) = sprite.dimensions();
            placed.push((gid, map.placement_rect(col, row, gid, PixelRect::from_size(w, h))?));
        }
    }
    assert_eq!(placed.len(), 4);
    for (gid, rect) in &placed {
        assert_eq!((rect.width(), rect.height()), (64, 32), "gid {gid:?}");
    }

    let (flipped, rect) = placed[3];
    assert_eq!(flipped, Gid(4 | FLIP_H));
    assert!(flipped.is_horizontal_flip());
    assert_eq!(rect, map.tile_rect(1, 1));
    assert_eq!(
        catalog.get(flipped).unwrap().get_pixel(0, 0),
        Rgba([64, 32, 7, 255])
    );
    Ok(())
}

#[test]
fn missing_tileset_image_is_reported() -> anyhow::Result<()> {
    let map_path = write_scenario("missing");
    fs::remove_file(map_path.with_file_name("ground.png"))?;

    let map = Map::load(&map_path)?;
    match map.decode_tilesets() {
        Err(MapError::Decode { path, .. }) => assert!(path.ends_with("ground.png")),
        other => panic!("expected Decode error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn corrupt_tileset_image_is_reported() -> anyhow::Result<()> {
    let map_path = write_scenario("corrupt");
    fs::write(map_path.with_file_name("ground.png"), b"definitely not a png")?;

    let map = Map::load(&map_path)?;
    let err = map.decode_tilesets().unwrap_err();
    assert!(matches!(err, MapError::Decode { .. }));
    Ok(())
}
