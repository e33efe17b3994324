use std::f32::consts::FRAC_PI_2;

use anyhow::Context;
use image::GenericImageView;
use macroquad::prelude::*;
use macroquad_tiled_iso::{Gid, Map, PixelRect};

fn window_conf() -> Conf {
    Conf {
        window_title: "Isometric Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// Top-left corner and draw params for a sprite that must cover `dest` on screen.
fn draw_params(gid: Gid, dest: PixelRect) -> (Vec2, DrawTextureParams) {
    // diagonal flip = transpose: quarter turn around the center plus a horizontal mirror,
    // drawn into the transposed rect so the turned sprite lands on `dest`
    let target = if gid.is_diagonal_flip() {
        dest.transposed()
    } else {
        dest
    };
    let mut params = DrawTextureParams {
        dest_size: Some(vec2(target.width() as f32, target.height() as f32)),
        flip_x: gid.is_horizontal_flip(),
        flip_y: gid.is_vertical_flip(),
        ..Default::default()
    };
    if gid.is_diagonal_flip() {
        params.rotation = FRAC_PI_2;
        params.flip_x = !params.flip_x;
    }
    (vec2(target.min.x as f32, target.min.y as f32), params)
}

async fn run() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/iso_map.json".to_owned());
    let map = Map::load(&path).with_context(|| format!("Loading map {path}"))?;
    let images = map
        .decode_tilesets()
        .with_context(|| format!("Decoding tilesets of {path}"))?;
    let catalog = images.catalog();

    // one texture per catalog slot, slot 0 stays empty
    let textures: Vec<Option<Texture2D>> = catalog
        .as_slice()
        .iter()
        .map(|slot| {
            slot.as_ref().map(|sprite| {
                let (w, h) = sprite.dimensions();
                let tex = Texture2D::from_rgba8(w as u16, h as u16, sprite.to_image().as_raw());
                tex.set_filter(FilterMode::Nearest);
                tex
            })
        })
        .collect();

    let bounds: Rect = map.map_rect().into();
    println!("map bounds {}x{}, {} tiles", bounds.w, bounds.h, catalog.len() - 1);

    loop {
        clear_background(BLACK);

        for layer in map.layers().iter().filter(|l| l.visible) {
            for (col, row, gid) in layer.tiles() {
                let Some(tex) = textures
                    .get(gid.global_tile_id() as usize)
                    .and_then(Option::as_ref)
                else {
                    continue;
                };
                let source = PixelRect::from_size(tex.width() as u32, tex.height() as u32);
                let dest = map.placement_rect(col, row, gid, source)?;
                let (pos, params) = draw_params(gid, dest);
                draw_texture_ex(tex, pos.x, pos.y, WHITE, params);
            }
        }

        draw_rectangle_lines(bounds.x, bounds.y, bounds.w, bounds.h, 1.0, DARKGRAY);
        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("iso_map: {err:#}");
        std::process::exit(1);
    }
}
