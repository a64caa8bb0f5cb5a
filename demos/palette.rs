//! Print the swatches, target picks and media style for a synthetic image.
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example palette -- [width] [height]

use vibrancy::{Bitmap, Colour, MediaStyle, Palette, PaletteError, Swatch, Target};

fn synthetic(width: usize, height: usize) -> Result<Bitmap, PaletteError> {
    let mut bitmap = Bitmap::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 200 / height) as u8 + 30;
            let b = 255 - r / 2;
            bitmap.set_pixel(x, y, Colour::from_rgb(r, g, b));
        }
    }
    Ok(bitmap)
}

fn describe(name: &str, swatch: Option<&Swatch>) {
    match swatch {
        Some(s) => println!(
            "{name:>14}: {} pop={:<6} title={} body={}",
            s.colour(),
            s.population(),
            s.title_text_colour(),
            s.body_text_colour()
        ),
        None => println!("{name:>14}: -"),
    }
}

fn main() -> Result<(), PaletteError> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let width = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(240);
    let height = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(160);

    let bitmap = synthetic(width, height)?;
    let palette = Palette::from_bitmap(&bitmap).generate()?;

    println!("{} swatches", palette.swatches().len());
    for swatch in palette.swatches() {
        println!("  {swatch}");
    }

    let names = [
        "vibrant",
        "light vibrant",
        "dark vibrant",
        "muted",
        "light muted",
        "dark muted",
    ];
    for (name, target) in names.iter().zip(Target::PRESETS) {
        describe(name, palette.swatch_for_target(&target));
    }
    describe("dominant", palette.dominant_swatch());

    let style = MediaStyle::from_bitmap(&bitmap)?;
    println!(
        "media style: background={} primary={} secondary={} light={}",
        style.background_colour(),
        style.primary_text_colour(),
        style.secondary_text_colour(),
        style.is_light()
    );
    Ok(())
}
