use std::path::PathBuf;
use std::sync::Arc;

use egui::{pos2, vec2, Color32};
use image::{Rgba, RgbaImage};
use sayings_paint::command::TOOLBAR;
use sayings_paint::{
    Background, BuiltinBackground, Canvas, CanvasError, Command, CommandContext, CommandId, CommandOutcome,
    Justify, ResourceLoader,
};

fn scratch_path(ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sayings_export_{}.{}", uuid::Uuid::new_v4(), ext))
}

fn busy_canvas() -> Canvas {
    let mut canvas = Canvas::new(120, 80).unwrap();
    canvas.set_background_color(Color32::from_rgb(30, 60, 90));
    canvas
        .add_stamp(
            Arc::new(RgbaImage::from_pixel(4, 4, Rgba([250, 200, 0, 255]))),
            pos2(20.0, 20.0),
            vec2(30.0, 30.0),
        )
        .unwrap();
    canvas.set_text("Saying");
    canvas
}

#[test]
fn test_png_export_is_lossless() {
    let mut canvas = busy_canvas();
    let path = scratch_path("png");

    canvas.export(&path).unwrap();
    let decoded = image::open(&path).unwrap().into_rgba8();
    assert_eq!(decoded, canvas.copy_image());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_jpeg_export_keeps_dimensions() {
    let mut canvas = busy_canvas();
    for ext in ["jpeg", "JPG"] {
        let path = scratch_path(ext);
        canvas.export(&path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
        std::fs::remove_file(&path).ok();
    }
}

#[test]
fn test_unsupported_format_writes_nothing() {
    let mut canvas = busy_canvas();
    let path = scratch_path("gif");
    assert!(matches!(
        canvas.export(&path),
        Err(CanvasError::UnsupportedExportFormat(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_export_reflects_latest_state() {
    let mut canvas = Canvas::new(16, 16).unwrap();
    canvas.set_gradient_enabled(false);
    canvas.set_background_color(Color32::RED);
    canvas.render();
    canvas.set_background_color(Color32::GREEN);

    let path = scratch_path("png");
    canvas.export(&path).unwrap();
    let decoded = image::open(&path).unwrap().into_rgba8();
    assert_eq!(*decoded.get_pixel(8, 8), Rgba([0, 255, 0, 255]));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_save_command_exports() {
    let mut canvas = busy_canvas();
    let loader = ResourceLoader::new("resources");
    let path = scratch_path("png");

    let mut ctx = CommandContext::new(&mut canvas, &loader);
    let outcome = Command::SaveImage { path: Some(path.clone()) }
        .execute(&mut ctx)
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Done);
    assert!(path.exists());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_new_picture_resets_everything() {
    let mut canvas = busy_canvas();
    canvas.set_gradient_enabled(false);
    canvas.set_justify(Justify::Center);
    let loader = ResourceLoader::new("resources");

    let mut ctx = CommandContext::new(&mut canvas, &loader);
    Command::NewPicture.execute(&mut ctx).unwrap();

    assert!(canvas.icons().is_empty());
    assert!(canvas.gradient_enabled());
    assert_eq!(canvas.text().text(), "");
    assert_eq!(canvas.text().justify(), Justify::Left);
    assert_eq!(canvas.background(), &Background::default());
}

#[test]
fn test_text_commands() {
    let mut canvas = Canvas::new(100, 100).unwrap();
    let loader = ResourceLoader::new("resources");
    let mut ctx = CommandContext::new(&mut canvas, &loader);

    Command::SetText("one\ntwo".into()).execute(&mut ctx).unwrap();
    Command::SetFontSize(20).execute(&mut ctx).unwrap();
    Command::SetJustify(Justify::Right).execute(&mut ctx).unwrap();
    Command::SetTextColor(Color32::WHITE).execute(&mut ctx).unwrap();
    assert!(matches!(
        Command::SetFontSize(0).execute(&mut ctx),
        Err(CanvasError::InvalidGeometry(_))
    ));

    let text = canvas.text();
    assert_eq!(text.lines(), vec!["one", "two"]);
    assert_eq!(text.font_size(), 20);
    assert_eq!(text.justify(), Justify::Right);
    assert_eq!(text.color(), Color32::WHITE);
}

#[test]
fn test_quit_and_gradient_toggle() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    let loader = ResourceLoader::new("resources");
    let mut ctx = CommandContext::new(&mut canvas, &loader);

    assert_eq!(Command::Quit.execute(&mut ctx).unwrap(), CommandOutcome::QuitRequested);
    Command::SetGradientOverlay(false).execute(&mut ctx).unwrap();
    assert!(!canvas.gradient_enabled());
}

#[test]
fn test_toolbar_layout() {
    let backgrounds: Vec<_> = TOOLBAR
        .iter()
        .flatten()
        .filter_map(|id| match id {
            CommandId::Background(bg) => Some(*bg),
            _ => None,
        })
        .collect();
    assert_eq!(backgrounds, BuiltinBackground::ALL.to_vec());
    assert_eq!(CommandId::Background(BuiltinBackground::EagleNebula).label(), "Eagle_nebula");
}
