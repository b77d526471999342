use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use photo_overlay::layout::{BlockFrame, compute_block_layout};
use photo_overlay::{
    CharTable, Config, HitTarget, LayoutConfig, LogoColor, Point, PointerEvent, Scene, Session,
    StyleRegistry, TextBlock, TextMeasure,
};

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([90, 120, 150, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

fn session_with_photo(width: u32, height: u32) -> Session {
    let mut session = Session::with_measurer(Config::default(), CharTable);
    session.upload_background(Some(("photo.png", png(width, height).as_slice())));
    session.load_logo(LogoColor::Black, "logo-black.png", &png(160, 80));
    session.load_logo(LogoColor::White, "logo-white.png", &png(160, 80));
    session
}

fn block(id: u32, text: &str, preset: &str, x: f32, y: f32, font_size: f32) -> TextBlock {
    TextBlock {
        id,
        text: text.to_string(),
        x,
        y,
        preset: preset.to_string(),
        font_size,
    }
}

#[test]
fn large_photo_is_fit_to_canvas_without_moving_blocks() {
    let mut session = session_with_photo(1800, 1200);
    let canvas = session.canvas_size().expect("canvas");
    assert_eq!((canvas.width, canvas.height, canvas.scale), (900, 600, 0.5));

    let mut scene = Scene::default();
    scene.blocks[0] = block(1, "HELLO", "simple", 250.0, 250.0, 40.0);
    session.set_scene(scene).expect("scene");

    let svg = session.render_svg().expect("render");
    assert!(svg.contains("viewBox=\"0 0 900 600\""));
    assert!(svg.contains("x=\"250.00\" y=\"250.00\""));
}

#[test]
fn first_text_block_has_two_symmetric_lines() {
    let session = session_with_photo(1000, 1000);
    let layout = session.layout();
    let first = layout.block(1).expect("block 1");
    assert_eq!(first.lines.len(), 2);
    let gap = first.lines[1].center_y - first.lines[0].center_y;
    assert!((gap - 84.0).abs() < 1e-3);
    assert!(((first.lines[0].center_y + first.lines[1].center_y) / 2.0 - 500.0).abs() < 1e-3);
}

#[test]
fn empty_hidden_slot_is_invisible_and_unhittable() {
    let mut session = session_with_photo(1000, 1000);
    let layout = session.layout();
    let second = layout.block(2).expect("block 2");
    assert!(second.lines.is_empty());
    assert_eq!(session.hit_test(Point::new(300.0, 380.0)), None);

    session.pointer_move(Point::new(300.0, 380.0));
    assert_eq!(session.hover(), None);
    let svg = session.render_svg().expect("render");
    assert_eq!(svg.matches("<text").count(), 4);
}

#[test]
fn overlapping_blocks_resolve_to_topmost() {
    let mut session = session_with_photo(1000, 1000);
    let mut scene = Scene::default();
    scene.logo.enabled = false;
    scene.blocks = vec![
        block(1, "BOTTOM", "labelbox", 600.0, 600.0, 50.0),
        block(2, "TOP", "amo", 600.0, 600.0, 50.0),
        block(3, "ELSEWHERE", "breaking", 100.0, 900.0, 30.0),
    ];
    session.set_scene(scene).expect("scene");
    assert_eq!(session.hit_test(Point::new(600.0, 600.0)), Some(HitTarget::Text(2)));
    // outside "TOP" but inside the label box below it
    let label = session.layout().block(1).expect("label").bounds();
    let corner = Point::new(label.left() + 2.0, label.top() + 2.0);
    assert_eq!(session.hit_test(corner), Some(HitTarget::Text(1)));
}

#[test]
fn logo_center_hits_only_when_enabled() {
    let mut session = session_with_photo(1000, 1000);
    let center = session.scene().logo.position;
    assert_eq!(session.hit_test(center), Some(HitTarget::Logo));
    session.set_logo_enabled(false);
    assert_eq!(session.hit_test(center), None);
    let svg = session.render_svg().expect("render");
    assert_eq!(svg.matches("<image").count(), 1);
}

#[test]
fn dragged_block_stays_under_pointer() {
    let mut session = session_with_photo(1000, 1000);
    let grab = Point::new(520.0, 470.0);
    assert!(session.pointer_down(grab));
    for step in 1..=5 {
        let pointer = Point::new(520.0 + step as f32 * 30.0, 470.0 - step as f32 * 20.0);
        session.pointer_move(pointer);
        assert_eq!(session.hit_test(pointer), Some(HitTarget::Text(1)));
    }
    session.pointer_up();
    let moved = session.scene().block(1).expect("block").position();
    assert_eq!(moved, Point::new(650.0, 400.0));
}

#[test]
fn replayed_events_move_logo_and_release_on_leave() {
    let mut session = session_with_photo(1000, 1000);
    let events = [
        PointerEvent::Down { x: 210.0, y: 190.0 },
        PointerEvent::Move { x: 410.0, y: 290.0 },
        PointerEvent::Leave,
        PointerEvent::Move { x: 0.0, y: 0.0 },
    ];
    for event in events {
        session.apply_event(event);
    }
    assert_eq!(session.scene().logo.position, Point::new(400.0, 300.0));
    assert!(!session.drag().is_active());
}

#[test]
fn hover_feedback_is_rendered() {
    let mut session = session_with_photo(1000, 1000);
    assert!(session.pointer_move(Point::new(500.0, 540.0)));
    assert_eq!(session.hover(), Some(HitTarget::Text(1)));
    assert!(session.render_svg().expect("render").contains("rgba(255,255,0,0.25)"));
    assert!(session.pointer_leave());
    assert!(!session.render_svg().expect("render").contains("rgba(255,255,0,0.25)"));
}

#[test]
fn boxed_rect_always_contains_padded_text() {
    let styles = StyleRegistry::builtin();
    let config = LayoutConfig::default();
    for (text, size) in [("A", 12.0), ("WIDE LABEL TEXT", 60.0), ("two\nlines here", 33.0)] {
        let layout = compute_block_layout(
            &block(1, text, "labelbox", 321.0, 123.0, size),
            &styles,
            &CharTable,
            &config,
        );
        let BlockFrame::Boxed { rect, .. } = layout.frame else {
            panic!("labelbox should be boxed");
        };
        assert!(rect.contains_rect(&layout.text_bounds.expand_xy(40.0, 30.0)));
    }
}

#[test]
fn zero_letter_spacing_matches_whole_line() {
    let text = "Letter spacing";
    let whole = CharTable.measure(text, 55.0, "Impact");
    let per_char: f32 = text
        .chars()
        .map(|ch| CharTable.measure(&ch.to_string(), 55.0, "Impact"))
        .sum();
    assert!((whole - per_char).abs() < 0.01);
}

#[test]
fn unknown_preset_renders_nothing_for_block() {
    let mut session = session_with_photo(1000, 1000);
    session.set_preset(1, "retired-style");
    assert_eq!(session.hit_test(Point::new(500.0, 460.0)), None);
    assert!(!session.render_svg().expect("render").contains("<text"));
}

#[cfg(feature = "png")]
#[test]
fn exports_png_at_canvas_size() {
    let mut session = session_with_photo(1200, 300);
    session.set_text(1, "");
    let bytes = session.export_png().expect("export");
    let exported = image::load_from_memory(&bytes).expect("decode export");
    assert_eq!((exported.width(), exported.height()), (900, 225));
}
