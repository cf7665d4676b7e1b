use std::fs;
use std::path::PathBuf;

use goban_render::rendering::svg::fingerprint;
use goban_render::{flatten, Display, DisplayConfig, MemoryHost, Position, Rotation, Theme};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn render_fixture(fixture: &str, config: DisplayConfig) -> String {
    let data = fs::read_to_string(format!("tests/goldens/positions/{}", fixture)).expect("read fixture");
    let position = Position::from_json(&data).expect("parse fixture");
    let config = DisplayConfig { intersections: position.size, ..config };
    let snapshot = flatten(&position, config.flatten_options()).expect("flatten fixture");

    let host = MemoryHost::with_container(&config.container_id, 480.0, 480.0);
    let container = config.container_id.clone();
    let mut display = Display::create(host, config).expect("draw");
    display.update_board(snapshot).expect("update");
    display.host().content(&container).expect("content").to_string()
}

/// Compare the digest of `markup` with the stored golden, or rewrite the
/// golden when `UPDATE_GOLDENS` is set. A missing golden is a failure.
fn check_golden(name: &str, markup: &str) {
    let digest = fingerprint(markup);
    let expected_path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {:?}", expected_path);
        return;
    }

    let exp = fs::read_to_string(&expected_path).unwrap_or_else(|_| {
        panic!("no golden at {:?}; run with UPDATE_GOLDENS=1 to create it", expected_path)
    });
    assert_eq!(digest, exp.trim(), "rendered markup for {} changed", name);
}

#[test]
fn golden_opening_default_theme() {
    let markup = render_fixture("opening.json", DisplayConfig::default());
    assert!(markup.starts_with("<svg"));
    check_golden("opening_default.sha256", &markup);
}

#[test]
fn golden_problem_textbook_with_coords() {
    let config = DisplayConfig {
        theme: Theme::textbook(),
        draw_board_coords: true,
        ..Default::default()
    };
    let markup = render_fixture("problem.json", config);
    assert!(markup.contains(">1</text>"));
    check_golden("problem_textbook_coords.sha256", &markup);
}

#[test]
fn golden_opening_rotated() {
    let config = DisplayConfig { rotation: Rotation::Clockwise90, ..Default::default() };
    let markup = render_fixture("opening.json", config);
    // (15,3) turns to (15,15) and the last move at (14,16) to (2,14).
    assert!(markup.contains(r##"fill="#000000" id="goban_stone_15_15""##));
    assert!(markup.contains(r#"data-mark="last_move" data-x="14" data-y="16" id="goban_mark_2_14""#));
    check_golden("opening_rotated.sha256", &markup);
}

#[test]
fn rendering_is_deterministic() {
    let a = render_fixture("problem.json", DisplayConfig::default());
    let b = render_fixture("problem.json", DisplayConfig::default());
    assert_eq!(fingerprint(&a), fingerprint(&b));
}
