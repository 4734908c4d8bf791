// Browser smoke test: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use level_up::surface::Surface;
use level_up::web::CanvasSurface;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn canvas_surface_resizes_backing_canvas() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let canvas: web_sys::HtmlCanvasElement = doc.create_element("canvas").unwrap().dyn_into().unwrap();
    let mut surface = CanvasSurface::new(canvas).unwrap();
    surface.resize(768.0, 512.0);
    assert_eq!(surface.width(), 768.0);
    assert_eq!(surface.height(), 512.0);
    surface.clear();
}

#[wasm_bindgen_test]
fn second_start_keeps_the_running_game() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let container = doc.create_element("div").unwrap();
    container.set_class_name("game-container");
    let canvas = doc.create_element("canvas").unwrap();
    canvas.set_id("canvas");
    container.append_child(&canvas).unwrap();
    doc.body().unwrap().append_child(&container).unwrap();

    assert!(!level_up::web::is_started());
    level_up::web::start(level_up::GameConfig::default()).unwrap();
    assert!(level_up::web::is_started());
    let err = level_up::web::start(level_up::GameConfig::default()).unwrap_err();
    assert!(matches!(err, level_up::AssetError::AlreadyStarted));
}
