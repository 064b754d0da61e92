#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use glissade_web::WebCarousel;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

const MARKUP: &str = r#"
<button class="glissade-prev" style="display:inline-block;width:50px;padding:0;border:0"></button>
<div class="glissade-frame" style="display:inline-block;width:200px;overflow:hidden">
  <ul class="glissade-slides" style="margin:0;padding:0;white-space:nowrap">
    <li class="glissade-slide" style="display:inline-block;width:100px"></li>
    <li class="glissade-slide" style="display:inline-block;width:100px"></li>
    <li class="glissade-slide" style="display:inline-block;width:100px"></li>
    <li class="glissade-slide" style="display:inline-block;width:100px"></li>
  </ul>
</div>
<button class="glissade-next" style="display:inline-block;width:50px;padding:0;border:0"></button>
"#;

fn mount(inner: &str) -> HtmlElement {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .expect("document");
    let root = document
        .create_element("div")
        .expect("create root")
        .dyn_into::<HtmlElement>()
        .expect("div is an HTMLElement");
    root.set_attribute("style", "width:300px;font-size:0")
        .expect("style root");
    root.set_inner_html(inner);
    document
        .body()
        .expect("body")
        .append_child(&root)
        .expect("mount root");
    root
}

#[wasm_bindgen_test]
fn next_starts_a_move_and_guards_until_completion() {
    let root = mount(MARKUP);
    let mut carousel = WebCarousel::new(root.clone()).expect("carousel wires");
    assert_eq!(carousel.advanced_count(), 0);

    assert!(carousel.next());
    assert_eq!(carousel.advanced_count(), 1);
    assert!(!carousel.next(), "second press while sliding is ignored");

    let generation = carousel.in_flight_generation().expect("move in flight");
    carousel.transition_end(generation);
    assert_eq!(carousel.in_flight_generation(), None);

    assert!(carousel.next());
    assert_eq!(carousel.advanced_count(), 2);

    carousel.destroy();
    root.remove();
}

#[wasm_bindgen_test]
fn previous_at_start_does_nothing() {
    let root = mount(MARKUP);
    let mut carousel = WebCarousel::new(root.clone()).expect("carousel wires");
    assert!(!carousel.previous());
    assert_eq!(carousel.advanced_count(), 0);
    carousel.destroy();
    root.remove();
}

#[wasm_bindgen_test]
fn previous_control_is_marked_disabled_at_start() {
    let root = mount(MARKUP);
    let mut carousel = WebCarousel::new(root.clone()).expect("carousel wires");
    let prev = root
        .query_selector(".glissade-prev")
        .expect("query")
        .expect("prev control");
    assert!(prev.class_list().contains("glissade-disabled"));
    assert_eq!(prev.get_attribute("aria-disabled").as_deref(), Some("true"));
    let next = root
        .query_selector(".glissade-next")
        .expect("query")
        .expect("next control");
    assert!(!next.class_list().contains("glissade-disabled"));
    assert_eq!(next.get_attribute("aria-disabled").as_deref(), Some("false"));
    carousel.destroy();
    root.remove();
}

#[wasm_bindgen_test]
fn missing_slide_list_is_rejected() {
    let root = mount(r#"<div class="glissade-frame"></div>"#);
    assert!(WebCarousel::new(root.clone()).is_err());
    root.remove();
}
