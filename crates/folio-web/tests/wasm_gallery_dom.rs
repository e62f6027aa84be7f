#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use folio_web::FolioPage;
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|window| window.document())
        .expect("browser document")
}

fn element(document: &Document, tag: &str, class: &str) -> HtmlElement {
    let element: HtmlElement = document
        .create_element(tag)
        .expect("create element")
        .dyn_into()
        .expect("html element");
    element.set_class_name(class);
    element
}

/// Build `<div id="{container_id}"><div class="gallery-track">` with `items` children.
fn mount_gallery(document: &Document, container_id: &str, items: usize) -> HtmlElement {
    let wrapper = element(document, "div", "gallery-wrapper");
    wrapper.set_id(container_id);
    let track = element(document, "div", "gallery-track");
    track
        .style()
        .set_property("display", "flex")
        .expect("style");
    for index in 0..items {
        let item = element(document, "div", "gallery-item");
        item.style().set_property("width", "200px").expect("style");
        item.set_text_content(Some(&format!("item {index}")));
        track.append_child(&item).expect("append item");
    }
    wrapper.append_child(&track).expect("append track");
    document
        .body()
        .expect("body")
        .append_child(&wrapper)
        .expect("append wrapper");
    track
}

#[wasm_bindgen_test]
fn gallery_is_cloned_once_and_slides() {
    let document = document();
    let track = mount_gallery(&document, "sport-gallery", 3);
    let page = FolioPage::new(None).expect("default page");

    assert!(page.init_gallery_infinite("sport-gallery"));
    assert_eq!(track.children().length(), 11);
    assert!(page.init_gallery_infinite("sport-gallery"));
    assert_eq!(track.children().length(), 11);
    assert_eq!(page.gallery_index("sport"), Some(4));

    assert!(page.scroll_gallery("sport", 1));
    assert_eq!(page.gallery_index("sport"), Some(5));
    assert!(page.is_animating("sport"));
    assert!(!page.scroll_gallery("sport", 1));

    let transform = track.style().get_property_value("transform").expect("style");
    assert!(transform.starts_with("translateX("), "got {transform}");
}

/// Resolve after `ms` milliseconds of real time.
async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .expect("window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .expect("set timeout");
    });
    JsFuture::from(promise).await.expect("timer resolves");
}

#[wasm_bindgen_test]
async fn transition_end_rehomes_after_wrapping_backward() {
    let document = document();
    let track = mount_gallery(&document, "loop-gallery", 3);
    let page = FolioPage::new(Some(
        r#"{"gallery":{"transition":"transform 0.05s linear"}}"#.to_owned(),
    ))
    .expect("valid config");

    assert!(page.init_gallery_infinite("loop-gallery"));
    assert_eq!(page.gallery_index("loop"), Some(4));
    // Commit the resting transform so the slide has a start value.
    let _ = track.offset_height();

    assert!(page.scroll_gallery("loop", -1));
    assert_eq!(page.gallery_index("loop"), Some(3));
    assert!(page.is_animating("loop"));

    sleep(500).await;

    assert_eq!(page.gallery_index("loop"), Some(6));
    assert!(!page.is_animating("loop"));
    let logs = page.take_logs();
    assert!(
        logs.iter()
            .filter_map(|line| line.as_string())
            .any(|line| line.contains("outcome=rehomed from=3 to=6")),
        "expected a re-home entry"
    );
}

#[wasm_bindgen_test]
fn missing_pieces_are_reported_not_thrown() {
    let document = document();
    let page = FolioPage::new(None).expect("default page");

    assert!(!page.scroll_gallery("missing", 1));
    assert!(!page.init_gallery_infinite("nope-gallery"));

    let wrapper = element(&document, "div", "gallery-wrapper");
    wrapper.set_id("bare-gallery");
    document
        .body()
        .expect("body")
        .append_child(&wrapper)
        .expect("append wrapper");
    assert!(!page.init_gallery_infinite("bare-gallery"));

    let logs = page.take_logs();
    assert!(logs.length() >= 2);
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    assert!(FolioPage::new(Some(r#"{"gallery":{"clones_count":1}}"#.to_owned())).is_err());
    let page = FolioPage::new(Some(r#"{"gallery":{"clones_count":6}}"#.to_owned()))
        .expect("valid partial config");
    let json = page.config_json().expect("serializable");
    assert!(json.contains("\"clones_count\":6"));
}
