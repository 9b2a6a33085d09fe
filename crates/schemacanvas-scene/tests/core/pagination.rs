use crate::common::{scene, table};
use schemacanvas_core::{Rect, Size};
use schemacanvas_scene::{DiagramScene, PrintPaginator};

fn page_size(scene: &DiagramScene) -> Size {
    let config = scene.config();
    PrintPaginator::new(&config.page, &config.print).page_size(1.0)
}

#[test]
fn test_empty_scene_prints_nothing() {
    let (scene, _) = scene();
    let layout = scene.pages_for_printing(1.0);
    assert!(layout.is_empty());
    assert_eq!(layout.first_page, None);
}

#[test]
fn test_small_diagram_fits_one_page() {
    let (mut scene, _) = scene();
    scene.add_object(table(10.0, 10.0)).unwrap();
    let page = page_size(&scene);

    let layout = scene.pages_for_printing(1.0);
    assert_eq!(layout.pages, vec![Rect::new(0.0, 0.0, page.width, page.height)]);
    assert_eq!(layout.first_page, Some((0, 0)));
    assert_eq!((layout.h_page_count, layout.v_page_count), (1, 1));
}

#[test]
fn test_leading_empty_pages_are_skipped() {
    let (mut scene, _) = scene();
    let page = page_size(&scene);
    scene
        .add_object(table(page.width * 2.0 + 10.0, 10.0))
        .unwrap();

    let layout = scene.pages_for_printing(1.0);
    assert_eq!(layout.first_page, Some((2, 0)));
    assert_eq!(
        layout.pages,
        vec![Rect::new(page.width * 2.0, 0.0, page.width, page.height)]
    );
    assert_eq!(layout.h_page_count, 3);
}

#[test]
fn test_pages_span_contiguous_block() {
    let (mut scene, _) = scene();
    let page = page_size(&scene);
    scene.add_object(table(10.0, 10.0)).unwrap();
    scene
        .add_object(table(page.width + 10.0, page.height + 10.0))
        .unwrap();

    let layout = scene.pages_for_printing(1.0);
    assert_eq!(layout.pages.len(), 4);
    assert_eq!((layout.h_page_count, layout.v_page_count), (2, 2));
    assert_eq!(layout.pages[3].top_left().x, page.width);
}

#[test]
fn test_scale_is_clamped() {
    let (mut scene, _) = scene();
    scene.add_object(table(10.0, 10.0)).unwrap();

    assert_eq!(scene.pages_for_printing(100.0), scene.pages_for_printing(5.0));
    assert_eq!(scene.pages_for_printing(0.0), scene.pages_for_printing(0.1));
}

#[test]
fn test_hidden_objects_are_not_printed() {
    let (mut scene, _) = scene();
    scene.add_layer("Draft");
    scene.add_object(table(10.0, 10.0).with_layers([1])).unwrap();

    assert!(scene.pages_for_printing(1.0).is_empty());
}
