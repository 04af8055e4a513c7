use serde_json::json;

use super::*;
use crate::assets::FixedProbe;
use crate::export::HtmlVariant;
use crate::util::tests::png_header;

fn editor_with_section() -> (Editor, Identifier) {
    let mut editor = Editor::new();
    let id = editor.add_section(None).id;
    assert!(editor.select_section(id));
    (editor, id)
}

fn probe(width: u32, height: u32) -> FixedProbe {
    FixedProbe(Dimensions::new(width, height))
}

fn gallery(editor: &Editor, index: usize) -> &GalleryBlock {
    match &editor.sections()[0].blocks[index] {
        Block::Gallery(g) => g,
        other => panic!("expected gallery, got {}", other.kind()),
    }
}

#[test]
fn test_blocks_need_a_section() {
    let mut editor = Editor::new();
    editor.add_section(None);
    assert!(matches!(editor.add_text_block(), Err(Error::NoSectionSelected)));
    assert!(matches!(
        editor.add_video_block("https://youtu.be/dQw4w9WgXcQ"),
        Err(Error::NoSectionSelected)
    ));
    assert!(matches!(
        editor.add_image_with(ImageKind::Gallery, "a.png", &probe(10, 10)),
        Err(Error::NoSectionSelected)
    ));
    assert!(editor.sections()[0].blocks.is_empty());
}

#[test]
fn test_add_section_defaults() {
    let mut editor = Editor::new();
    let first = editor.add_section(None).id;
    let second = editor.add_section(Some(960)).clone();
    assert!(second.id > first);
    assert_eq!(second.props.width, Some(960));
    assert_eq!(second.props.height, 300);
    assert_eq!(second.props.background, "#ffffff");
    assert_eq!(second.props.bg_type, BackgroundType::Color);
    assert!(editor.selection().is_none());
}

#[test]
fn test_add_text_block_selects_it() {
    let (mut editor, section_id) = editor_with_section();
    let block_id = editor.add_text_block().unwrap();
    assert_eq!(
        editor.selection(),
        Selection::Block {
            section_id,
            block_id
        }
    );
    let Some(Block::Text(text)) = editor.current_block() else {
        panic!("expected text block");
    };
    assert_eq!(text.html, TEXT_PLACEHOLDER);
    assert_eq!(text.props.width, "65ch");
    assert_eq!(text.align, TextAlign::Left);
}

#[test]
fn test_gallery_fills_then_overflows() {
    let (mut editor, _) = editor_with_section();
    for i in 0..4 {
        let outcome = editor
            .add_image_with(ImageKind::Gallery, "a.png", &probe(1200, 800))
            .unwrap();
        let ImageOutcome::Added { image_index, .. } = outcome else {
            panic!("image discarded");
        };
        assert_eq!(image_index, i);
    }
    assert_eq!(editor.sections()[0].blocks.len(), 1);
    assert_eq!(gallery(&editor, 0).images.len(), 4);

    editor
        .add_image_with(ImageKind::Gallery, "b.png", &probe(1200, 800))
        .unwrap();
    assert_eq!(editor.sections()[0].blocks.len(), 2);
    assert_eq!(gallery(&editor, 1).images.len(), 1);

    let image = &gallery(&editor, 0).images[0];
    assert_eq!((image.width, image.height), (300, 200));
    assert_eq!(image.aspect_ratio, 1.5);
    assert!(image.keep_ratio);
    assert_eq!(image.caption_position, "bottom");
}

#[test]
fn test_gallery_not_reused_unless_selected() {
    let (mut editor, section_id) = editor_with_section();
    editor
        .add_image_with(ImageKind::Gallery, "a.png", &probe(10, 10))
        .unwrap();
    editor.select_section(section_id);
    editor
        .add_image_with(ImageKind::Gallery, "b.png", &probe(10, 10))
        .unwrap();
    assert_eq!(editor.sections()[0].blocks.len(), 2);
}

#[test]
fn test_zero_natural_size_falls_back() {
    let (mut editor, _) = editor_with_section();
    editor
        .add_image_with(ImageKind::Gallery, "a.svg", &probe(0, 0))
        .unwrap();
    let image = &gallery(&editor, 0).images[0];
    assert_eq!((image.width, image.height), (300, 300));
    assert_eq!(image.aspect_ratio, 1.0);
}

#[test]
fn test_stale_image_request_is_discarded() {
    let (mut editor, _) = editor_with_section();
    let slow = editor.blobs_mut().create(png_header(4, 4), "image/png");
    let fast = editor.blobs_mut().create(png_header(8, 8), "image/png");
    let first = editor.begin_image(ImageKind::Gallery, &slow).unwrap();
    let second = editor.begin_image(ImageKind::Gallery, &fast).unwrap();

    let outcome = editor
        .finish_image(second, Ok(Dimensions::new(100, 100)))
        .unwrap();
    assert!(matches!(outcome, ImageOutcome::Added { .. }));

    let outcome = editor
        .finish_image(first, Ok(Dimensions::new(100, 100)))
        .unwrap();
    assert_eq!(outcome, ImageOutcome::Discarded);

    assert_eq!(editor.sections()[0].blocks.len(), 1);
    assert_eq!(gallery(&editor, 0).images[0].src, fast);
    assert!(!editor.blobs().contains(&slow));
    assert!(editor.blobs().contains(&fast));

    editor.clear_all_sections();
    assert_eq!(editor.blobs().outstanding(), 0);
}

#[test]
fn test_discarded_request_keeps_handle_in_use() {
    let (mut editor, _) = editor_with_section();
    let handle = editor.blobs_mut().create(png_header(4, 4), "image/png");
    editor.set_sec_bg_img(&handle);

    let stale = editor.begin_image(ImageKind::Float, &handle).unwrap();
    editor.begin_image(ImageKind::Float, "other.png").unwrap();
    let outcome = editor
        .finish_image(stale, Ok(Dimensions::new(4, 4)))
        .unwrap();
    assert_eq!(outcome, ImageOutcome::Discarded);
    assert!(editor.blobs().contains(&handle));
}

#[test]
fn test_pending_image_dropped_with_its_section() {
    let (mut editor, _) = editor_with_section();
    let pending = editor.begin_image(ImageKind::Float, "a.png").unwrap();
    assert!(editor.delete_selected());
    let outcome = editor
        .finish_image(pending, Ok(Dimensions::new(10, 10)))
        .unwrap();
    assert_eq!(outcome, ImageOutcome::Discarded);
    assert!(editor.sections().is_empty());
}

#[test]
fn test_failed_probe_leaves_document_unchanged() {
    let (mut editor, _) = editor_with_section();
    let err = editor.add_image_block("https://example.com/a.png").unwrap_err();
    assert!(matches!(err, Error::ImageLoad(_)));
    assert!(editor.sections()[0].blocks.is_empty());
}

#[test]
fn test_failed_probe_releases_handle() {
    let (mut editor, _) = editor_with_section();
    let handle = editor.blobs_mut().create(b"not an image".to_vec(), "image/png");
    let pending = editor.begin_image(ImageKind::Gallery, &handle).unwrap();

    let err = editor
        .finish_image(pending, Err(Error::ImageLoad("decode failed".to_string())))
        .unwrap_err();
    assert!(matches!(err, Error::ImageLoad(_)));
    assert!(editor.sections()[0].blocks.is_empty());
    assert_eq!(editor.blobs().outstanding(), 0);
}

#[test]
fn test_add_image_from_blob_handle() {
    let (mut editor, _) = editor_with_section();
    let handle = editor.blobs_mut().create(png_header(640, 480), "image/png");
    editor.add_image_block(&handle).unwrap();

    let image = &gallery(&editor, 0).images[0];
    assert_eq!(image.src, handle);
    assert_eq!(image.transient_ref.as_deref(), Some(handle.as_str()));
    assert_eq!((image.width, image.height), (300, 225));
}

#[test]
fn test_full_width_defaults() {
    let (mut editor, _) = editor_with_section();
    editor
        .add_image_with(ImageKind::FullWidth, "wide.jpg", &probe(2000, 500))
        .unwrap();
    let Some(Block::FullWidthImage(block)) = editor.current_block() else {
        panic!("expected full-width block");
    };
    assert_eq!(block.image.mode, FullWidthMode::Auto);
    assert_eq!(block.image.item.height, FULL_WIDTH_DEFAULT_HEIGHT);
    assert_eq!(block.image.item.aspect_ratio, 4.0);

    assert!(editor.set_full_width_img_height(250));
    assert!(editor.set_full_width_img_mode(FullWidthMode::Fixed));
    let Some(Block::FullWidthImage(block)) = editor.current_block() else {
        panic!("expected full-width block");
    };
    assert_eq!(block.image.item.height, 250);
    assert_eq!(block.image.mode, FullWidthMode::Fixed);
}

#[test]
fn test_float_defaults_and_clamp() {
    let (mut editor, _) = editor_with_section();
    editor
        .add_image_with(ImageKind::Float, "side.png", &probe(400, 300))
        .unwrap();
    let Some(Block::FloatImage(block)) = editor.current_block() else {
        panic!("expected float block");
    };
    assert_eq!(block.image.align, FloatAlign::Right);
    assert_eq!(block.image.width_percent, 45);
    assert_eq!(block.text, FLOAT_TEXT_PLACEHOLDER);

    assert!(editor.set_float_img_width(5));
    assert!(editor.set_float_img_align(FloatAlign::Left));
    assert!(editor.set_float_text("<p>beside</p>"));
    let Some(Block::FloatImage(block)) = editor.current_block() else {
        panic!("expected float block");
    };
    assert_eq!(block.image.width_percent, FLOAT_WIDTH_MIN);
    assert_eq!(block.image.align, FloatAlign::Left);
    assert_eq!(block.text, "<p>beside</p>");

    editor.set_float_img_width(95);
    let Some(Block::FloatImage(block)) = editor.current_block() else {
        panic!("expected float block");
    };
    assert_eq!(block.image.width_percent, FLOAT_WIDTH_MAX);
}

#[test]
fn test_video_block() {
    let (mut editor, _) = editor_with_section();
    assert!(matches!(
        editor.add_video_block("https://vimeo.com/1"),
        Err(Error::InvalidVideoUrl(_))
    ));
    assert!(editor.sections()[0].blocks.is_empty());

    editor
        .add_video_block("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .unwrap();
    assert!(editor.set_video_width(112));
    let Some(Block::Video(video)) = editor.current_block() else {
        panic!("expected video");
    };
    assert_eq!(video.video_id, "dQw4w9WgXcQ");
    assert_eq!((video.width, video.height), (112, 63));

    assert!(editor.set_video_keep_ratio(false));
    assert!(editor.set_video_height(100));
    let Some(Block::Video(video)) = editor.current_block() else {
        panic!("expected video");
    };
    assert_eq!((video.width, video.height), (112, 100));
}

#[test]
fn test_image_geometry_follows_selection() {
    let (mut editor, _) = editor_with_section();
    editor
        .add_image_with(ImageKind::Gallery, "a.png", &probe(400, 200))
        .unwrap();
    editor
        .add_image_with(ImageKind::Gallery, "b.png", &probe(300, 300))
        .unwrap();

    assert!(editor.set_img_width(100));
    let images = &gallery(&editor, 0).images;
    assert_eq!((images[0].width, images[0].height), (300, 150));
    assert_eq!((images[1].width, images[1].height), (100, 100));

    assert!(editor.set_img_keep_ratio(false));
    assert!(editor.set_img_height(40));
    assert!(editor.set_caption("A caption"));
    assert!(editor.set_caption_bubble_animated(true));
    let image = &gallery(&editor, 0).images[1];
    assert_eq!((image.width, image.height), (100, 40));
    assert_eq!(image.caption, "A caption");
    assert!(image.caption_bubble_animated);
}

#[test]
fn test_setters_ignore_wrong_selection() {
    let (mut editor, _) = editor_with_section();
    assert!(!editor.set_img_width(10));
    assert!(!editor.set_text_html("<p>x</p>"));
    assert!(!editor.set_video_width(10));

    editor.add_text_block().unwrap();
    assert!(!editor.set_float_img_width(30));
    assert!(!editor.set_caption("x"));
    assert!(editor.set_text_html("<p>x</p>"));
    assert!(editor.set_text_width("40rem"));
    assert!(editor.set_text_align(TextAlign::Center));

    editor.not_selected();
    assert!(!editor.set_sec_height(10));
}

#[test]
fn test_section_background() {
    let (mut editor, _) = editor_with_section();
    let first = editor.blobs_mut().create(png_header(1, 1), "image/png");
    let second = editor.blobs_mut().create(png_header(1, 1), "image/png");

    assert!(editor.set_sec_bg_img(&first));
    assert!(editor.set_sec_bg_img(&first));
    assert!(editor.blobs().contains(&first));

    assert!(editor.set_sec_bg_img(&second));
    assert!(!editor.blobs().contains(&first));
    let props = &editor.sections()[0].props;
    assert_eq!(props.bg_type, BackgroundType::Image);
    assert_eq!(props.transient_ref.as_deref(), Some(second.as_str()));

    assert!(editor.set_sec_bg("#123456"));
    assert!(editor.set_sec_height(480));
    let props = &editor.sections()[0].props;
    assert_eq!(props.bg_type, BackgroundType::Color);
    assert_eq!(props.bg_img, second);
    assert_eq!(props.height, 480);

    assert!(editor.set_sec_height(0));
    assert_eq!(editor.sections()[0].props.height, 1);

    assert!(editor.set_sec_type(BackgroundType::Image));
    assert_eq!(editor.sections()[0].props.active_image(), Some(second.as_str()));
}

#[test]
fn test_select_missing_target_clears() {
    let (mut editor, section_id) = editor_with_section();
    let block_id = editor.add_text_block().unwrap();

    assert!(!editor.select_image(section_id, block_id, 0));
    assert!(editor.selection().is_none());

    assert!(editor.select_block(section_id, block_id));
    assert!(!editor.select_section(Identifier(1)));
    assert!(editor.selection().is_none());
}

#[test]
fn test_move_section_and_block() {
    let mut editor = Editor::new();
    let a = editor.add_section(None).id;
    let b = editor.add_section(None).id;
    let c = editor.add_section(None).id;

    assert!(editor.move_section(c, 0));
    assert!(editor.move_section(a, 99));
    let order: Vec<_> = editor.sections().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![c, b, a]);

    editor.select_section(b);
    let t1 = editor.add_text_block().unwrap();
    editor.select_section(b);
    let t2 = editor.add_text_block().unwrap();
    assert!(editor.move_block(b, t2, 0));
    let blocks: Vec<_> = editor.sections()[1]
        .blocks
        .iter()
        .filter_map(Block::id)
        .collect();
    assert_eq!(blocks, vec![t2, t1]);
    assert!(!editor.move_block(a, t1, 0));
}

#[test]
fn test_delete_gallery_images() {
    let (mut editor, section_id) = editor_with_section();
    let h1 = editor.blobs_mut().create(png_header(10, 10), "image/png");
    let h2 = editor.blobs_mut().create(png_header(10, 10), "image/png");
    editor.add_image_block(&h1).unwrap();
    let ImageOutcome::Added { block_id, .. } = editor.add_image_block(&h2).unwrap() else {
        panic!("image discarded");
    };

    assert!(editor.select_image(section_id, block_id, 0));
    assert!(editor.delete_selected());
    assert!(!editor.blobs().contains(&h1));
    assert!(editor.blobs().contains(&h2));
    assert_eq!(gallery(&editor, 0).images.len(), 1);
    assert_eq!(
        editor.selection(),
        Selection::Block {
            section_id,
            block_id
        }
    );

    editor.select_image(section_id, block_id, 0);
    assert!(editor.delete_selected());
    assert!(editor.sections()[0].blocks.is_empty());
    assert_eq!(editor.selection(), Selection::Section { section_id });
    assert_eq!(editor.blobs().outstanding(), 0);
}

#[test]
fn test_delete_section_releases_handles() {
    let (mut editor, _) = editor_with_section();
    let bg = editor.blobs_mut().create(png_header(1, 1), "image/png");
    let img = editor.blobs_mut().create(png_header(5, 5), "image/png");
    editor.set_sec_bg_img(&bg);
    editor.add_float_image_block(&img).unwrap();

    let section_id = editor.selection().section_id().unwrap();
    editor.select_section(section_id);
    assert!(editor.delete_selected());
    assert!(editor.sections().is_empty());
    assert_eq!(editor.blobs().outstanding(), 0);
    assert!(!editor.delete_selected());
}

#[test]
fn test_shared_handle_outlives_one_owner() {
    let (mut editor, _) = editor_with_section();
    let handle = editor.blobs_mut().create(png_header(40, 20), "image/png");
    editor.set_sec_bg_img(&handle);
    editor.add_full_width_image_block(&handle).unwrap();

    assert!(editor.delete_selected());
    assert!(editor.sections()[0].blocks.is_empty());
    assert!(editor.blobs().contains(&handle));

    let html = editor.export_html(&HtmlConfig::default());
    assert!(!html.contains("blob:"));
    assert!(html.contains("data:image/png;base64,"));

    let other = editor.blobs_mut().create(png_header(1, 1), "image/png");
    editor.add_float_image_block(&handle).unwrap();
    let section_id = editor.selection().section_id().unwrap();
    editor.select_section(section_id);
    assert!(editor.set_sec_bg_img(&other));
    assert!(editor.blobs().contains(&handle));
}

#[test]
fn test_clear_all_sections() {
    let (mut editor, _) = editor_with_section();
    let handle = editor.blobs_mut().create(png_header(2, 2), "image/png");
    editor.add_full_width_image_block(&handle).unwrap();

    editor.clear_all_sections();
    assert!(editor.sections().is_empty());
    assert!(editor.selection().is_none());
    assert_eq!(editor.blobs().outstanding(), 0);
}

#[test]
fn test_load_rejects_bad_input() {
    let (mut editor, _) = editor_with_section();
    editor.add_text_block().unwrap();
    let before = editor.sections().to_vec();

    for data in [json!("not json"), json!(42), json!({"id": 1}), json!([{"blocks": []}])] {
        assert!(matches!(
            editor.load_sections(&data),
            Err(Error::LoadFormat(_))
        ));
    }
    assert_eq!(editor.sections(), before.as_slice());
}

#[test]
fn test_load_rejects_out_of_range_ids() {
    let (mut editor, section_id) = editor_with_section();
    assert!(matches!(
        editor.load_json(r#"[{"id": 18446744073709551615, "blocks": []}]"#),
        Err(Error::LoadFormat(_))
    ));
    assert!(editor.load_json(r#"[{"id": 1e30}, {"id": 1e30}]"#).is_err());
    assert_eq!(editor.sections()[0].id, section_id);

    let added = editor.add_section(None).id;
    assert!(added > section_id);
}

#[test]
fn test_load_string_and_array_forms() {
    let doc = json!([{
        "id": 10,
        "blocks": [{"id": 11, "type": "text", "html": "<p>a</p>"}],
        "props": {"height": 200, "bgType": "color", "background": "#000000", "bgImg": ""}
    }]);

    let mut editor = Editor::new();
    assert_eq!(editor.load_sections(&doc).unwrap(), 1);
    let from_array = editor.sections().to_vec();

    assert_eq!(
        editor
            .load_sections(&json!(serde_json::to_string(&doc).unwrap()))
            .unwrap(),
        1
    );
    assert_eq!(editor.sections(), from_array.as_slice());
    assert_eq!(editor.sections()[0].props.height, 200);
}

#[test]
fn test_load_deduplicates_ids() {
    let doc = json!([
        {"id": 5, "blocks": [
            {"id": 5, "type": "text", "html": ""},
            {"id": 6, "type": "text", "html": ""}
        ]},
        {"id": 6, "blocks": []}
    ]);
    let mut editor = Editor::new();
    editor.load_sections(&doc).unwrap();

    let mut ids: Vec<Identifier> = Vec::new();
    for section in editor.sections() {
        ids.push(section.id);
        ids.extend(section.blocks.iter().filter_map(Block::id));
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    let fresh = editor.add_section(None).id;
    assert!(!ids.contains(&fresh));
}

#[test]
fn test_load_drops_dead_handles() {
    let doc = json!([{
        "id": 1,
        "blocks": [],
        "props": {"bgType": "image", "bgImg": "blob:newsworthy/9", "_blobUrl": "blob:newsworthy/9"}
    }]);
    let mut editor = Editor::new();
    editor.load_sections(&doc).unwrap();
    assert_eq!(editor.sections()[0].props.transient_ref, None);
    assert_eq!(editor.sections()[0].props.bg_img, "blob:newsworthy/9");
}

#[test]
fn test_json_round_trip() {
    let (mut editor, _) = editor_with_section();
    editor.add_text_block().unwrap();
    editor.set_sec_bg("#abcdef");
    editor
        .add_image_with(ImageKind::FullWidth, "wide.jpg", &probe(2000, 500))
        .unwrap();
    let json = editor.to_json().unwrap();

    let mut other = Editor::new();
    other.load_json(&json).unwrap();
    assert_eq!(other.sections(), editor.sections());
}

#[test]
fn test_export_externalizes_a_copy() {
    let (mut editor, _) = editor_with_section();
    let handle = editor.blobs_mut().create(png_header(4, 4), "image/png");
    editor.add_image_block(&handle).unwrap();

    for variant in [HtmlVariant::Preview, HtmlVariant::Standalone] {
        let html = editor.export_html(&HtmlConfig::default().with_variant(variant));
        assert!(html.contains("data:image/png;base64,"));
        assert!(!html.contains("blob:"));
    }
    assert_eq!(gallery(&editor, 0).images[0].src, handle);
    assert!(editor.blobs().contains(&handle));
}

#[test]
fn test_import_replaces_document() {
    let (mut editor, _) = editor_with_section();
    editor.add_text_block().unwrap();
    editor.set_text_html("<p>kept</p>");
    let html = editor.export_html(&HtmlConfig::default());

    let mut other = Editor::new();
    other.add_section(None);
    other.add_section(None);
    assert_eq!(other.import_html(&html), 1);
    let Block::Text(text) = &other.sections()[0].blocks[0] else {
        panic!("expected text block");
    };
    assert_eq!(text.html, "<p>kept</p>");
}

#[test]
fn test_import_bytes_failure_empties_document() {
    let (mut editor, _) = editor_with_section();
    let err = editor.import_html_bytes(b"\x00\x01\x02garbage").unwrap_err();
    assert!(matches!(err, Error::DecodeParse(_)));
    assert!(editor.sections().is_empty());
}
