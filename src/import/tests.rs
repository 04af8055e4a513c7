use super::*;
use crate::error::Error;
use crate::model::{
    BackgroundType, Block, FloatAlign, FullWidthMode, IdAllocator, Section, TextAlign,
};

fn decode_str(html: &str) -> Vec<Section> {
    decode(html, &mut IdAllocator::new())
}

/// Preview markup as older builds wrote it, indentation included.
const LEGACY_PREVIEW: &str = r#"<!doctype html>
  <html>
    <head>
    <base href="/" />
    <link rel="stylesheet" href="/preview.css" />
    </head>
    <body>
      <main class="canvas-area">
        <section class="section-block" style="background-image:url(https://cdn.test/bg.jpg);background-size:cover;background-position:center;background-repeat:no-repeat;min-height:420px;width:100%">
          <div class="block-wrapper">
            <div class="text-wrapper" style="--block-max:48rem;width:100%;margin:0 auto;padding:0.5rem 0;">
              <div class="prose max-w-none"><h1>Headline</h1><p>Lead</p></div>
            </div>
          </div>
          <div class="block-wrapper">
            <figure class="image-block">
              <img src="/a.png" style="width:320px;height:240px;object-fit:contain;object-position:center;max-width:100%;display:block;" alt="" />
            </figure>
          </div>
        </section>
        <section class="section-block" style="background:#222222;min-height:300px;width:100%"></section>
      </main>
    </body>
  </html>"#;

#[test]
fn test_legacy_preview_page() {
    let sections = decode_str(LEGACY_PREVIEW);
    assert_eq!(sections.len(), 2);

    let first = &sections[0];
    assert_eq!(first.props.bg_type, BackgroundType::Image);
    assert_eq!(first.props.bg_img, "https://cdn.test/bg.jpg");
    assert_eq!(first.props.height, 420);
    assert_eq!(first.props.width, None);
    assert_eq!(first.blocks.len(), 2);

    let Block::Text(text) = &first.blocks[0] else {
        panic!("expected text");
    };
    assert_eq!(text.html, "<h1>Headline</h1><p>Lead</p>");
    assert_eq!(text.props.width, "48rem");

    let Block::Gallery(gallery) = &first.blocks[1] else {
        panic!("expected gallery");
    };
    let image = &gallery.images[0];
    assert_eq!((image.width, image.height), (320, 240));
    assert!(image.keep_ratio);
    assert!((image.aspect_ratio - 4.0 / 3.0).abs() < 1e-9);
    assert_eq!(gallery.layout, "inline");

    assert_eq!(sections[1].props.background, "#222222");
    assert_eq!(sections[1].props.bg_type, BackgroundType::Color);
}

#[test]
fn test_legacy_standalone_page() {
    let html = r#"<!DOCTYPE html>
<html lang="zh-CN"><head><style>.section{}</style></head>
<body>
    <div class="article-container">
        <section class="section" style="width: 960px; min-height: 800px; background-color: #f0f0f0;">
            <div class="text-block" style="max-width: 65ch;">
                <p>First</p>
            </div>
            <figure class="image-block">
                <img src="data:image/png;base64,AAAA" style="width: 200px; height: 100px; object-fit: fill; object-position: center;" alt="Image" />
            </figure>
        </section>
    </div>
</body>
</html>"#;
    let sections = decode_str(html);
    assert_eq!(sections.len(), 1);
    let section = &sections[0];
    assert_eq!(section.props.width, Some(960));
    assert_eq!(section.props.height, 800);
    assert_eq!(section.props.background, "#f0f0f0");

    let Block::Text(text) = &section.blocks[0] else {
        panic!("expected text");
    };
    assert_eq!(text.html, "<p>First</p>");
    assert_eq!(text.align, TextAlign::Left);

    let Block::Gallery(gallery) = &section.blocks[1] else {
        panic!("expected gallery");
    };
    assert_eq!(gallery.images[0].src, "data:image/png;base64,AAAA");
    assert!(!gallery.images[0].keep_ratio);
    assert_eq!(gallery.images[0].aspect_ratio, 2.0);
}

#[test]
fn test_blocks_keep_document_order() {
    let html = r#"<section class="section">
        <div class="video-block"><iframe src="https://www.youtube.com/embed/dQw4w9WgXcQ" width="640" height="360"></iframe></div>
        <div class="text-block"><p>between</p></div>
        <figure class="image-block"><img src="x.png"></figure>
    </section>"#;
    let kinds: Vec<_> = decode_str(html)[0].blocks.iter().map(Block::kind).collect();
    assert_eq!(kinds, vec!["video", "text", "image"]);
}

#[test]
fn test_full_width_and_float() {
    let html = r#"<section class="section-block" style="background:#fff">
      <div class="block-wrapper">
        <figure class="fullwidth-image-block">
          <img src="wide.jpg" class="fullwidth-image" style="width:100%;display:block;object-fit:cover;height:250px;" alt="">
          <figcaption class="image-caption">Skyline &amp; river</figcaption>
        </figure>
      </div>
      <div class="block-wrapper">
        <div class="float-image-container" style="display:flex">
          <figure class="float-image-block" style="width:90%;margin:0;order:1;">
            <img src="side.png" style="width:100%;height:auto;display:block;" alt="">
          </figure>
          <div class="float-text-content" style="flex:1;order:2;">
            <div class="prose max-w-none"><p>Beside</p></div>
          </div>
        </div>
      </div>
    </section>"#;
    let sections = decode_str(html);
    let blocks = &sections[0].blocks;

    let Block::FullWidthImage(full) = &blocks[0] else {
        panic!("expected full-width");
    };
    assert_eq!(full.image.mode, FullWidthMode::Fixed);
    assert_eq!(full.image.item.height, 250);
    assert_eq!(full.image.item.caption, "Skyline & river");

    let Block::FloatImage(float) = &blocks[1] else {
        panic!("expected float");
    };
    assert_eq!(float.image.align, FloatAlign::Left);
    assert_eq!(float.image.width_percent, 70);
    assert_eq!(float.text, "<p>Beside</p>");
    assert_eq!(
        (float.image.item.width, float.image.item.height),
        (300, 300)
    );
}

#[test]
fn test_video_normalisation() {
    let html = r#"<section class="section">
        <iframe src="https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?rel=0"></iframe>
        <iframe src="https://player.vimeo.com/video/1"></iframe>
    </section>"#;
    let sections = decode_str(html);
    assert_eq!(sections[0].blocks.len(), 1);
    let Block::Video(video) = &sections[0].blocks[0] else {
        panic!("expected video");
    };
    assert_eq!(video.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    assert_eq!((video.width, video.height), (560, 315));
    assert!(video.keep_ratio);
}

#[test]
fn test_section_block_preferred_over_section() {
    let html = r#"<div class="section"><p>ignored</p></div>
        <section class="section-block"><div class="text-wrapper"><div class="prose">A</div></div></section>"#;
    let sections = decode_str(html);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].blocks.len(), 1);
}

#[test]
fn test_nested_sections_count_once() {
    let html = r#"<section class="section"><div class="section">
        <div class="text-block">x</div></div></section>"#;
    let sections = decode_str(html);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].blocks.len(), 1);
}

#[test]
fn test_unrecognised_markup() {
    assert!(decode_str("<html><body><h1>Just a page</h1></body></html>").is_empty());
    assert!(decode_str("").is_empty());

    let sections = decode_str(r#"<section class="section"><blink>old</blink><figure class="image-block"></figure></section>"#);
    assert_eq!(sections.len(), 1);
    assert!(sections[0].blocks.is_empty());
}

#[test]
fn test_identifiers_are_distinct() {
    let mut ids = IdAllocator::new();
    let sections = decode(LEGACY_PREVIEW, &mut ids);
    let mut all = vec![sections[0].id, sections[1].id];
    for block in &sections[0].blocks {
        all.extend(block.id());
        all.extend(block.images().iter().map(|i| i.id));
    }
    let count = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), count);
    assert!(ids.last() >= *all.last().unwrap());
}

#[test]
fn test_is_editable_html() {
    assert!(is_editable_html("<main class=\"canvas-area\"></main>"));
    assert!(is_editable_html("<section>"));
    assert!(is_editable_html("<div class=\"block-wrapper\">"));
    assert!(!is_editable_html("<html><body><p>plain</p></body></html>"));
    assert!(!is_editable_html(""));
}

#[test]
fn test_decode_bytes() {
    let mut ids = IdAllocator::new();
    let latin = b"<section class=\"section\"><div class=\"text-block\"><p>Caf\xe9</p></div></section>";
    let sections = decode_bytes(latin, &mut ids).unwrap();
    let Block::Text(text) = &sections[0].blocks[0] else {
        panic!("expected text");
    };
    assert_eq!(text.html, "<p>Café</p>");

    assert!(matches!(
        decode_bytes(b"PK\x03\x04\x00\x00", &mut ids),
        Err(Error::DecodeParse(_))
    ));
}

#[test]
fn test_inline_style_parse_is_exposed() {
    let style = InlineStyle::parse("min-height: 10px");
    assert_eq!(style.px("min-height"), Some(10));
    assert_eq!(css_url("url('a')").as_deref(), Some("a"));
}
