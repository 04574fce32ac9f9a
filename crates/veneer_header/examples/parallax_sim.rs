//! Parallax header simulation
//!
//! Drives a scroll container through a scripted scroll and logs how the
//! header geometry and progress react.
//!
//! Run with:
//! `cargo run -p veneer_header --example parallax_sim`

use veneer_core::{Point, Rect, Result, ScrollView, Size, View};
use veneer_header::{HeaderMode, ParallaxHeader};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let scroll = ScrollView::new();
    scroll.set_frame(Rect::new(0.0, 0.0, 390.0, 844.0));
    scroll.set_content_size(Size::new(390.0, 3000.0));

    let cover = View::new().with_name("cover");
    cover.set_preferred_size(Size::new(240.0, 120.0));

    let header = ParallaxHeader::new();
    header.set_view(&cover)?;
    header.set_mode(HeaderMode::TopFill)?;
    header.set_progress_handler(|header| {
        tracing::info!("progress {:.2}", header.progress());
    });
    header.attach(&scroll)?;
    header.set_height(200.0)?;
    header.set_minimum_height(44.0);

    // Pull down past the rest position, then scroll away.
    for y in (-320..=400).step_by(80) {
        scroll.set_content_offset(Point::new(0.0, y as f32));
        let frame = header.content_view().frame();
        tracing::info!(
            "offset {:>6.1}  header {:>5.1} tall at y {:>6.1}",
            y as f32,
            frame.height,
            frame.y
        );
    }

    Ok(())
}
