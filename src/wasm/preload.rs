//! Loads every image URL, then hands the whole set over at once.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use super::canvas::CanvasSprite;
use crate::Result;

/// Starts loading `sources` and calls `complete` once all of them fired
/// `load`. A failing image is logged and the join never completes.
pub fn preload_images<F>(sources: &[String], complete: F) -> Result<()>
where
    F: FnOnce(Vec<CanvasSprite>) + 'static,
{
    if sources.is_empty() {
        log::warn!("no image sources given; the kaleidoscope will not start");
        return Ok(());
    }

    let expected = sources.len();
    let loaded: Rc<RefCell<Vec<CanvasSprite>>> = Rc::new(RefCell::new(Vec::with_capacity(expected)));
    let complete: Rc<RefCell<Option<F>>> = Rc::new(RefCell::new(Some(complete)));

    for src in sources {
        let img = HtmlImageElement::new()?;

        let on_load = {
            let img = img.clone();
            let loaded = loaded.clone();
            let complete = complete.clone();
            Closure::once_into_js(move || {
                let mut images = loaded.borrow_mut();
                images.push(CanvasSprite::Image(img));
                if images.len() == expected {
                    let sprites = std::mem::take(&mut *images);
                    drop(images);
                    let done = complete.borrow_mut().take();
                    if let Some(done) = done {
                        done(sprites);
                    }
                }
            })
        };
        img.set_onload(Some(on_load.unchecked_ref()));

        let on_error = {
            let src = src.clone();
            Closure::once_into_js(move || {
                log::warn!("failed to load image {src}; waiting indefinitely");
            })
        };
        img.set_onerror(Some(on_error.unchecked_ref()));

        img.set_src(src);
    }
    Ok(())
}
