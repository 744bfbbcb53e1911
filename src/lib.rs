//! Pointer-driven kaleidoscope for an HTML canvas.
//!
//! A small particle field paints a square texture which is then mirrored
//! across the viewport with square or triangular symmetry. The core is
//! backend-agnostic (see [`surface::Surface`]); the browser glue is only
//! compiled for `wasm32`.

pub mod clock;
pub mod error;
pub mod kaleidoscope;
pub mod motion;
pub mod options;
pub mod particles;
pub mod surface;
pub mod tiling;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use kaleidoscope::{Kaleidoscope, Lifecycle, Viewport, AREA_SIZE};
pub use options::{Hooks, Options, Shape};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    mod canvas;
    mod input;
    mod options;
    mod preload;
    mod render;

    pub use canvas::{CanvasSprite, CanvasSurface};
    pub use render::{kaleidoscope, KaleidoscopeHandle};

    use crate::Error;

    /// Page bootstrap: the canvas `#cv` lists its image URLs as inline text,
    /// clicking the page fades out `#popup` and lets the spin run down.
    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;
        let Some(element) = document.get_element_by_id("cv") else {
            log::debug!("no #cv canvas on this page, skipping bootstrap");
            return Ok(());
        };
        let canvas = element.dyn_into::<web_sys::HtmlCanvasElement>()?;
        let sources: Vec<String> = canvas
            .inner_html()
            .split_whitespace()
            .map(str::to_owned)
            .collect();

        let opts = js_sys::Object::new();
        js_sys::Reflect::set(&opts, &"globalCompositeOperation".into(), &"lighter".into())?;
        let handle = kaleidoscope(canvas.clone(), sources, opts.into())?;

        let body = document.body().ok_or(Error::NoBody)?;
        let on_click = Closure::<dyn FnMut()>::new(move || {
            if let Err(e) = dismiss_popup(&canvas, &handle) {
                log::error!("popup dismissal failed: {e:?}");
            }
        });
        body.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
        Ok(())
    }

    fn dismiss_popup(canvas: &web_sys::HtmlCanvasElement, handle: &KaleidoscopeHandle) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;
        let popup = document
            .get_element_by_id("popup")
            .ok_or_else(|| Error::MissingElement("popup".into()))?
            .dyn_into::<web_sys::HtmlElement>()?;
        popup.class_list().add_1("fade-out")?;
        canvas.class_list().add_1("clear-blur")?;

        let handle = handle.clone();
        // matches the CSS fade-out transition
        let hide = Closure::once_into_js(move || {
            if let Err(e) = popup.style().set_property("display", "none") {
                log::warn!("could not hide popup: {e:?}");
            }
            handle.stop_movement_after_delay(1000);
        });
        window.set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), 500)?;
        Ok(())
    }
}
