use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlCanvasElement};

use super::canvas::{CanvasSprite, CanvasSurface};
use super::{input, options, preload};
use crate::{Error, Kaleidoscope, Lifecycle, Viewport};

pub(crate) type Shared = Rc<RefCell<Kaleidoscope<CanvasSurface>>>;

/// Bookkeeping for the `requestAnimationFrame` chain.
#[derive(Debug, Default)]
struct FrameLoop {
    anim_id: Cell<i32>,
    stopped: Cell<bool>,
}

/// Current logical viewport (the window's inner size).
fn viewport() -> Result<Viewport, Error> {
    let window = window().ok_or(Error::NoWindow)?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Viewport::new(width as u32, height as u32))
}

/// Creates a kaleidoscope on `canvas` once every image in `images` loaded.
///
/// Recognised `opts` keys: `numParticles`, `bgColor`, `shape`, `rotScreen`,
/// `postInitHandler`, `renderHandler`, `globalCompositeOperation`, `seed`.
#[wasm_bindgen]
pub fn kaleidoscope(canvas: HtmlCanvasElement, images: Vec<String>, opts: JsValue) -> Result<KaleidoscopeHandle, JsValue> {
    let (options, hooks) = options::parse(&opts);
    let surface = CanvasSurface::new(canvas)?;
    let handle = KaleidoscopeHandle {
        shared: Rc::new(RefCell::new(Kaleidoscope::new(surface, options, hooks))),
        frames: Rc::new(FrameLoop::default()),
    };
    input::install(&handle.shared)?;

    let ready = handle.clone();
    preload::preload_images(&images, move |sprites| {
        if let Err(e) = ready.init(sprites) {
            log::error!("kaleidoscope init failed: {e:?}");
        }
    })?;
    Ok(handle)
}

#[wasm_bindgen]
#[derive(Clone)]
pub struct KaleidoscopeHandle {
    shared: Shared,
    frames: Rc<FrameLoop>,
}

impl KaleidoscopeHandle {
    fn init(&self, sprites: Vec<CanvasSprite>) -> Result<(), JsValue> {
        self.shared.borrow_mut().install_sprites(sprites)?;
        self.start()?;
        let post_init = self.shared.borrow_mut().take_post_init();
        if let Some(hook) = post_init {
            hook();
        }
        Ok(())
    }

    fn start(&self) -> Result<(), JsValue> {
        let window = window().ok_or(Error::NoWindow)?;

        // `f` holds the animation-frame closure so that we can keep calling
        // `request_animation_frame` recursively.
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let shared = self.shared.clone();
        let frames = self.frames.clone();
        *g.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            if frames.stopped.get() {
                return;
            }
            match viewport() {
                Ok(vp) => {
                    if let Err(e) = shared.borrow_mut().frame(timestamp, vp) {
                        log::error!("frame failed: {e}");
                    }
                }
                Err(e) => log::error!("viewport unavailable: {e}"),
            }
            // the render hook may have torn us down
            if frames.stopped.get() {
                shared.borrow_mut().destroy();
                return;
            }
            if shared.borrow().lifecycle() == Lifecycle::Destroyed {
                return;
            }

            let Some(window) = web_sys::window() else {
                return;
            };
            let next = f
                .borrow()
                .as_ref()
                .map(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()));
            match next {
                Some(Ok(id)) => frames.anim_id.set(id),
                Some(Err(e)) => log::error!("could not schedule frame: {e:?}"),
                None => {}
            }
        }));

        let id = match g.borrow().as_ref() {
            Some(cb) => window.request_animation_frame(cb.as_ref().unchecked_ref())?,
            None => return Ok(()),
        };
        self.frames.anim_id.set(id);
        Ok(())
    }
}

#[wasm_bindgen]
impl KaleidoscopeHandle {
    /// `{ width, height }` of the window's inner area.
    #[wasm_bindgen(js_name = getSize)]
    pub fn get_size(&self) -> Result<js_sys::Object, JsValue> {
        let vp = viewport()?;
        let size = js_sys::Object::new();
        js_sys::Reflect::set(&size, &"width".into(), &vp.width.into())?;
        js_sys::Reflect::set(&size, &"height".into(), &vp.height.into())?;
        Ok(size)
    }

    /// Current angular velocity in radians per frame.
    #[wasm_bindgen(js_name = deltaAngle)]
    pub fn delta_angle(&self) -> f64 {
        self.shared.borrow().momentum().delta_angle()
    }

    /// False once [`destroy`](Self::destroy) has been called.
    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        !self.frames.stopped.get()
            && self
                .shared
                .try_borrow()
                .map_or(true, |k| k.lifecycle() == Lifecycle::Running)
    }

    /// Zeroes the spin after `delay` ms.
    #[wasm_bindgen(js_name = stopMovementAfterDelay)]
    pub fn stop_movement_after_delay(&self, delay: i32) {
        let shared = self.shared.clone();
        let stop = Closure::once_into_js(move || {
            shared.borrow_mut().momentum_mut().stop();
        });
        let scheduled = window().ok_or(JsValue::from(Error::NoWindow)).and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(stop.unchecked_ref(), delay)
        });
        if let Err(e) = scheduled {
            log::warn!("could not schedule stop: {e:?}");
        }
    }

    /// Stops the animation loop for good.
    pub fn destroy(&self) {
        self.frames.stopped.set(true);
        let id = self.frames.anim_id.get();
        if id != 0 {
            if let Some(window) = window() {
                if let Err(e) = window.cancel_animation_frame(id) {
                    log::warn!("cancelAnimationFrame failed: {e:?}");
                }
            }
        }
        // called from inside the render hook the frame still holds the borrow;
        // the loop sees `stopped` and bails out on its own
        if let Ok(mut k) = self.shared.try_borrow_mut() {
            k.destroy();
        }
        log::debug!("kaleidoscope destroyed");
    }
}
