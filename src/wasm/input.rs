//! Mouse and touch drag handling.
//!
//! Only the `mousedown`/`touchstart` listeners live on the canvas. Move and
//! release listeners are attached to the document when a drag starts and
//! removed again when it ends.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use js_sys::Function;
use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, Document, MouseEvent, TouchEvent};

use super::render::Shared;
use crate::motion::pointer_angle;
use crate::surface::Surface;
use crate::Error;

fn now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn touch_points(event: &TouchEvent) -> Vec<DVec2> {
    let touches = event.touches();
    (0..touches.length())
        .filter_map(|i| touches.get(i))
        .map(|t| DVec2::new(t.page_x() as f64, t.page_y() as f64))
        .collect()
}

fn press(shared: &Shared, point: DVec2) {
    let mut k = shared.borrow_mut();
    let size = DVec2::new(k.display().width() as f64, k.display().height() as f64);
    k.momentum_mut().press(pointer_angle(point, size), now());
}

fn drag(shared: &Shared, point: DVec2) {
    let mut k = shared.borrow_mut();
    let size = DVec2::new(k.display().width() as f64, k.display().height() as f64);
    k.momentum_mut().drag(pointer_angle(point, size), now());
}

fn release(shared: &Shared, still_down: bool) {
    shared.borrow_mut().momentum_mut().release(still_down, now());
}

/// Document listeners that only exist for the duration of one drag.
struct DragListeners {
    document: Document,
    listeners: Vec<(&'static str, Function)>,
}

impl DragListeners {
    fn attach(&self) -> Result<(), JsValue> {
        for (event, f) in &self.listeners {
            self.document.add_event_listener_with_callback(event, f)?;
        }
        Ok(())
    }

    fn detach(&self) -> Result<(), JsValue> {
        for (event, f) in &self.listeners {
            self.document.remove_event_listener_with_callback(event, f)?;
        }
        Ok(())
    }
}

type Slot = Rc<RefCell<Option<DragListeners>>>;

fn detach(slot: &Slot) {
    if let Some(listeners) = slot.borrow().as_ref() {
        if let Err(e) = listeners.detach() {
            log::warn!("could not remove drag listeners: {e:?}");
        }
    }
}

fn attach(slot: &Slot) {
    if let Some(listeners) = slot.borrow().as_ref() {
        if let Err(e) = listeners.attach() {
            log::warn!("could not add drag listeners: {e:?}");
        }
    }
}

fn function<T: ?Sized + WasmClosure>(closure: &Closure<T>) -> Function {
    closure.as_ref().unchecked_ref::<Function>().clone()
}

/// Installs mouse and touch rotation on `shared`'s display canvas.
pub fn install(shared: &Shared) -> Result<(), JsValue> {
    let document = window()
        .ok_or(Error::NoWindow)?
        .document()
        .ok_or(Error::NoDocument)?;
    let canvas = shared.borrow().display().canvas().clone();

    install_mouse(shared, &document, &canvas)?;
    install_touch(shared, &document, &canvas)?;
    Ok(())
}

fn install_mouse(shared: &Shared, document: &Document, canvas: &web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
    let slot: Slot = Rc::new(RefCell::new(None));

    let on_move = {
        let shared = shared.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            drag(&shared, DVec2::new(e.page_x() as f64, e.page_y() as f64));
        })
    };
    let on_up = {
        let shared = shared.clone();
        let slot = slot.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
            release(&shared, false);
            detach(&slot);
        })
    };
    *slot.borrow_mut() = Some(DragListeners {
        document: document.clone(),
        listeners: vec![("mousemove", function(&on_move)), ("mouseup", function(&on_up))],
    });
    on_move.forget();
    on_up.forget();

    let on_down = {
        let shared = shared.clone();
        Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
            press(&shared, DVec2::new(e.page_x() as f64, e.page_y() as f64));
            attach(&slot);
        })
    };
    canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();
    Ok(())
}

fn install_touch(shared: &Shared, document: &Document, canvas: &web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
    let slot: Slot = Rc::new(RefCell::new(None));

    let on_move = {
        let shared = shared.clone();
        Closure::<dyn FnMut(TouchEvent)>::new(move |e: TouchEvent| {
            if let Some(first) = touch_points(&e).first() {
                drag(&shared, *first);
            }
        })
    };
    let on_end = {
        let shared = shared.clone();
        let slot = slot.clone();
        Closure::<dyn FnMut(TouchEvent)>::new(move |e: TouchEvent| {
            release(&shared, !touch_points(&e).is_empty());
            detach(&slot);
        })
    };
    *slot.borrow_mut() = Some(DragListeners {
        document: document.clone(),
        listeners: vec![("touchmove", function(&on_move)), ("touchend", function(&on_end))],
    });
    on_move.forget();
    on_end.forget();

    let on_start = {
        let shared = shared.clone();
        Closure::<dyn FnMut(TouchEvent)>::new(move |e: TouchEvent| {
            e.prevent_default();
            if let Some(first) = touch_points(&e).first() {
                press(&shared, *first);
            }
            attach(&slot);
        })
    };
    canvas.add_event_listener_with_callback("touchstart", on_start.as_ref().unchecked_ref())?;
    on_start.forget();
    Ok(())
}
