//! Reading `Options`/`Hooks` out of a plain JS options object.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::options::{Hooks, Options};

fn get(obj: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined())
}

fn function(obj: &JsValue, key: &str) -> Option<Function> {
    get(obj, key)?.dyn_into::<Function>().ok()
}

/// Unknown keys are ignored and mistyped values keep their defaults.
pub fn parse(obj: &JsValue) -> (Options, Hooks) {
    let mut opts = Options::default();
    if !obj.is_object() {
        return (opts, Hooks::default());
    }

    if let Some(n) = get(obj, "numParticles").and_then(|v| v.as_f64()) {
        opts.num_particles = n.max(0.0) as usize;
    }
    if let Some(v) = get(obj, "bgColor") {
        // an explicit null (or empty string) turns the background fill off
        opts.bg_color = v.as_string().filter(|s| !s.is_empty());
    }
    if let Some(shape) = get(obj, "shape").and_then(|v| v.as_string()) {
        opts.shape = shape.parse().unwrap_or_default();
    }
    if let Some(rot) = get(obj, "rotScreen").and_then(|v| v.as_bool()) {
        opts.rot_screen = rot;
    }
    if let Some(op) = get(obj, "globalCompositeOperation").and_then(|v| v.as_string()) {
        opts.composite_operation = Some(op).filter(|s| !s.is_empty());
    }
    if let Some(seed) = get(obj, "seed").and_then(|v| v.as_f64()) {
        opts.seed = Some(seed as u64);
    }

    let mut hooks = Hooks::default();
    if let Some(f) = function(obj, "postInitHandler") {
        hooks.post_init = Some(Box::new(move || {
            if let Err(e) = f.call0(&JsValue::NULL) {
                log::error!("postInitHandler threw: {e:?}");
            }
        }));
    }
    if let Some(f) = function(obj, "renderHandler") {
        hooks.on_render = Some(Box::new(move |ts| {
            if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_f64(ts)) {
                log::error!("renderHandler threw: {e:?}");
            }
        }));
    }

    (opts, hooks)
}
