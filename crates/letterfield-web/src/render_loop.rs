use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// A `requestAnimationFrame` loop with a single cancellation handle.
///
/// `cancel` (or dropping the loop) cancels the pending frame request
/// synchronously; the callback never runs again afterwards.
pub struct RenderLoop {
    state: Rc<LoopState>,
}

struct LoopState {
    callback: RefCell<Option<FrameCallback>>,
    handle: Cell<Option<i32>>,
    cancelled: Cell<bool>,
}

impl LoopState {
    fn request(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = self.callback.borrow();
        if let Some(cb) = callback.as_ref() {
            let handle = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
            self.handle.set(Some(handle));
        }
        Ok(())
    }
}

impl RenderLoop {
    /// Schedule `on_frame` for every display frame, starting with the next one.
    /// It receives the frame timestamp in milliseconds.
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let state = Rc::new(LoopState {
            callback: RefCell::new(None),
            handle: Cell::new(None),
            cancelled: Cell::new(false),
        });

        // The closure only holds a weak handle so the loop owns its callback, not the reverse
        let weak = Rc::downgrade(&state);
        let callback = Closure::wrap(Box::new(move |now_ms: f64| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            state.handle.set(None);
            if state.cancelled.get() {
                return;
            }
            on_frame(now_ms);
            if state.cancelled.get() {
                return;
            }
            if let Err(err) = state.request() {
                log::error!("render loop stopped: {:?}", err);
            }
        }) as Box<dyn FnMut(f64)>);

        *state.callback.borrow_mut() = Some(callback);
        state.request()?;
        Ok(Self { state })
    }

    /// Cancel the pending frame request. Idempotent.
    pub fn cancel(&self) {
        if self.state.cancelled.replace(true) {
            return;
        }
        if let Some(handle) = self.state.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        !self.state.cancelled.get()
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
