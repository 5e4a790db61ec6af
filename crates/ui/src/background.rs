//! Decorative particle background
//!
//! Draws a [`ParticleField`] on a canvas inside `#particles-js` and keeps it
//! moving with requestAnimationFrame. Hover repulses, click pushes, window
//! resize refits the canvas.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent};

use crate::components::particles::{ParticleConfig, ParticleField};
use crate::dom::PARTICLES_ID;

struct Scene {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    field: RefCell<ParticleField>,
}

impl Scene {
    /// CSS size of the canvas
    fn css_size(&self) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    fn pixel_ratio(&self) -> f64 {
        if self.field.borrow().config().retina_detect {
            window().map_or(1.0, |w| w.device_pixel_ratio()).max(1.0)
        } else {
            1.0
        }
    }

    /// Match the backing store to the CSS size and device pixel ratio
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&self) {
        let (w, h) = self.css_size();
        let ratio = self.pixel_ratio();

        self.canvas.set_width((w * ratio) as u32);
        self.canvas.set_height((h * ratio) as u32);
        let _ = self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);

        self.field.borrow_mut().resize(w, h);
    }

    #[allow(deprecated)]
    fn draw(&self) {
        let (w, h) = self.css_size();
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, w, h);

        let field = self.field.borrow();
        let config = field.config();
        let color = JsValue::from_str(config.color);

        ctx.set_stroke_style(&color);
        ctx.set_line_width(config.link_width);
        for link in field.links() {
            ctx.set_global_alpha(link.opacity);
            ctx.begin_path();
            ctx.move_to(link.from.0, link.from.1);
            ctx.line_to(link.to.0, link.to.1);
            ctx.stroke();
        }

        ctx.set_fill_style(&color);
        ctx.set_global_alpha(config.opacity);
        for p in field.particles() {
            ctx.begin_path();
            let _ = ctx.arc(p.x, p.y, p.radius, 0.0, TAU);
            ctx.fill();
        }

        ctx.set_global_alpha(1.0);
    }
}

/// Start the background on `#particles-js`
pub fn start(doc: &Document) -> Result<(), JsValue> {
    let container = doc
        .get_element_by_id(PARTICLES_ID)
        .ok_or("No #particles-js element")?;

    let canvas = match container.query_selector("canvas")? {
        Some(el) => el.dyn_into::<HtmlCanvasElement>()?,
        None => {
            let canvas = doc.create_element("canvas")?.dyn_into::<HtmlCanvasElement>()?;
            canvas.set_class_name("particles-js-canvas-el");
            let style = canvas.style();
            style.set_property("width", "100%")?;
            style.set_property("height", "100%")?;
            container.append_child(&canvas)?;
            canvas
        }
    };

    let ctx = canvas
        .get_context("2d")?
        .ok_or("No 2d context")?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let rect = canvas.get_bounding_client_rect();
    let field = ParticleField::new(ParticleConfig::default(), rect.width(), rect.height());

    let scene = Rc::new(Scene {
        canvas,
        ctx,
        field: RefCell::new(field),
    });
    scene.resize();

    bind_events(&scene)?;
    run_loop(scene)
}

fn pointer_of(e: &MouseEvent) -> (f64, f64) {
    (f64::from(e.offset_x()), f64::from(e.offset_y()))
}

fn bind_events(scene: &Rc<Scene>) -> Result<(), JsValue> {
    // Hover: repulse
    let s = scene.clone();
    let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
        s.field.borrow_mut().set_pointer(Some(pointer_of(&e)));
    }) as Box<dyn FnMut(_)>);
    scene
        .canvas
        .add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let s = scene.clone();
    let on_leave = Closure::wrap(Box::new(move |_: MouseEvent| {
        s.field.borrow_mut().set_pointer(None);
    }) as Box<dyn FnMut(_)>);
    scene
        .canvas
        .add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
    on_leave.forget();

    // Click: push
    let s = scene.clone();
    let on_click = Closure::wrap(Box::new(move |e: MouseEvent| {
        let (x, y) = pointer_of(&e);
        s.field.borrow_mut().push(x, y);
    }) as Box<dyn FnMut(_)>);
    scene
        .canvas
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let s = scene.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        s.resize();
    }) as Box<dyn FnMut()>);
    window()
        .ok_or("No window")?
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()
        .ok_or("No window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Animate forever; the frame closure re-arms itself
fn run_loop(scene: Rc<Scene>) -> Result<(), JsValue> {
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let rearm = frame.clone();
    let mut last: Option<f64> = None;

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let dt = last.map_or(0.0, |t| (now - t) / 1000.0);
        last = Some(now);

        scene.field.borrow_mut().update(dt);
        scene.draw();

        if let Some(cb) = rearm.borrow().as_ref() {
            let _ = request_frame(cb);
        }
    }) as Box<dyn FnMut(f64)>));

    let first = frame.borrow();
    request_frame(first.as_ref().ok_or("No frame callback")?)?;
    Ok(())
}
