use futures::channel::oneshot;
use futures::future::{self, Either, LocalBoxFuture};
use futures::FutureExt;
use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use shared::constants::{SPIN_COMPLETION_GRACE_MS, SPIN_DURATION_MS, SPIN_EASING};
use shared::reel::{ReelSurface, Rect, RenderedCell};
use shared::Prize;
use wasm_bindgen::JsValue;
use web_sys::{window, Document, Element, EventTarget, HtmlElement};
use yew::NodeRef;

use crate::config::get_asset_url;

/// The reel strip as it exists in the DOM. Yew renders the empty containers;
/// cells are managed here because the engine decides their order. `frame` is
/// the full-width box, `viewport` the window the engine sizes inside it.
#[derive(Clone, Default, PartialEq)]
pub struct DomReel {
    pub frame: NodeRef,
    pub viewport: NodeRef,
    pub track: NodeRef,
    pub pointer: NodeRef,
}

fn px(value: &str) -> f64 {
    value.trim().trim_end_matches("px").parse::<f64>().unwrap_or(0.0)
}

fn margins(element: &Element) -> (f64, f64) {
    window()
        .and_then(|w| w.get_computed_style(element).ok().flatten())
        .map(|style| {
            let left = style.get_property_value("margin-left").unwrap_or_default();
            let right = style.get_property_value("margin-right").unwrap_or_default();
            (px(&left), px(&right))
        })
        .unwrap_or((0.0, 0.0))
}

fn rect_of(element: &Element) -> Rect {
    let bounds = element.get_bounding_client_rect();
    Rect::new(bounds.left(), bounds.width())
}

fn margin_box(border_box: Rect, (left, right): (f64, f64)) -> Rect {
    Rect::new(border_box.left - left, border_box.width + left + right)
}

/// Margin box of a cell, so neighbouring cells tile without gaps.
fn cell_rect(element: &Element) -> Rect {
    margin_box(rect_of(element), margins(element))
}

fn prize_cell(document: &Document, prize: &Prize) -> Result<Element, JsValue> {
    let cell = document.create_element("div")?;
    cell.set_class_name("reel-cell");
    cell.set_attribute("data-prize", &prize.name)?;

    if let Some(image) = &prize.image_ref {
        let img = document.create_element("img")?;
        img.set_attribute("src", &get_asset_url(image))?;
        img.set_attribute("alt", &prize.name)?;
        cell.append_child(&img)?;
    }

    let name = document.create_element("div")?;
    name.set_class_name("reel-cell-name");
    name.set_text_content(Some(&prize.name));
    cell.append_child(&name)?;

    if prize.is_win() {
        let price = document.create_element("div")?;
        price.set_class_name("reel-cell-price");
        price.set_text_content(Some(&format!("{} ⭐", prize.value)));
        cell.append_child(&price)?;
    }
    Ok(cell)
}

impl DomReel {
    fn track(&self) -> Option<HtmlElement> {
        self.track.cast::<HtmlElement>()
    }

    fn first_cell(&self) -> Option<Element> {
        self.track()?.first_element_child()
    }
}

impl ReelSurface for DomReel {
    fn render(&self, cells: &[Prize]) {
        let (Some(track), Some(document)) = (self.track(), window().and_then(|w| w.document())) else {
            log::warn!("reel track is not mounted, skipping render");
            return;
        };

        track.set_inner_html("");
        for prize in cells {
            match prize_cell(&document, prize) {
                Ok(cell) => {
                    let _ = track.append_child(&cell);
                }
                Err(e) => log::error!("could not create reel cell: {:?}", e),
            }
        }
    }

    fn reset(&self) {
        let Some(track) = self.track() else { return };
        let style = track.style();
        let _ = style.set_property("transition", "none");
        let _ = style.set_property("transform", "translateX(0px)");
        // Reading layout flushes the reset before the next transition starts.
        let _ = track.offset_width();
    }

    fn cell_width(&self) -> Option<f64> {
        let width = cell_rect(&self.first_cell()?).width;
        (width > 0.0).then_some(width)
    }

    fn viewport_width(&self) -> f64 {
        self.frame
            .cast::<Element>()
            .map(|frame| frame.get_bounding_client_rect().width())
            .unwrap_or(0.0)
    }

    fn fit_viewport(&self, width: f64) {
        if let Some(viewport) = self.viewport.cast::<HtmlElement>() {
            let _ = viewport.style().set_property("width", &format!("{}px", width));
        }
    }

    fn animate_to(&self, offset: f64) -> LocalBoxFuture<'_, ()> {
        let Some(track) = self.track() else {
            return future::ready(()).boxed_local();
        };

        let (done_tx, done_rx) = oneshot::channel::<()>();
        let mut done_tx = Some(done_tx);
        let own_target: EventTarget = track.clone().into();
        // Cell children may run transitions of their own; only the strip counts.
        let listener = EventListener::new(&track, "transitionend", move |event| {
            if event.target().as_ref() == Some(&own_target) {
                if let Some(tx) = done_tx.take() {
                    let _ = tx.send(());
                }
            }
        });

        let style = track.style();
        let _ = style.set_property(
            "transition",
            &format!("transform {}ms {}", SPIN_DURATION_MS, SPIN_EASING),
        );
        let _ = style.set_property("transform", &format!("translateX({}px)", -offset));

        async move {
            let backstop = TimeoutFuture::new(SPIN_DURATION_MS + SPIN_COMPLETION_GRACE_MS);
            match future::select(done_rx, backstop).await {
                Either::Left(_) => log::debug!("reel transition finished"),
                Either::Right(_) => log::warn!("no transitionend from the reel, resolving on the timer"),
            }
            drop(listener);
        }
        .boxed_local()
    }

    fn pointer_rect(&self) -> Option<Rect> {
        self.pointer.cast::<Element>().map(|pointer| rect_of(&pointer))
    }

    fn rendered_cells(&self) -> Vec<RenderedCell> {
        let Some(track) = self.track() else {
            return vec![];
        };
        let children = track.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|cell| RenderedCell {
                rect: cell_rect(&cell),
                label: cell.get_attribute("data-prize").unwrap_or_default(),
            })
            .collect()
    }
}
