//! Optional node icon asset, loaded without blocking the first paint.
//!
//! Nodes render as plain circles until the image resolves, then the renderer
//! swaps to the clipped icon on the next frame. A failed load is silent and
//! permanent: the circle fallback simply stays.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

/// One shared image element plus load-state flags the render loop polls.
pub struct NodeIcon {
	image: HtmlImageElement,
	loaded: Rc<Cell<bool>>,
	failed: Rc<Cell<bool>>,
	_onload: Closure<dyn FnMut()>,
	_onerror: Closure<dyn FnMut()>,
}

impl NodeIcon {
	/// Start loading `src`. Returns `None` only if the image element itself
	/// cannot be created (no DOM).
	pub fn load(src: &str) -> Option<Self> {
		let image = HtmlImageElement::new().ok()?;
		let loaded = Rc::new(Cell::new(false));
		let failed = Rc::new(Cell::new(false));

		let onload: Closure<dyn FnMut()> = {
			let loaded = loaded.clone();
			Closure::new(move || loaded.set(true))
		};
		let onerror: Closure<dyn FnMut()> = {
			let failed = failed.clone();
			Closure::new(move || {
				log::warn!("community-graph: node icon failed to load, using circles");
				failed.set(true);
			})
		};
		image.set_onload(Some(onload.as_ref().unchecked_ref()));
		image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
		image.set_src(src);

		Some(Self {
			image,
			loaded,
			failed,
			_onload: onload,
			_onerror: onerror,
		})
	}

	/// The image, once it is ready to draw.
	pub fn ready(&self) -> Option<&HtmlImageElement> {
		(self.loaded.get() && !self.failed.get() && self.image.natural_width() > 0)
			.then_some(&self.image)
	}
}
