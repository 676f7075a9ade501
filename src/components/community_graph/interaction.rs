//! Pointer gesture state machine.
//!
//! Translates already-hit-tested pointer events into [`Action`]s for the view
//! state to apply, instead of mutating anything from inside event handlers.
//! Per-node lifecycle is `idle -> hovered -> (dragging) -> idle`; pressing
//! the background pans. A click is a press and release with zero intervening
//! drag motion; any movement while a node is held suppresses navigation.
//!
//! Coordinates are canvas screen pixels. Drag deltas are converted to world
//! units by the consumer, which knows the current zoom.

/// Effect of a pointer event, applied by the view state (or, for
/// [`Action::Navigate`], forwarded to the host's router callback).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
	/// Hover target changed.
	SetHover(Option<usize>),
	/// Pin a node at its current position; the start of a drag.
	BeginDrag(usize),
	/// Move a pinned node by a screen-space delta.
	DragBy { node: usize, dx: f64, dy: f64 },
	/// Unpin a node and reheat the simulation.
	ReleaseNode(usize),
	/// Translate the view by a screen-space delta.
	PanBy { dx: f64, dy: f64 },
	/// Node was clicked without dragging; navigate to its community page.
	Navigate(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Gesture {
	Idle,
	Hovering(usize),
	Dragging {
		node: usize,
		last_x: f64,
		last_y: f64,
		moved: bool,
	},
	Panning {
		last_x: f64,
		last_y: f64,
	},
}

/// Owns the current gesture and emits actions for each pointer event.
#[derive(Clone, Debug)]
pub struct InteractionController {
	gesture: Gesture,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self {
			gesture: Gesture::Idle,
		}
	}
}

impl InteractionController {
	/// Pointer pressed at `(x, y)`, over `hit` if any.
	pub fn pointer_down(&mut self, hit: Option<usize>, x: f64, y: f64) -> Vec<Action> {
		match hit {
			Some(node) => {
				self.gesture = Gesture::Dragging {
					node,
					last_x: x,
					last_y: y,
					moved: false,
				};
				vec![Action::BeginDrag(node)]
			}
			None => {
				self.gesture = Gesture::Panning {
					last_x: x,
					last_y: y,
				};
				Vec::new()
			}
		}
	}

	/// Pointer moved to `(x, y)`, over `hit` if any.
	pub fn pointer_move(&mut self, hit: Option<usize>, x: f64, y: f64) -> Vec<Action> {
		match self.gesture {
			Gesture::Dragging {
				node,
				last_x,
				last_y,
				..
			} => {
				let (dx, dy) = (x - last_x, y - last_y);
				if dx == 0.0 && dy == 0.0 {
					return Vec::new();
				}
				self.gesture = Gesture::Dragging {
					node,
					last_x: x,
					last_y: y,
					moved: true,
				};
				vec![Action::DragBy { node, dx, dy }]
			}
			Gesture::Panning { last_x, last_y } => {
				let (dx, dy) = (x - last_x, y - last_y);
				self.gesture = Gesture::Panning {
					last_x: x,
					last_y: y,
				};
				if dx == 0.0 && dy == 0.0 {
					Vec::new()
				} else {
					vec![Action::PanBy { dx, dy }]
				}
			}
			Gesture::Idle | Gesture::Hovering(_) => {
				let previous = match self.gesture {
					Gesture::Hovering(node) => Some(node),
					_ => None,
				};
				if previous == hit {
					return Vec::new();
				}
				self.gesture = match hit {
					Some(node) => Gesture::Hovering(node),
					None => Gesture::Idle,
				};
				vec![Action::SetHover(hit)]
			}
		}
	}

	/// Pointer released.
	pub fn pointer_up(&mut self) -> Vec<Action> {
		match self.gesture {
			Gesture::Dragging { node, moved, .. } => {
				// Released over the node it was pressed on; stay hovered.
				self.gesture = Gesture::Hovering(node);
				if moved {
					vec![Action::ReleaseNode(node)]
				} else {
					vec![Action::ReleaseNode(node), Action::Navigate(node)]
				}
			}
			Gesture::Panning { .. } => {
				self.gesture = Gesture::Idle;
				Vec::new()
			}
			Gesture::Idle | Gesture::Hovering(_) => Vec::new(),
		}
	}

	/// Pointer left the canvas: abandon any gesture and clear hover.
	pub fn pointer_leave(&mut self) -> Vec<Action> {
		let mut actions = Vec::new();
		if let Gesture::Dragging { node, .. } = self.gesture {
			actions.push(Action::ReleaseNode(node));
		}
		actions.push(Action::SetHover(None));
		self.gesture = Gesture::Idle;
		actions
	}

	/// Node currently held by a drag, if any.
	pub fn dragging(&self) -> Option<usize> {
		match self.gesture {
			Gesture::Dragging { node, .. } => Some(node),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn navigations(actions: &[Action]) -> usize {
		actions
			.iter()
			.filter(|a| matches!(a, Action::Navigate(_)))
			.count()
	}

	#[test]
	fn hover_enter_and_leave() {
		let mut ctl = InteractionController::default();
		assert_eq!(ctl.pointer_move(Some(2), 10.0, 10.0), vec![Action::SetHover(Some(2))]);
		// Still over the same node: no churn.
		assert!(ctl.pointer_move(Some(2), 11.0, 10.0).is_empty());
		assert_eq!(ctl.pointer_move(None, 50.0, 50.0), vec![Action::SetHover(None)]);
	}

	#[test]
	fn click_without_motion_navigates_once() {
		let mut ctl = InteractionController::default();
		ctl.pointer_move(Some(1), 5.0, 5.0);
		let down = ctl.pointer_down(Some(1), 5.0, 5.0);
		assert_eq!(down, vec![Action::BeginDrag(1)]);
		let up = ctl.pointer_up();
		assert!(up.contains(&Action::ReleaseNode(1)));
		assert_eq!(navigations(&up), 1);
		assert_eq!(up.last(), Some(&Action::Navigate(1)));
		// A later release emits nothing further.
		assert_eq!(navigations(&ctl.pointer_up()), 0);
	}

	#[test]
	fn any_drag_motion_suppresses_navigation() {
		let mut ctl = InteractionController::default();
		ctl.pointer_down(Some(3), 5.0, 5.0);
		// Drag one pixel away and back onto the press point.
		assert_eq!(
			ctl.pointer_move(Some(3), 6.0, 5.0),
			vec![Action::DragBy { node: 3, dx: 1.0, dy: 0.0 }]
		);
		ctl.pointer_move(Some(3), 5.0, 5.0);
		let up = ctl.pointer_up();
		assert!(up.contains(&Action::ReleaseNode(3)));
		assert_eq!(navigations(&up), 0);
	}

	#[test]
	fn release_after_drag_returns_node_to_hovered() {
		let mut ctl = InteractionController::default();
		ctl.pointer_down(Some(0), 0.0, 0.0);
		assert_eq!(ctl.dragging(), Some(0));
		ctl.pointer_move(None, 9.0, 9.0);
		ctl.pointer_up();
		assert_eq!(ctl.dragging(), None);
		// Moving off the node afterwards clears hover normally.
		assert_eq!(ctl.pointer_move(None, 20.0, 20.0), vec![Action::SetHover(None)]);
	}

	#[test]
	fn background_press_pans_and_never_navigates() {
		let mut ctl = InteractionController::default();
		assert!(ctl.pointer_down(None, 0.0, 0.0).is_empty());
		assert_eq!(
			ctl.pointer_move(None, 4.0, -2.0),
			vec![Action::PanBy { dx: 4.0, dy: -2.0 }]
		);
		assert_eq!(navigations(&ctl.pointer_up()), 0);
	}

	#[test]
	fn leaving_canvas_releases_drag_and_clears_hover() {
		let mut ctl = InteractionController::default();
		ctl.pointer_down(Some(7), 1.0, 1.0);
		let actions = ctl.pointer_leave();
		assert_eq!(actions[0], Action::ReleaseNode(7));
		assert_eq!(actions[1], Action::SetHover(None));
		assert_eq!(navigations(&actions), 0);
		assert_eq!(ctl.dragging(), None);
	}
}
