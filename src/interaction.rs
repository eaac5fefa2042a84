//! Pointer gesture routing.
//!
//! A press arms a click. If any single move travels more than
//! [`DRAG_THRESHOLD`] pixels on either axis the gesture becomes a drag and can
//! no longer toggle. Every move during a gesture rotates the group.
//!
//! ```ignore
//! let mut router = InteractionRouter::new();
//! router.handle(PointerEvent::Down(Vec2::new(10.0, 10.0)));
//! assert_eq!(router.handle(PointerEvent::Up), RouterAction::Toggle);
//! ```

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};

/// Movement in pixels, on either axis and within one move, that turns a click
/// into a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Radians of rotation per pixel of pointer movement.
pub const ROTATE_SPEED: f32 = 0.005;

/// Pointer input in window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up,
    /// Pointer left the window.
    Leave,
}

/// What the scene should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouterAction {
    None,
    /// Rotate the group by these angles, in radians.
    Rotate { yaw: f32, pitch: f32 },
    /// Flip between settled and dispersed.
    Toggle,
}

/// Gesture progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    /// Pressed, still a click candidate.
    Armed { last: Vec2 },
    Dragging { last: Vec2 },
}

/// Converts pointer events into rotations and toggles.
#[derive(Debug)]
pub struct InteractionRouter {
    state: GestureState,
    /// Last known cursor position, for winit press events which carry none.
    cursor: Option<Vec2>,
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            cursor: None,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Whether a gesture is in progress. Idle rotation pauses meanwhile.
    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> RouterAction {
        match (self.state, event) {
            (_, PointerEvent::Down(pos)) => {
                self.state = GestureState::Armed { last: pos };
                RouterAction::None
            }
            (
                GestureState::Armed { last } | GestureState::Dragging { last },
                PointerEvent::Move(pos),
            ) => {
                let delta = pos - last;
                let crossed = delta.x.abs() > DRAG_THRESHOLD || delta.y.abs() > DRAG_THRESHOLD;
                self.state = match self.state {
                    GestureState::Armed { .. } if !crossed => GestureState::Armed { last: pos },
                    _ => GestureState::Dragging { last: pos },
                };
                RouterAction::Rotate {
                    yaw: delta.x * ROTATE_SPEED,
                    pitch: delta.y * ROTATE_SPEED,
                }
            }
            (GestureState::Idle, PointerEvent::Move(_)) => RouterAction::None,
            (state, PointerEvent::Up) => {
                self.state = GestureState::Idle;
                if matches!(state, GestureState::Armed { .. }) {
                    RouterAction::Toggle
                } else {
                    RouterAction::None
                }
            }
            (_, PointerEvent::Leave) => {
                self.state = GestureState::Idle;
                RouterAction::None
            }
        }
    }

    /// Record the cursor position and feed it as a move.
    pub fn cursor_moved(&mut self, pos: Vec2) -> RouterAction {
        self.cursor = Some(pos);
        self.handle(PointerEvent::Move(pos))
    }

    /// Press at the last known cursor position.
    ///
    /// Ignored until the cursor has been seen, so a press never arms at a
    /// made-up position.
    pub fn press(&mut self) -> RouterAction {
        match self.cursor {
            Some(pos) => self.handle(PointerEvent::Down(pos)),
            None => RouterAction::None,
        }
    }

    /// Cursor left the window; its position is unknown until the next move.
    pub fn cursor_left(&mut self) -> RouterAction {
        self.cursor = None;
        self.handle(PointerEvent::Leave)
    }

    /// Translate a winit window event and feed it through [`handle`](Self::handle).
    ///
    /// Only the left button drives gestures.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> RouterAction {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32))
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.press(),
                ElementState::Released => self.handle(PointerEvent::Up),
            },
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            _ => RouterAction::None,
        }
    }
}

impl Default for InteractionRouter {
    fn default() -> Self {
        Self::new()
    }
}
