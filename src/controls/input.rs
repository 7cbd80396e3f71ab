use std::collections::HashSet;

use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixels of trackpad scroll treated as one wheel notch
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Accumulates pointer state from winit events between frames
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    pressed: HashSet<PointerButton>,
    position: Option<(f32, f32)>,
    /// Movement while the primary button is held, since the last take
    drag_delta: (f32, f32),
    /// Movement while the secondary button is held, since the last take
    pan_delta: (f32, f32),
    /// Wheel notches since the last take, positive away from the user
    scroll: f32,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::map_button(*button) {
                    match state {
                        ElementState::Pressed => self.press(btn),
                        ElementState::Released => self.release(btn),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.scroll(notches);
            }
            WindowEvent::Focused(false) => {
                self.pressed.clear();
            }
            _ => {}
        }
    }

    pub fn press(&mut self, button: PointerButton) {
        self.pressed.insert(button);
    }

    pub fn release(&mut self, button: PointerButton) {
        self.pressed.remove(&button);
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if let Some((old_x, old_y)) = self.position {
            if self.is_down(PointerButton::Primary) {
                self.drag_delta.0 += x - old_x;
                self.drag_delta.1 += y - old_y;
            } else if self.is_down(PointerButton::Secondary) {
                self.pan_delta.0 += x - old_x;
                self.pan_delta.1 += y - old_y;
            }
        }
        self.position = Some((x, y));
    }

    pub fn scroll(&mut self, notches: f32) {
        self.scroll += notches;
    }

    pub fn is_down(&self, button: PointerButton) -> bool {
        self.pressed.contains(&button)
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    /// Drag movement accumulated since the previous call
    pub fn take_drag(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.drag_delta)
    }

    /// Secondary-button drag movement accumulated since the previous call
    pub fn take_pan(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.pan_delta)
    }

    /// Wheel notches accumulated since the previous call
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    fn map_button(button: MouseButton) -> Option<PointerButton> {
        match button {
            MouseButton::Left => Some(PointerButton::Primary),
            MouseButton::Right => Some(PointerButton::Secondary),
            _ => None,
        }
    }
}
