use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Holds "is down" information, current pointer position, and the visibility
/// flag. Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Whether the window contents can currently be seen.
    pub visible: bool,

    /// Pointer position in physical pixels, `None` once the pointer leaves.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            focused: false,
            // Windows start visible; the runtime reports occlusion transitions.
            visible: true,
            pointer_pos: None,
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
        }
    }
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes
    /// deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Conservative behavior: on focus loss, clear "down" sets.
                    // Avoids stuck keys/buttons when focus changes mid-press.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::VisibilityChanged(v) => {
                self.visible = *v;
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    let inserted = self.keys_down.insert(*key);
                    if inserted {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    let removed = self.keys_down.remove(key);
                    if removed {
                        frame.keys_released.insert(*key);
                    }
                }
            },

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
            }) => {
                self.pointer_pos = Some((*x, *y));

                match state {
                    MouseButtonState::Pressed => {
                        let inserted = self.buttons_down.insert(*button);
                        if inserted {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        let removed = self.buttons_down.remove(button);
                        if removed {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }
        }

        frame.push_event(ev);
    }

    /// Helper queries
    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(btn: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: btn,
            state: MouseButtonState::Pressed,
            x,
            y,
        })
    }

    #[test]
    fn pointer_button_updates_position() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left, 10.0, 20.0));

        assert_eq!(state.pointer_pos, Some((10.0, 20.0)));
        assert!(state.button_down(MouseButton::Left));
        assert!(frame.buttons_pressed.contains(&MouseButton::Left));
    }

    #[test]
    fn focus_loss_clears_held_buttons() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, press(MouseButton::Left, 0.0, 0.0));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn visibility_flag_tracks_events() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        assert!(state.visible);

        state.apply_event(&mut frame, InputEvent::VisibilityChanged(false));
        assert!(!state.visible);

        state.apply_event(&mut frame, InputEvent::VisibilityChanged(true));
        assert!(state.visible);
    }
}
