//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit window events into engine Events.
//
// Architecture:
//   Winit WindowEvent → InputProcessor → Event → engine callback
//
// Stateful repeat tracking: each held key counts the OS auto-repeats it
// has produced since it went down; the count resets on release. Unmapped
// keys (F13-F24, media keys, exotic layouts) produce no key events.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::trace;
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::event::{
    Event, KeyCode, KeyPressed, KeyReleased, KeyTyped, MouseButton, MouseButtonPressed,
    MouseButtonReleased, MouseMoved, MouseScrolled, WindowResize,
};

/// Pixel scroll deltas (touchpads) are reported as lines of this height.
const PIXELS_PER_LINE: f64 = 20.0;

//=== InputProcessor ======================================================

/// Converts Winit input to engine events with per-key repeat counting.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    repeat_counts: HashMap<KeyCode, u32>,
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- Keyboard ---------------------------------------------------------

    /// Converts a physical key transition. `None` for unmapped keys.
    pub(crate) fn process_key(
        &mut self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<Event> {
        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => return None,
        };

        if key == KeyCode::Unidentified {
            trace!(target: "platform::input", "Unmapped key ignored");
            return None;
        }

        let event = match state {
            ElementState::Pressed => {
                let count = self.repeat_counts.entry(key).or_insert(0);
                *count = if repeat { *count + 1 } else { 0 };
                Event::new(KeyPressed { key, repeat_count: *count })
            }
            ElementState::Released => {
                self.repeat_counts.remove(&key);
                Event::new(KeyReleased { key })
            }
        };

        Some(event)
    }

    /// One `KeyTyped` per printable character of a key press's text.
    pub(crate) fn process_text<'a>(
        &self,
        text: Option<&'a str>,
        state: ElementState,
    ) -> impl Iterator<Item = Event> + 'a {
        let text = match state {
            ElementState::Pressed => text.unwrap_or_default(),
            ElementState::Released => "",
        };

        text.chars()
            .filter(|character| !character.is_control())
            .map(|character| Event::new(KeyTyped { character }))
    }

    //--- Mouse ------------------------------------------------------------

    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> Event {
        let button = MouseButton::from(button);

        match state {
            ElementState::Pressed => Event::new(MouseButtonPressed { button }),
            ElementState::Released => Event::new(MouseButtonReleased { button }),
        }
    }

    /// Creates a mouse move event (window space, pixels).
    pub(crate) fn process_mouse_move(&self, x: f64, y: f64) -> Event {
        Event::new(MouseMoved { x: x as f32, y: y as f32 })
    }

    /// Normalizes line and pixel deltas to line units.
    pub(crate) fn process_scroll(&self, delta: MouseScrollDelta) -> Event {
        let (x_offset, y_offset) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(position) => (
                (position.x / PIXELS_PER_LINE) as f32,
                (position.y / PIXELS_PER_LINE) as f32,
            ),
        };

        Event::new(MouseScrolled { x_offset, y_offset })
    }

    //--- Window -----------------------------------------------------------

    pub(crate) fn process_resize(&self, size: PhysicalSize<u32>) -> Event {
        Event::new(WindowResize { width: size.width, height: size.height })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Unmapped keys (F13-F24, numpad, media keys) return
/// `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Function Keys ------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn key(code: WinitKeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    fn repeat_count(event: &Event) -> Option<u32> {
        event.payload::<KeyPressed>().map(|e| e.repeat_count)
    }

    #[test]
    fn key_press_and_release() {
        let mut processor = InputProcessor::new();

        let down = processor.process_key(key(WinitKeyCode::KeyW), ElementState::Pressed, false).unwrap();
        assert_eq!(down.payload::<KeyPressed>(), Some(&KeyPressed { key: KeyCode::KeyW, repeat_count: 0 }));

        let up = processor.process_key(key(WinitKeyCode::KeyW), ElementState::Released, false).unwrap();
        assert_eq!(up.payload::<KeyReleased>(), Some(&KeyReleased { key: KeyCode::KeyW }));
    }

    #[test]
    fn repeats_are_counted_until_release() {
        let mut processor = InputProcessor::new();
        let space = key(WinitKeyCode::Space);

        let counts: Vec<Option<u32>> = [false, true, true]
            .into_iter()
            .map(|repeat| processor.process_key(space, ElementState::Pressed, repeat).unwrap())
            .map(|event| repeat_count(&event))
            .collect();
        assert_eq!(counts, vec![Some(0), Some(1), Some(2)]);

        processor.process_key(space, ElementState::Released, false);
        let again = processor.process_key(space, ElementState::Pressed, false).unwrap();
        assert_eq!(repeat_count(&again), Some(0));
    }

    #[test]
    fn unmapped_keys_are_filtered() {
        let mut processor = InputProcessor::new();
        assert!(processor.process_key(key(WinitKeyCode::F13), ElementState::Pressed, false).is_none());
    }

    #[test]
    fn text_becomes_typed_events_on_press_only() {
        let processor = InputProcessor::new();

        let typed: Vec<char> = processor
            .process_text(Some("hi\u{8}"), ElementState::Pressed)
            .filter_map(|event| event.payload::<KeyTyped>().map(|e| e.character))
            .collect();
        assert_eq!(typed, vec!['h', 'i']);

        assert_eq!(processor.process_text(Some("h"), ElementState::Released).count(), 0);
        assert_eq!(processor.process_text(None, ElementState::Pressed).count(), 0);
    }

    #[test]
    fn mouse_buttons_map_to_press_and_release() {
        let processor = InputProcessor::new();

        let press = processor.process_mouse_button(WinitMouseButton::Middle, ElementState::Pressed);
        assert_eq!(press.payload::<MouseButtonPressed>().map(|e| e.button), Some(MouseButton::Middle));

        let release = processor.process_mouse_button(WinitMouseButton::Back, ElementState::Released);
        assert_eq!(release.payload::<MouseButtonReleased>().map(|e| e.button), Some(MouseButton::Other));
    }

    #[test]
    fn scroll_deltas_are_normalized_to_lines() {
        let processor = InputProcessor::new();

        let lines = processor.process_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        assert_eq!(lines.payload::<MouseScrolled>(), Some(&MouseScrolled { x_offset: 0.0, y_offset: 2.0 }));

        let pixels = processor.process_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)));
        assert_eq!(pixels.payload::<MouseScrolled>().map(|e| e.y_offset), Some(2.0));
    }

    #[test]
    fn cursor_and_resize() {
        let processor = InputProcessor::new();

        let moved = processor.process_mouse_move(123.5, 456.0);
        assert_eq!(moved.payload::<MouseMoved>(), Some(&MouseMoved { x: 123.5, y: 456.0 }));

        let resized = processor.process_resize(PhysicalSize::new(800, 600));
        assert_eq!(resized.to_string(), "WindowResize: 800, 600");
    }

    #[test]
    fn keycode_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::F12), KeyCode::F12);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftLeft), KeyCode::ShiftLeft);
        assert_eq!(KeyCode::from(WinitKeyCode::NumpadAdd), KeyCode::Unidentified);
    }
}
