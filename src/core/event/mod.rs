//=========================================================================
// Event Model
//
// A closed, tagged set of engine events. Each variant carries its own
// payload type, a category bitmask and a stable type identity; every
// event instance carries one mutable `handled` flag.
//
// Event Flow:
// ```text
// Native window callback
//         ↓
//    Event (this module)          constructed per native event
//         ↓
//    Engine::on_event             window-level handling (close, resize)
//         ↓
//    Scene::dispatch_event        scene hook, then entities
//         ↓
//    Entity::on_event             behaviors, first claim wins
// ```
//
// Events are never queued or persisted: one instance travels through one
// dispatch chain by `&mut` and is dropped at its end.
//
//=========================================================================

//=== Submodules ==========================================================

mod dispatcher;
mod input;

//=== Public API ==========================================================

pub use dispatcher::EventDispatcher;
pub use input::{KeyCode, MouseButton};

//=== Standard Library Imports ============================================

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

//=== EventCategory =======================================================

/// Category bitmask. A variant may belong to several categories at once.
///
/// ```text
/// APPLICATION   0b00001   window lifecycle
/// INPUT         0b00010   any user input
/// KEYBOARD      0b00100   key press / release / typed
/// MOUSE         0b01000   cursor, wheel, buttons
/// MOUSE_BUTTON  0b10000   button press / release
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventCategory(u8);

impl EventCategory {
    pub const NONE: Self = Self(0);
    pub const APPLICATION: Self = Self(1 << 0);
    pub const INPUT: Self = Self(1 << 1);
    pub const KEYBOARD: Self = Self(1 << 2);
    pub const MOUSE: Self = Self(1 << 3);
    pub const MOUSE_BUTTON: Self = Self(1 << 4);

    /// Const-context union of two masks.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if any bit of `other` is set in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the raw bitmask.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for EventCategory {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for EventCategory {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

//=== EventVariant ========================================================

/// Implemented by every event payload type.
///
/// Provides the static type identity the dispatcher compares against and
/// the narrowing from the closed [`EventKind`] set to the concrete payload.
pub trait EventVariant: Sized + 'static {
    /// Static type identity of this variant.
    const TYPE: EventType;

    /// Categories every event of this variant belongs to.
    const CATEGORIES: EventCategory;

    /// Narrows to this payload if `kind` holds this variant.
    fn narrow(kind: &EventKind) -> Option<&Self>;

    /// Mutable form of [`EventVariant::narrow`].
    fn narrow_mut(kind: &mut EventKind) -> Option<&mut Self>;
}

//=== Variant Table =======================================================
//
// One line per variant keeps EventType, EventKind, the EventVariant impls
// and the From conversions in lockstep.
//
macro_rules! event_variants {
    ($( $variant:ident => $categories:expr ),* $(,)?) => {
        /// Stable type identity of an event variant.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EventType {
            $( $variant, )*
        }

        impl EventType {
            /// Variant name, e.g. `"WindowResize"`.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                }
            }
        }

        /// The closed set of events, one payload per variant.
        #[derive(Debug, Clone, PartialEq)]
        pub enum EventKind {
            $( $variant($variant), )*
        }

        impl EventKind {
            /// Runtime type identity of the held variant.
            pub fn event_type(&self) -> EventType {
                match self {
                    $( Self::$variant(_) => EventType::$variant, )*
                }
            }

            /// Category mask of the held variant.
            pub fn categories(&self) -> EventCategory {
                match self {
                    $( Self::$variant(_) => <$variant as EventVariant>::CATEGORIES, )*
                }
            }
        }

        impl fmt::Display for EventKind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Self::$variant(inner) => fmt::Display::fmt(inner, f), )*
                }
            }
        }

        $(
            impl EventVariant for $variant {
                const TYPE: EventType = EventType::$variant;
                const CATEGORIES: EventCategory = $categories;

                fn narrow(kind: &EventKind) -> Option<&Self> {
                    match kind {
                        EventKind::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn narrow_mut(kind: &mut EventKind) -> Option<&mut Self> {
                    match kind {
                        EventKind::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for EventKind {
                fn from(payload: $variant) -> Self {
                    Self::$variant(payload)
                }
            }

            impl From<$variant> for Event {
                fn from(payload: $variant) -> Self {
                    Event::new(payload)
                }
            }
        )*
    };
}

const KEY_CATEGORIES: EventCategory = EventCategory::KEYBOARD.union(EventCategory::INPUT);
const MOUSE_CATEGORIES: EventCategory = EventCategory::MOUSE.union(EventCategory::INPUT);
const MOUSE_BUTTON_CATEGORIES: EventCategory =
    EventCategory::MOUSE_BUTTON.union(MOUSE_CATEGORIES);

event_variants! {
    WindowClose => EventCategory::APPLICATION,
    WindowResize => EventCategory::APPLICATION,
    KeyPressed => KEY_CATEGORIES,
    KeyReleased => KEY_CATEGORIES,
    KeyTyped => KEY_CATEGORIES,
    MouseButtonPressed => MOUSE_BUTTON_CATEGORIES,
    MouseButtonReleased => MOUSE_BUTTON_CATEGORIES,
    MouseMoved => MOUSE_CATEGORIES,
    MouseScrolled => MOUSE_CATEGORIES,
}

//=== Payloads ============================================================

/// The user or OS asked the window to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowClose;

/// The window's framebuffer changed size (physical pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowResize {
    pub width: u32,
    pub height: u32,
}

/// A key went down. `repeat_count` is 0 for the initial press and counts
/// up while the OS auto-repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPressed {
    pub key: KeyCode,
    pub repeat_count: u32,
}

impl KeyPressed {
    pub fn is_repeat(&self) -> bool {
        self.repeat_count > 0
    }
}

/// A key was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyReleased {
    pub key: KeyCode,
}

/// Text input: one produced character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTyped {
    pub character: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonPressed {
    pub button: MouseButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonReleased {
    pub button: MouseButton,
}

/// Cursor position in window space (pixels, top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoved {
    pub x: f32,
    pub y: f32,
}

/// Wheel movement. Positive `y_offset` scrolls away from the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseScrolled {
    pub x_offset: f32,
    pub y_offset: f32,
}

//--- Display -------------------------------------------------------------

impl fmt::Display for WindowClose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WindowClose")
    }
}

impl fmt::Display for WindowResize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowResize: {}, {}", self.width, self.height)
    }
}

impl fmt::Display for KeyPressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPressed: {:?} ({} repeats)", self.key, self.repeat_count)
    }
}

impl fmt::Display for KeyReleased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyReleased: {:?}", self.key)
    }
}

impl fmt::Display for KeyTyped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyTyped: {}", self.character)
    }
}

impl fmt::Display for MouseButtonPressed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseButtonPressed: {:?}", self.button)
    }
}

impl fmt::Display for MouseButtonReleased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseButtonReleased: {:?}", self.button)
    }
}

impl fmt::Display for MouseMoved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseMoved: {}, {}", self.x, self.y)
    }
}

impl fmt::Display for MouseScrolled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MouseScrolled: {}, {}", self.x_offset, self.y_offset)
    }
}

//=== Event ===============================================================

/// One engine event travelling through a dispatch chain.
///
/// `handled` starts `false`. Setting it does not stop anything by itself:
/// each stage of the chain checks the flag before forwarding further.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: EventKind,

    /// Set by the handler that claimed this event.
    pub handled: bool,
}

impl Event {
    /// Wraps a payload into an unhandled event.
    pub fn new(payload: impl Into<EventKind>) -> Self {
        Self {
            kind: payload.into(),
            handled: false,
        }
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut EventKind {
        &mut self.kind
    }

    /// Runtime type identity, comparable against [`EventVariant::TYPE`].
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn name(&self) -> &'static str {
        self.event_type().name()
    }

    pub fn category_flags(&self) -> EventCategory {
        self.kind.categories()
    }

    pub fn is_in_category(&self, category: EventCategory) -> bool {
        self.category_flags().intersects(category)
    }

    /// Returns `true` if this event holds variant `E`.
    pub fn is<E: EventVariant>(&self) -> bool {
        self.event_type() == E::TYPE
    }

    /// Read-only access to the payload if this event holds variant `E`.
    pub fn payload<E: EventVariant>(&self) -> Option<&E> {
        E::narrow(&self.kind)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
