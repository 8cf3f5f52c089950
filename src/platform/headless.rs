//=========================================================================
// Headless Window
//=========================================================================
//
// Display-less window for tests, CI and simulation-only runs.
//
// Events are scripted per frame: each `poll_events` call delivers the next
// queued batch. An optional frame budget closes the window after that many
// presented frames.
//
//=========================================================================

use std::collections::VecDeque;

use log::debug;

use super::NativeWindow;
use crate::core::event::{Event, WindowClose, WindowResize};

#[derive(Debug)]
pub struct HeadlessWindow {
    size: (u32, u32),
    frame_budget: Option<u64>,
    frames_presented: u64,
    scripted: VecDeque<Vec<Event>>,
    close_requested: bool,
    vsync: bool,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            frame_budget: None,
            frames_presented: 0,
            scripted: VecDeque::new(),
            close_requested: false,
            vsync: false,
        }
    }

    /// Closes the window after `frames` presented frames.
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    /// Queues the events delivered by one future `poll_events` call.
    pub fn push_frame_events(&mut self, events: impl IntoIterator<Item = Event>) {
        self.scripted.push_back(events.into_iter().collect());
    }

    /// Builder form of [`push_frame_events`](Self::push_frame_events).
    pub fn with_frame_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.push_frame_events(events);
        self
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn vsync(&self) -> bool {
        self.vsync
    }
}

impl NativeWindow for HeadlessWindow {
    fn poll_events(&mut self, callback: &mut dyn FnMut(&mut Event)) {
        let Some(batch) = self.scripted.pop_front() else {
            return;
        };

        for mut event in batch {
            if let Some(resize) = event.payload::<WindowResize>() {
                self.size = (resize.width, resize.height);
            }
            if event.is::<WindowClose>() {
                self.close_requested = true;
            }
            callback(&mut event);
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
            || self
                .frame_budget
                .is_some_and(|budget| self.frames_presented >= budget)
    }

    fn swap_buffers(&mut self) {
        self.frames_presented += 1;
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_vsync(&mut self, enabled: bool) {
        debug!(target: "platform", "Headless vsync set to {}", enabled);
        self.vsync = enabled;
    }
}
