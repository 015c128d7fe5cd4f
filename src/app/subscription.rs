// SPDX-License-Identifier: MPL-2.0
//! Event and timer subscriptions for the application.
//!
//! One periodic source per update category: the position sync tick, and the
//! overlay/toast check tick. Decoder output arrives through the playback
//! subscription.

use super::Message;
use crate::config::OVERLAY_CHECK_INTERVAL_MS;
use crate::ui::shortcuts;
use crate::video_player::{EventFeed, SyncInterval};
use iced::futures::SinkExt;
use iced::{event, mouse, stream, time, window, Subscription};
use std::time::Duration;

/// Subscription identity of one source's decoder output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PlaybackId(u64);

/// Routes native window, pointer button and keyboard events.
///
/// Keyboard events already captured by a widget are not treated as shortcuts.
/// Primary button events are forwarded whether or not a widget captured them,
/// since the seek slider captures the press that starts a drag. Losing focus
/// counts as a release.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, window_id| match event {
        event::Event::Window(window::Event::CloseRequested) => {
            Some(Message::WindowCloseRequested(window_id))
        }
        event::Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        event::Event::Window(window::Event::Opened { size, .. })
        | event::Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            id: window_id,
            size,
        }),
        event::Event::Window(window::Event::Unfocused) => {
            Some(Message::PrimaryButton { pressed: false })
        }
        event::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            Some(Message::PrimaryButton { pressed: true })
        }
        event::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::PrimaryButton { pressed: false })
        }
        event::Event::Keyboard(keyboard_event) => match status {
            event::Status::Ignored => {
                shortcuts::action_for_event(&keyboard_event).map(Message::Action)
            }
            event::Status::Captured => None,
        },
        _ => None,
    })
}

/// Position sync loop timer.
///
/// The generation is part of the subscription identity, so opening a new
/// source replaces the timer instead of reusing the previous one.
pub fn create_sync_subscription(
    active: bool,
    generation: u64,
    interval: SyncInterval,
) -> Subscription<Message> {
    if active {
        time::every(interval.as_duration())
            .with(generation)
            .map(|(generation, _)| Message::SyncTick(generation))
    } else {
        Subscription::none()
    }
}

/// Overlay countdown and toast expiry check.
///
/// Only runs while something can actually expire.
pub fn create_tick_subscription(counting_down: bool, has_notifications: bool) -> Subscription<Message> {
    if counting_down || has_notifications {
        time::every(Duration::from_millis(OVERLAY_CHECK_INTERVAL_MS)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

/// Forwards decoder output of the source opened as `generation`.
///
/// The generation is the subscription identity, so a new source tears down
/// the previous forwarder and its receiver.
pub fn create_playback_subscription(
    active: bool,
    generation: u64,
    feed: EventFeed,
) -> Subscription<Message> {
    if !active {
        return Subscription::none();
    }

    Subscription::run_with_id(
        PlaybackId(generation),
        stream::channel(16, move |mut output| async move {
            if let Some(mut events) = feed.take() {
                while let Some(event) = events.recv().await {
                    if output
                        .send(Message::Engine { generation, event })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }
            tracing::debug!(generation, "decoder output closed");
            std::future::pending::<()>().await;
        }),
    )
}
