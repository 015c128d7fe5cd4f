// SPDX-License-Identifier: MPL-2.0
//! Transport controls overlay.
//!
//! Provides the bar with open/rewind/play-pause/stop/fast-forward buttons, the
//! seek slider with elapsed and remaining labels, the volume slider and the
//! fullscreen toggle.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::shortcuts::Action;
use crate::ui::styles;
use crate::video_player::{PlayState, Volume};
use iced::widget::{button, container, row, slider, text, tooltip, Text};
use iced::{Alignment, Element, Length};

/// Slider step in seconds (1ms precision).
const SLIDER_STEP_SECS: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Action(Action),
    /// Slider moved by the user, in seconds.
    SeekChanged(f64),
    SeekReleased,
    VolumeChanged(f32),
}

/// Everything the controls need to draw themselves.
#[derive(Debug, Clone)]
pub struct ControlsState<'a> {
    pub play_state: PlayState,
    pub has_source: bool,
    pub duration_known: bool,
    pub slider_value: f64,
    pub slider_max: f64,
    pub elapsed: &'a str,
    pub remaining: &'a str,
    pub volume: Volume,
    pub fullscreen: bool,
}

pub fn view<'a>(i18n: &'a I18n, state: &ControlsState<'a>) -> Element<'a, Message> {
    let is_playing = state.play_state == PlayState::Playing;

    let (play_glyph, play_tip) = if is_playing {
        ("⏸", "video-pause-tooltip")
    } else {
        ("▶", "video-play-tooltip")
    };

    let open = transport_button("⏏", i18n.tr("video-open-tooltip"), Some(Action::Open));
    let rewind = transport_button(
        "⏪",
        i18n.tr("video-rewind-tooltip"),
        state.duration_known.then_some(Action::Rewind),
    );
    let play_pause = transport_button(
        play_glyph,
        i18n.tr(play_tip),
        state.has_source.then_some(Action::TogglePlayPause),
    );
    let stop = transport_button(
        "⏹",
        i18n.tr("video-stop-tooltip"),
        state.has_source.then_some(Action::Stop),
    );
    let forward = transport_button(
        "⏩",
        i18n.tr("video-forward-tooltip"),
        state.duration_known.then_some(Action::FastForward),
    );

    let remaining_label = if state.duration_known {
        state.remaining.to_string()
    } else {
        i18n.tr("video-duration-unknown")
    };

    let timeline = slider(
        0.0..=state.slider_max,
        state.slider_value,
        Message::SeekChanged,
    )
    .on_release(Message::SeekReleased)
    .step(SLIDER_STEP_SECS)
    .width(Length::Fill);

    let volume = tooltip(
        slider(0.0..=1.0, state.volume.value(), Message::VolumeChanged)
            .step(0.01)
            .width(Length::Fixed(sizing::VOLUME_SLIDER_WIDTH)),
        Text::new(i18n.tr("video-volume-tooltip")),
        tooltip::Position::Top,
    )
    .gap(4);

    let fullscreen_tip = if state.fullscreen {
        i18n.tr("video-exit-fullscreen-tooltip")
    } else {
        i18n.tr("video-fullscreen-tooltip")
    };
    let fullscreen = tooltip(
        button(text("⛶").size(sizing::ICON_SM))
            .on_press(Message::Action(Action::ToggleFullscreen))
            .padding(spacing::XS)
            .height(Length::Fixed(sizing::BUTTON_HEIGHT))
            .style(if state.fullscreen {
                styles::button::selected
            } else {
                styles::button::overlay
            }),
        Text::new(fullscreen_tip),
        tooltip::Position::Top,
    )
    .gap(4);

    let controls = row![
        open,
        rewind,
        play_pause,
        stop,
        forward,
        time_label(state.elapsed.to_string()),
        timeline,
        time_label(remaining_label),
        volume,
        fullscreen,
    ]
    .spacing(spacing::XS)
    .padding(spacing::XS)
    .align_y(Alignment::Center);

    container(controls)
        .width(Length::Fill)
        .padding(spacing::XXS)
        .style(styles::overlay::controls_container)
        .into()
}

fn transport_button<'a>(
    glyph: &'a str,
    tip: String,
    action: Option<Action>,
) -> Element<'a, Message> {
    let base = button(text(glyph).size(sizing::ICON_SM))
        .on_press_maybe(action.map(Message::Action))
        .padding(spacing::XS)
        .width(Length::Shrink)
        .height(Length::Fixed(sizing::BUTTON_HEIGHT))
        .style(styles::button::overlay);

    tooltip(base, Text::new(tip), tooltip::Position::Top)
        .gap(4)
        .into()
}

fn time_label<'a>(label: String) -> Element<'a, Message> {
    container(text(label).size(typography::CAPTION))
        .width(Length::Fixed(sizing::TIME_LABEL_WIDTH))
        .align_x(Alignment::Center)
        .into()
}
