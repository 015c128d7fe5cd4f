// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! Three layers are stacked: the media surface showing the latest decoded
//! frame, the controls overlay along the bottom edge, and the toast notices.

use super::Message;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, sizing, spacing, typography};
use crate::ui::notifications::{self, Toast};
use crate::ui::shortcuts::Action;
use crate::ui::state::ControlsVisibility;
use crate::ui::styles;
use crate::ui::video_controls::{self, ControlsState};
use crate::video_player::{FfmpegEngine, PlayState, PlaybackSession};
use iced::widget::{button, image, mouse_area, Column, Container, Image, Space, Stack, Text};
use iced::{alignment, ContentFit, Element, Length};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub session: &'a PlaybackSession<FfmpegEngine>,
    pub frame: Option<&'a image::Handle>,
    pub visibility: &'a ControlsVisibility,
    pub fullscreen: bool,
    pub notifications: &'a notifications::Manager,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let surface = mouse_area(
        Container::new(media_surface(&ctx))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(styles::overlay::media_surface),
    )
    .on_move(|_| Message::PointerMoved);

    let mut stack = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(surface);

    if ctx.visibility.is_visible() {
        stack = stack.push(controls_overlay(&ctx));
    }

    stack
        .push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification))
        .into()
}

fn media_surface<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let Some(source) = ctx.session.source() else {
        return empty_state(ctx.i18n);
    };

    if let Some(frame) = ctx.frame {
        return Image::new(frame.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
    }

    // No picture yet: the decoder is still opening the source.

    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let glyph = match ctx.session.play_state() {
        PlayState::Playing => "▶",
        PlayState::Paused => "⏸",
        PlayState::Idle | PlayState::Stopped | PlayState::Ended => "⏹",
    };

    let content = Column::new()
        .spacing(spacing::MD)
        .align_x(alignment::Horizontal::Center)
        .push(Text::new(glyph).size(sizing::ICON_XL).color(palette::GRAY_200))
        .push(Text::new(name).size(typography::TITLE_MD).color(palette::GRAY_200));

    centered(content)
}

fn empty_state(i18n: &I18n) -> Element<'_, Message> {
    let message = Text::new(i18n.tr("empty-state-message"))
        .size(typography::TITLE_MD)
        .color(palette::GRAY_400);

    let open_button = button(Text::new(i18n.tr("empty-state-open-button")))
        .padding([spacing::SM, spacing::LG])
        .style(styles::button::primary)
        .on_press(Message::Action(Action::Open));

    let content = Column::new()
        .spacing(spacing::LG)
        .align_x(alignment::Horizontal::Center)
        .push(message)
        .push(open_button);

    centered(content)
}

fn centered<'a>(content: Column<'a, Message>) -> Element<'a, Message> {
    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
}

fn controls_overlay<'a>(ctx: &ViewContext<'a>) -> Element<'a, Message> {
    let session = ctx.session;
    let labels = session.labels();
    let slider = session.slider();

    let state = ControlsState {
        play_state: session.play_state(),
        has_source: session.has_source(),
        duration_known: session.media().natural_duration.is_some(),
        slider_value: slider.value(),
        slider_max: slider.maximum(),
        elapsed: &labels.elapsed,
        remaining: &labels.remaining,
        volume: session.volume(),
        fullscreen: ctx.fullscreen,
    };

    let bar = mouse_area(video_controls::view(ctx.i18n, &state).map(Message::Controls))
        .on_enter(Message::OverlayEntered)
        .on_exit(Message::OverlayExited);

    Column::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(Space::new().width(Length::Fill).height(Length::Fill))
        .push(bar)
        .into()
}
