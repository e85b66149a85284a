use iced::widget::{button, column, row, text, Container};
use iced::{Color, Element, Length, Size, Theme};
use iced_ruler::{MarkAlignment, Ruler, RulerConfig, RulerRange, ScaleDefinition};

pub fn main() {
    iced::application(RulerExample::default, RulerExample::update, RulerExample::view)
        .theme(Theme::GruvboxDark)
        .run()
        .unwrap()
}

#[derive(Debug, Clone)]
enum Message {
    ValueChanged(f32),
    Jump(f32),
    ToggleRange,
}

struct RulerExample {
    value: f32,
    wide: bool,
}

impl RulerExample {
    pub fn default() -> Self {
        Self {
            value: 3.0,
            wide: false,
        }
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::ValueChanged(value) | Message::Jump(value) => self.value = value,
            Message::ToggleRange => {
                self.wide = !self.wide;
                self.value = if self.wide { 50.0 } else { 3.0 };
            }
        }
    }

    fn config(&self) -> RulerConfig {
        if !self.wide {
            return RulerConfig::default();
        }
        RulerConfig::builder()
            .range(RulerRange::new(0.0, 100.0))
            .scale_definitions(vec![
                ScaleDefinition::builder()
                    .scale(1.0)
                    .color(Color::from_rgba(1.0, 1.0, 1.0, 0.5))
                    .build(),
                ScaleDefinition::builder()
                    .scale(5.0)
                    .mark_size(Size::new(1.0, 16.0))
                    .build(),
                ScaleDefinition::builder()
                    .scale(10.0)
                    .mark_size(Size::new(2.0, 22.0))
                    .color(Color::from_rgb(0.98, 0.74, 0.18))
                    .alignment(MarkAlignment::Bottom)
                    .build(),
            ])
            .build()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let ruler = Ruler::new(self.config(), self.value)
            .on_change(Message::ValueChanged)
            .height(60.0)
            .view();

        let controls = row![
            button("Jump to 7").on_press(Message::Jump(7.0)),
            button("Jump to 4.4").on_press(Message::Jump(4.4)),
            button("Toggle range").on_press(Message::ToggleRange),
        ]
        .spacing(10);

        let info = column![
            text("Ruler"),
            text(format!("Value: {:.1}", self.value)),
            controls,
        ]
        .spacing(10);

        column![
            Container::new(ruler).width(Length::Fill),
            Container::new(info).padding(20),
        ]
        .spacing(20)
        .padding(20)
        .into()
    }
}
