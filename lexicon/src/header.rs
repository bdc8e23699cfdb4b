use std::fmt;
use std::time::Instant;

use clap::ValueEnum;
use serde::Deserialize;

use crate::animation::{self, Element, ElementRef, EventKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn logo(self) -> Icon {
        match self {
            Theme::Light => Icon::DictionaryBlack,
            Theme::Dark => Icon::DictionaryWhite,
        }
    }

    /// The indicator shows the theme a click switches to.
    pub fn indicator(self) -> Icon {
        match self {
            Theme::Light => Icon::DarkMode,
            Theme::Dark => Icon::LightMode,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Font {
    #[default]
    Serif,
    TrebuchetMs,
    SansSerif,
}

impl Font {
    pub const ALL: [Font; 3] = [Font::Serif, Font::TrebuchetMs, Font::SansSerif];

    /// The CSS font family applied to the document root.
    pub fn family(self) -> &'static str {
        match self {
            Font::Serif => "serif",
            Font::TrebuchetMs => "Trebuchet MS",
            Font::SansSerif => "sans-serif",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Font::Serif => "Serif",
            Font::TrebuchetMs => "Trebuchet Ms",
            Font::SansSerif => "Sans-Serif",
        }
    }

    pub fn from_family(family: &str) -> Option<Self> {
        Font::ALL.into_iter().find(|font| font.family() == family)
    }

    pub fn next(self) -> Self {
        match self {
            Font::Serif => Font::TrebuchetMs,
            Font::TrebuchetMs => Font::SansSerif,
            Font::SansSerif => Font::Serif,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    DictionaryBlack,
    DictionaryWhite,
    DarkMode,
    LightMode,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::DictionaryBlack => "▆▆",
            Icon::DictionaryWhite => "▯▯",
            Icon::DarkMode => "☾",
            Icon::LightMode => "☀",
        }
    }
}

/// The page root. Everything rendered reads its theme and font from here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    class: Option<String>,
    font_family: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn set_class(&mut self, class: &str) {
        self.class = Some(class.to_owned());
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = Some(family.to_owned());
    }

    pub fn theme(&self) -> Theme {
        self.class()
            .and_then(Theme::from_marker)
            .unwrap_or_default()
    }

    pub fn font(&self) -> Font {
        self.font_family()
            .and_then(Font::from_family)
            .unwrap_or_default()
    }
}

/// Logo, font selector and theme slider.
pub struct Header {
    theme: Theme,
    font: Font,
    slider: ElementRef,
    slider_button: ElementRef,
}

impl Header {
    pub fn new(theme: Theme, font: Font, document: &mut Document) -> Self {
        let slider = Element::new_ref();
        let slider_button = Element::new_ref();
        animation::set_animation(&slider, &slider_button);
        if theme == Theme::Dark {
            slider_button.borrow_mut().style.transform =
                Some(animation::TranslateX(animation::SLIDE_OFFSET));
        }

        document.set_class(theme.as_str());
        document.set_font_family(font.family());
        Self {
            theme,
            font,
            slider,
            slider_button,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn logo(&self) -> Icon {
        self.theme.logo()
    }

    pub fn theme_indicator(&self) -> Icon {
        self.theme.indicator()
    }

    pub fn slider_button(&self) -> &ElementRef {
        &self.slider_button
    }

    pub fn toggle_theme(&mut self, document: &mut Document) {
        animation::dispatch(&self.slider, EventKind::Click);
        self.theme = self.theme.toggled();
        document.set_class(self.theme.as_str());
        tracing::debug!(theme = %self.theme, "theme changed");
    }

    pub fn select_font(&mut self, font: Font, document: &mut Document) {
        self.font = font;
        document.set_font_family(font.family());
        tracing::debug!(font = font.family(), "font changed");
    }

    pub fn cycle_font(&mut self, document: &mut Document) {
        self.select_font(self.font.next(), document);
    }

    pub fn tick(&self, now: Instant) {
        animation::finish_if_elapsed(&self.slider_button, now);
    }
}
