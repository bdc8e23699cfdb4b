//! Paints the results panel from the last settled lookup.

use dictionary::{Word, WordMeaning};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::audio::PlaybackState;
use crate::header::{Document, Font, Theme};
use crate::lookup::Shown;

pub const FETCH_FAILED_MESSAGE: &str = "Unable to fetch word data. Please try again.";
pub const NO_SYNONYMS: &str = "No Synonyms Available";

/// Colors derived from the document's theme marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub slider: Color,
    pub font: Modifier,
}

impl Palette {
    pub fn for_document(document: &Document) -> Self {
        let mut palette = match document.theme() {
            Theme::Light => Palette {
                background: Color::Rgb(255, 255, 255),
                text: Color::Rgb(45, 45, 45),
                muted: Color::Rgb(117, 117, 117),
                accent: Color::Rgb(164, 69, 237),
                error: Color::Rgb(255, 82, 82),
                slider: Color::Rgb(61, 61, 61),
                font: Modifier::empty(),
            },
            Theme::Dark => Palette {
                background: Color::Rgb(5, 5, 5),
                text: Color::Rgb(255, 255, 255),
                muted: Color::Rgb(117, 117, 117),
                accent: Color::Rgb(164, 69, 237),
                error: Color::Rgb(255, 82, 82),
                // hsl(288, 100%, 36%)
                slider: Color::Rgb(153, 0, 184),
                font: Modifier::empty(),
            },
        };
        palette.font = match document.font() {
            Font::Serif => Modifier::empty(),
            Font::TrebuchetMs => Modifier::ITALIC,
            Font::SansSerif => Modifier::BOLD,
        };
        palette
    }

    pub fn base(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background)
            .add_modifier(self.font)
    }

    fn fg(&self, color: Color) -> Style {
        self.base().fg(color)
    }
}

/// Playback control as shown next to the headword.
pub fn playback_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Playing => "⏸ Pause",
        PlaybackState::Paused => "▶ Play",
    }
}

pub fn render(shown: &Shown, playback: PlaybackState, palette: &Palette) -> Text<'static> {
    match shown {
        Shown::Nothing => Text::default(),
        Shown::Failed => Text::from(Line::styled(
            FETCH_FAILED_MESSAGE,
            palette.fg(palette.error),
        )),
        Shown::Entry(word) => render_entry(word, playback, palette),
    }
}

fn render_entry(word: &Word, playback: PlaybackState, palette: &Palette) -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::styled(
        word.word.clone(),
        palette.base().add_modifier(Modifier::BOLD),
    ));
    if let Some(phonetic) = &word.phonetic {
        lines.push(Line::styled(phonetic.clone(), palette.fg(palette.accent)));
    }
    if let Some(audio) = word.pronunciation_audio() {
        lines.push(Line::from(vec![
            Span::styled(format!("♪ {audio}  "), palette.fg(palette.muted)),
            Span::styled(
                format!("[^P] {}", playback_label(playback)),
                palette.fg(palette.accent),
            ),
        ]));
    }

    for meaning in &word.meanings {
        lines.push(Line::default());
        render_meaning(meaning, palette, &mut lines);
    }

    if let Some(source) = word.source_url() {
        lines.push(Line::default());
        lines.push(Line::styled("Source", palette.fg(palette.muted)));
        lines.push(Line::styled(
            source.to_owned(),
            palette
                .fg(palette.text)
                .add_modifier(Modifier::UNDERLINED),
        ));
    }

    Text::from(lines)
}

fn render_meaning(meaning: &WordMeaning, palette: &Palette, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::styled(
        format!("── {} ──", meaning.part_of_speech),
        palette.base().add_modifier(Modifier::BOLD),
    ));
    lines.push(Line::styled("Meaning", palette.fg(palette.muted)));
    for definition in &meaning.definitions {
        lines.push(Line::from(vec![
            Span::styled("  • ", palette.fg(palette.accent)),
            Span::styled(definition.definition.clone(), palette.base()),
        ]));
    }
    for example in meaning.definitions.iter().filter_map(|d| d.example.as_ref()) {
        lines.push(Line::styled(
            format!("  \"{example}\""),
            palette.fg(palette.muted),
        ));
    }
    lines.push(Line::styled("Synonyms", palette.fg(palette.muted)));
    let synonym = meaning
        .synonyms
        .first()
        .cloned()
        .unwrap_or_else(|| NO_SYNONYMS.to_owned());
    lines.push(Line::styled(
        format!("  {synonym}"),
        palette.fg(palette.accent).add_modifier(Modifier::BOLD),
    ));
}

/// Plain text of rendered output, one entry per line.
pub fn plain_lines(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect()
}
