use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::typing::{Outcome, TypingPhase, TypingSession};
use crate::ui::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};

impl Widget for &TypingSession {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let magenta_bold_style = Style::default().patch(bold_style).fg(Color::Magenta);

        match &self.phase {
            TypingPhase::NotStarted => {
                let banner = Paragraph::new(vec![
                    Line::from(Span::styled(
                        "LETTER LEAP",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Type each word before the clock runs out.",
                        italic_style,
                    )),
                    Line::from(Span::styled("Press Enter to start!", bold_style)),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });

                banner.render(area, buf);
            }
            TypingPhase::AwaitingInput { word } => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(area.height.saturating_sub(4) / 2),
                            Constraint::Length(2),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Min(0),
                        ]
                        .as_ref(),
                    )
                    .split(area);

                let header = Paragraph::new(Span::styled(
                    format!(
                        "Level {}   Words {}   Streak {}   {:.0}s left",
                        self.level,
                        self.words_completed,
                        self.current_streak,
                        self.clock.seconds_remaining().ceil(),
                    ),
                    dim_bold_style,
                ))
                .alignment(Alignment::Center);

                header.render(chunks[1], buf);

                let mut spans = word
                    .text
                    .chars()
                    .take(word.matched)
                    .map(|c| Span::styled(c.to_string(), green_bold_style))
                    .collect::<Vec<Span>>();

                if let Some(expected) = word.expected_char() {
                    let cursor_style = match self.last_feedback {
                        Some(feedback) if feedback.outcome == Outcome::Incorrect => red_bold_style,
                        _ => underlined_dim_bold_style,
                    };
                    spans.push(Span::styled(expected.to_string(), cursor_style));

                    let rest = word.text.chars().skip(word.matched + 1).collect::<String>();
                    spans.push(Span::styled(rest, dim_bold_style));
                }

                let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
                let word_widget = Paragraph::new(Line::from(spans))
                    .alignment(if word.text.width() <= max_chars_per_line as usize {
                        Alignment::Center
                    } else {
                        Alignment::Left
                    })
                    .wrap(Wrap { trim: true });

                word_widget.render(chunks[2], buf);

                if let Some(praise) = self.praise {
                    let praise_widget = Paragraph::new(Span::styled(praise, magenta_bold_style))
                        .alignment(Alignment::Center);

                    praise_widget.render(chunks[3], buf);
                }
            }
            TypingPhase::RoundOver => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Min(0),
                            Constraint::Length(1),
                        ]
                        .as_ref(),
                    )
                    .split(area);

                let toast = Paragraph::new(Span::styled(
                    format!("Great Job! You typed {} words!", self.words_completed),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center);

                toast.render(chunks[0], buf);

                let stats = Paragraph::new(Span::styled(
                    format!(
                        "{} wpm   {:.0}% acc   {} best streak   {} score",
                        self.wpm,
                        self.accuracy * 100.0,
                        self.longest_streak,
                        self.correct_presses,
                    ),
                    bold_style,
                ))
                .alignment(Alignment::Center);

                stats.render(chunks[2], buf);

                let legend = Paragraph::new(Span::styled(
                    "(enter) play again / (h)istory / (esc)ape",
                    italic_style,
                ));

                legend.render(chunks[4], buf);
            }
        }
    }
}
