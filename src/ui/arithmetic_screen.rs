use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::arithmetic::{ArithmeticPhase, ArithmeticSession};
use crate::problems::AdditionProblem;
use crate::ui::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};

fn header_line(session: &ArithmeticSession) -> Paragraph<'static> {
    let dim_bold_style = Style::default().add_modifier(Modifier::BOLD | Modifier::DIM);
    Paragraph::new(Span::styled(
        format!(
            "Score {}   Streak {}   {:.0}s left",
            session.score,
            session.current_streak,
            session.clock.seconds_remaining().ceil(),
        ),
        dim_bold_style,
    ))
    .alignment(Alignment::Center)
}

/// Praise when a sum just landed, the stop cue when a unit was rejected.
fn cue_line(session: &ArithmeticSession) -> Option<Paragraph<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    if session.stop_cue {
        Some(
            Paragraph::new(Span::styled(
                "STOP! The sum is already full.",
                Style::default().patch(bold_style).fg(Color::Red),
            ))
            .alignment(Alignment::Center),
        )
    } else {
        session.praise.map(|praise| {
            Paragraph::new(Span::styled(
                praise,
                Style::default().patch(bold_style).fg(Color::Magenta),
            ))
            .alignment(Alignment::Center)
        })
    }
}

fn solved_equation(problem: &AdditionProblem) -> Paragraph<'static> {
    let green_bold_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .fg(Color::Green);
    Paragraph::new(Span::styled(
        format!(
            "{} + {} = {}",
            problem.operand_a,
            problem.operand_b,
            problem.target(),
        ),
        green_bold_style,
    ))
    .alignment(Alignment::Center)
}

impl Widget for &ArithmeticSession {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let yellow_bold_style = Style::default().patch(bold_style).fg(Color::Yellow);

        match &self.phase {
            ArithmeticPhase::NotStarted => {
                let banner = Paragraph::new(vec![
                    Line::from(Span::styled("ADDITION ADVENTURE", yellow_bold_style)),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Count units into the sum until it matches the target.",
                        italic_style,
                    )),
                    Line::from(Span::styled("Press Enter to start!", bold_style)),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });

                banner.render(area, buf);
            }
            ArithmeticPhase::BuildingSum {
                problem,
                taken_a,
                taken_b,
                sum,
            } => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Min(0),
                            Constraint::Length(1),
                        ]
                        .as_ref(),
                    )
                    .split(area);

                header_line(self).render(chunks[0], buf);

                let equation = Paragraph::new(Line::from(vec![
                    Span::styled(
                        format!("{} + {} = ", problem.operand_a, problem.operand_b),
                        bold_style,
                    ),
                    Span::styled(sum.to_string(), yellow_bold_style),
                ]))
                .alignment(Alignment::Center);

                equation.render(chunks[2], buf);

                let emoji = problem.theme.emoji();
                let remaining_a = problem.operand_a - taken_a;
                let remaining_b = problem.operand_b - taken_b;

                let pile_a = Paragraph::new(Line::from(vec![
                    Span::styled("(a)  ", italic_style),
                    Span::raw(emoji.repeat(remaining_a as usize)),
                    Span::styled(format!("  {remaining_a} left"), dim_style),
                ]))
                .alignment(Alignment::Center);
                pile_a.render(chunks[4], buf);

                let pile_b = Paragraph::new(Line::from(vec![
                    Span::styled("(b)  ", italic_style),
                    Span::raw(emoji.repeat(remaining_b as usize)),
                    Span::styled(format!("  {remaining_b} left"), dim_style),
                ]))
                .alignment(Alignment::Center);
                pile_b.render(chunks[5], buf);

                let sum_row = Paragraph::new(Line::from(vec![
                    Span::raw(emoji.repeat(*sum as usize)),
                    Span::styled(format!("  sum so far: {sum}"), bold_style),
                ]))
                .alignment(Alignment::Center);
                sum_row.render(chunks[6], buf);

                if let Some(cue) = cue_line(self) {
                    cue.render(chunks[7], buf);
                }

                let legend = Paragraph::new(Span::styled(
                    "(a) (b) take from a pile / (space) tap one in / (esc) stop",
                    italic_style,
                ));
                legend.render(chunks[9], buf);
            }
            ArithmeticPhase::Feedback { problem, correct } => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Min(0),
                        ]
                        .as_ref(),
                    )
                    .split(area);

                header_line(self).render(chunks[0], buf);
                solved_equation(problem).render(chunks[2], buf);

                if *correct {
                    let units = Paragraph::new(Span::raw(
                        problem.theme.emoji().repeat(problem.target() as usize),
                    ))
                    .alignment(Alignment::Center);
                    units.render(chunks[3], buf);
                }

                if let Some(cue) = cue_line(self) {
                    cue.render(chunks[4], buf);
                }
            }
            ArithmeticPhase::AwaitingConfirmation { problem } => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints(
                        [
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Length(1),
                            Constraint::Min(0),
                        ]
                        .as_ref(),
                    )
                    .split(area);

                header_line(self).render(chunks[0], buf);
                solved_equation(problem).render(chunks[2], buf);

                let prompt = Paragraph::new(Span::styled(
                    "Press Enter for the next one!",
                    italic_style,
                ))
                .alignment(Alignment::Center);
                prompt.render(chunks[3], buf);

                if let Some(cue) = cue_line(self) {
                    cue.render(chunks[4], buf);
                }
            }
            ArithmeticPhase::RoundOver => {
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
                    format!("Great Job! You solved {} problems!", self.correct_attempts),
                    yellow_bold_style,
                ))
                .alignment(Alignment::Center);
                toast.render(chunks[0], buf);

                let stats = Paragraph::new(Span::styled(
                    format!(
                        "{} score   {:.0}% acc   {} best streak",
                        self.score,
                        self.accuracy * 100.0,
                        self.longest_streak,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::UnitSource;
    use crate::problems::Theme;
    use crate::recorder::MemoryRecorder;

    fn test_session() -> ArithmeticSession {
        let mut session = ArithmeticSession::new(60, Box::new(MemoryRecorder::new()));
        session.start();
        session.phase = ArithmeticPhase::BuildingSum {
            problem: AdditionProblem::new(2, 3, Theme::Ducks),
            taken_a: 0,
            taken_b: 0,
            sum: 0,
        };
        session
    }

    fn rendered_text(session: &ArithmeticSession, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        session.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn not_started_shows_the_start_prompt() {
        let session = ArithmeticSession::new(60, Box::new(MemoryRecorder::new()));
        let rendered = rendered_text(&session, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("ADDITION ADVENTURE"));
        assert!(rendered.contains("Press Enter to start!"));
    }

    #[test]
    fn building_sum_shows_equation_and_piles() {
        let session = test_session();
        let rendered = rendered_text(&session, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("2 + 3 ="));
        assert!(rendered.contains("2 left"));
        assert!(rendered.contains("3 left"));
        assert!(rendered.contains("sum so far: 0"));
        assert!(rendered.contains("(space) tap one in"));
    }

    #[test]
    fn solved_problem_shows_the_full_equation() {
        let mut session = test_session();
        for _ in 0..5 {
            session.add_unit(UnitSource::Tap);
        }
        let rendered = rendered_text(&session, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("2 + 3 = 5"));
        let praise = session.praise.unwrap();
        assert!(rendered.contains(praise));
    }

    #[test]
    fn rejected_unit_shows_the_stop_cue() {
        let mut session = test_session();
        for _ in 0..6 {
            session.add_unit(UnitSource::Tap);
        }
        assert!(session.stop_cue);
        let rendered = rendered_text(&session, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("STOP!"));
    }

    #[test]
    fn awaiting_confirmation_prompts_for_enter() {
        let mut session = test_session();
        session.phase = ArithmeticPhase::AwaitingConfirmation {
            problem: AdditionProblem::new(2, 3, Theme::Ducks),
        };
        let rendered = rendered_text(&session, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("Press Enter for the next one!"));
    }

    #[test]
    fn round_over_shows_summary_and_legend() {
        let mut session = test_session();
        session.stop();
        let rendered = rendered_text(&session, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("Great Job!"));
        assert!(rendered.contains("best streak"));
        assert!(rendered.contains("(enter) play again"));
    }

    #[test]
    fn renders_in_extreme_areas_without_panic() {
        let session = test_session();
        for area in [
            Rect::new(0, 0, 10, 3),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 20, 50),
        ] {
            let mut buffer = Buffer::empty(area);
            (&session).render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }
}
