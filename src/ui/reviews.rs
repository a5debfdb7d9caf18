//! Customer reviews browser: one review card at a time with prev/next
//! navigation and position dots.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::api::reviews::ReviewSummary;
use crate::ui::dialogs::centered_rect;

pub struct ReviewsScreen {
    pub visible: bool,
    summary: Option<ReviewSummary>,
    limit: usize,
    index: usize,
}

impl ReviewsScreen {
    pub fn new(limit: usize) -> Self {
        Self {
            visible: false,
            summary: None,
            limit,
            index: 0,
        }
    }

    pub fn show(&mut self, summary: ReviewSummary) {
        self.summary = Some(summary);
        self.index = 0;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    fn review_count(&self) -> usize {
        self.summary
            .as_ref()
            .map_or(0, |s| s.usable_reviews(self.limit).len())
    }

    pub fn next(&mut self) {
        let count = self.review_count();
        if count > 1 {
            self.index = (self.index + 1) % count;
        }
    }

    pub fn prev(&mut self) {
        let count = self.review_count();
        if count > 1 {
            self.index = (self.index + count - 1) % count;
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }
        let Some(summary) = &self.summary else {
            return;
        };

        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Customer reviews ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Business header
                Constraint::Min(5),    // Review card
                Constraint::Length(1), // Dots
                Constraint::Length(1), // Hints
            ])
            .split(inner);

        self.render_header(frame, chunks[0], summary);

        let reviews = summary.usable_reviews(self.limit);
        if reviews.is_empty() {
            frame.render_widget(
                Paragraph::new("No reviews available right now.")
                    .style(Style::default().fg(Color::Gray))
                    .alignment(Alignment::Center),
                chunks[1],
            );
        } else {
            let review = reviews[self.index.min(reviews.len() - 1)];
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    review.author.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    review.publish_time.clone().unwrap_or_default(),
                    Style::default().fg(Color::DarkGray),
                ),
            ])];
            if let Some(rating) = review.rating {
                let rating = usize::from(rating.min(5));
                lines.push(Line::from(Span::styled(
                    format!("{}{}", "★".repeat(rating), "☆".repeat(5 - rating)),
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(review.text.clone()));

            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(Color::Gray)),
                chunks[1],
            );

            // Position dots
            let dots: Vec<Span> = (0..reviews.len())
                .map(|i| {
                    if i == self.index {
                        Span::styled("● ", Style::default().fg(Color::LightBlue))
                    } else {
                        Span::styled("○ ", Style::default().fg(Color::DarkGray))
                    }
                })
                .collect();
            frame.render_widget(
                Paragraph::new(Line::from(dots)).alignment(Alignment::Center),
                chunks[2],
            );
        }

        let hints = Paragraph::new(Line::from(vec![
            Span::styled("←/→", Style::default().fg(Color::Yellow)),
            Span::styled(" browse  ", Style::default().fg(Color::Gray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" close", Style::default().fg(Color::Gray)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(hints, chunks[3]);
    }

    fn render_header(&self, frame: &mut Frame, area: ratatui::layout::Rect, summary: &ReviewSummary) {
        let mut subtitle = Vec::new();
        if summary.is_fallback {
            subtitle.push(Span::styled(
                "Local client testimonials",
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            if let Some(rating) = summary.rating {
                subtitle.push(Span::styled(
                    format!("{rating:.1} ★"),
                    Style::default().fg(Color::Yellow),
                ));
            }
            if let Some(count) = summary.count {
                subtitle.push(Span::styled(
                    format!("  {count} reviews"),
                    Style::default().fg(Color::Gray),
                ));
            }
            if let Some(url) = &summary.maps_url {
                subtitle.push(Span::styled(
                    format!("  {url}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    summary.name.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(subtitle),
            ]),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps_around() {
        let mut screen = ReviewsScreen::new(12);
        screen.show(ReviewSummary::fallback());
        let count = ReviewSummary::fallback().usable_reviews(12).len();

        screen.prev();
        assert_eq!(screen.index, count - 1);

        screen.next();
        assert_eq!(screen.index, 0);
    }

    #[test]
    fn test_navigation_noop_with_single_review() {
        let mut screen = ReviewsScreen::new(12);
        let mut summary = ReviewSummary::fallback();
        summary.reviews.truncate(1);
        screen.show(summary);

        screen.next();
        assert_eq!(screen.index, 0);
        screen.prev();
        assert_eq!(screen.index, 0);
    }

    #[test]
    fn test_show_resets_index() {
        let mut screen = ReviewsScreen::new(12);
        screen.show(ReviewSummary::fallback());
        screen.next();
        assert_eq!(screen.index, 1);

        screen.show(ReviewSummary::fallback());
        assert_eq!(screen.index, 0);
    }

    #[test]
    fn test_limit_caps_navigation() {
        let mut screen = ReviewsScreen::new(2);
        screen.show(ReviewSummary::fallback());

        screen.next();
        screen.next();
        assert_eq!(screen.index, 0); // wrapped within the 2-review cap
    }
}
