use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph},
};

use crate::model::{ColumnView, Model, Status, UiData};

pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const NAVLINE_HEIGHT: usize = 1;
pub const STATUSLINE_HEIGHT: usize = 1;
pub const COLUMN_WIDTH_MARGIN: usize = 2;

// Status messages fade out after this long.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

pub struct CastUI {}

impl CastUI {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        match model.status {
            Status::LOADING => Self::draw_notice(frame, "Fetching people ..."),
            Status::FAILED => Self::draw_failure(frame, model.failure_message()),
            Status::READY | Status::QUITTING => Self::draw_table(frame, model.get_uidata()),
        }
    }

    fn draw_notice(frame: &mut Frame, notice: &str) {
        let block = Block::bordered().title(Line::from(" cast ".bold()).centered());
        let text = Paragraph::new(notice.to_string()).centered().block(block);
        frame.render_widget(text, frame.area());
    }

    fn draw_failure(frame: &mut Frame, detail: Option<&str>) {
        let block = Block::bordered().title(Line::from(" cast ".bold()).centered());
        let mut lines = vec![
            Line::from("Oops! looks like something went wrong!".bold()),
            Line::from(""),
        ];
        if let Some(detail) = detail {
            lines.push(Line::from(detail.to_string().dark_gray()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("Press q to quit".dark_gray()));
        let text = Paragraph::new(Text::from(lines)).centered().block(block);
        frame.render_widget(text, frame.area());
    }

    fn draw_table(frame: &mut Frame, uidata: &UiData) {
        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(NAVLINE_HEIGHT as u16),
            Constraint::Length(STATUSLINE_HEIGHT as u16),
        ])
        .split(frame.area());

        Self::draw_columns(frame, chunks[0], uidata);
        Self::draw_navline(frame, chunks[1], uidata);
        Self::draw_statusline(frame, chunks[2], uidata);

        if uidata.show_popup {
            Self::draw_popup(frame, &uidata.popup_message);
        }
    }

    fn draw_columns(frame: &mut Frame, area: Rect, uidata: &UiData) {
        let constraints: Vec<Constraint> = uidata
            .columns
            .iter()
            .map(|c| Constraint::Length(c.width as u16 + 1))
            .collect();
        let column_areas = Layout::horizontal(constraints).split(area);

        for (column, column_area) in uidata.columns.iter().zip(column_areas.iter()) {
            frame.render_widget(Self::column_paragraph(column), *column_area);
        }

        if uidata.total_filtered == 0 && area.height > TABLE_HEADER_HEIGHT as u16 + 1 {
            let notice_area = Rect {
                y: area.y + TABLE_HEADER_HEIGHT as u16 + 1,
                height: 1,
                ..area
            };
            frame.render_widget(
                Paragraph::new("No People Available.".dark_gray()).centered(),
                notice_area,
            );
        }
    }

    fn column_paragraph(column: &ColumnView) -> Paragraph<'_> {
        let mut lines = vec![Line::from(column.name.clone().bold().underlined())];
        for cell in column.data.iter() {
            lines.push(Line::from(cell.clone()));
        }
        Paragraph::new(Text::from(lines))
    }

    fn nav_span(label: &str, enabled: bool) -> Span<'static> {
        if enabled {
            label.to_string().bold()
        } else {
            label.to_string().dark_gray()
        }
    }

    fn draw_navline(frame: &mut Frame, area: Rect, uidata: &UiData) {
        // The raw page window may run past the filtered set; clamp it here,
        // for display only.
        let showing = if uidata.total_filtered == 0 {
            "0 of 0".to_string()
        } else {
            format!(
                "{}-{} of {}",
                uidata.start_index + 1,
                uidata.end_index.min(uidata.total_filtered),
                uidata.total_filtered
            )
        };
        let counts = if uidata.search_text.is_empty() {
            format!("{} people", uidata.total_people)
        } else {
            format!("{}/{} people", uidata.total_filtered, uidata.total_people)
        };
        let line = Line::from(vec![
            Self::nav_span(" |< First ", uidata.first_enabled),
            Self::nav_span(" < Prev ", uidata.prev_enabled),
            format!(" Page {}/{} ({showing}) ", uidata.current_page, uidata.total_pages).into(),
            Self::nav_span(" Next > ", uidata.next_enabled),
            Self::nav_span(" Last >| ", uidata.last_enabled),
            "   ".into(),
            counts.yellow(),
            format!("  name {}  {}/page ", uidata.sort_indicator, uidata.page_size)
                .dark_gray(),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_statusline(frame: &mut Frame, area: Rect, uidata: &UiData) {
        let line = if uidata.search_active {
            let input = &uidata.search_input;
            let chars: Vec<char> = input.text.chars().collect();
            let before: String = chars[..input.curser_pos.min(chars.len())].iter().collect();
            let after: String = chars[input.curser_pos.min(chars.len())..].iter().collect();
            Line::from(vec![
                "/".yellow().bold(),
                before.into(),
                "▌".yellow(),
                after.into(),
            ])
        } else {
            let faded = uidata
                .last_status_message_update
                .map(|at| at.elapsed() > STATUS_MESSAGE_TTL)
                .unwrap_or(true);
            let message: Span = if faded {
                "? help  q quit".dark_gray()
            } else {
                uidata.status_message.clone().into()
            };
            Line::from(vec![message])
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_popup(frame: &mut Frame, message: &str) {
        let area = Self::popup_area(frame.area(), 60, 80);
        let block = Block::bordered().title(Line::from(" Help ".bold()).centered());
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(message.to_string()).block(block), area);
    }

    fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
        let vertical = Layout::vertical([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
        let horizontal = Layout::horizontal([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
        horizontal[1]
    }
}
