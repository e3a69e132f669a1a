use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::app::{AddField, AddForm, App, Mode};
use crate::model::Status;

pub fn render<S>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_search(frame, app, chunks[0]);

    match app.mode {
        Mode::Help => render_help(frame, chunks[1]),
        Mode::Add => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(7), Constraint::Min(1)])
                .split(chunks[1]);
            if let Some(form) = &app.add_form {
                render_form(frame, form, split[0]);
            }
            render_list(frame, app, split[1]);
        }
        _ => render_list(frame, app, chunks[1]),
    }

    render_hints(frame, chunks[2]);
}

fn render_search<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let style = if app.mode == Mode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(app.filter.search_term.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(" Search "),
    );
    frame.render_widget(search, area);
}

fn render_list<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let checkbox = if row.done { "[x] " } else { "[ ] " };
            let checkbox_style = if row.done {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            let status_style = match row.status {
                Status::Pending => Style::default().fg(Color::Yellow),
                Status::Completed => Style::default().fg(Color::DarkGray),
            };
            let kind = row
                .kind
                .map(|k| format!("  ({k})"))
                .unwrap_or_default();
            let minutes = if row.duration_minutes > 0 {
                format!("  {}m", row.duration_minutes)
            } else {
                String::new()
            };

            let line = Line::from(vec![
                Span::styled(checkbox, checkbox_style),
                Span::styled(row.name.clone(), Style::default().bold()),
                Span::styled(format!("  {}", row.status), status_style),
                Span::raw(kind),
                Span::raw(minutes),
            ]);

            let item = ListItem::new(line);
            if i == app.cursor {
                item.style(Style::default().bg(Color::DarkGray))
            } else {
                item
            }
        })
        .collect();

    let title = format!(" Tasks ({}) ", app.filter.status_filter.as_str());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_form(frame: &mut Frame, form: &AddForm, area: Rect) {
    let field = |label: &str, value: &str, focused: bool| {
        let marker = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(marker.to_string(), style),
            Span::raw(format!("{label:<9}")),
            Span::styled(value.to_string(), style),
        ])
    };

    let mut lines = vec![
        field("Name", &form.name, form.focused == AddField::Name),
        field("Kind", &form.kind, form.focused == AddField::Kind),
        field("Minutes", &form.minutes, form.focused == AddField::Minutes),
    ];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let form_widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" New task (enter: save, esc: cancel) "),
    );
    frame.render_widget(form_widget, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let text = "\
j/k   move
space toggle done
a     add task
d     delete task
/     search
f     cycle status filter
r     reload from disk
q     quit";
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        " a:add  space:done  d:delete  /:search  f:filter  ?:help  q:quit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(line), area);
}
