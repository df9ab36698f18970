use crate::application::{App, AppMode, AuthMode, NoticeKind};
use crate::domain::{FieldState, FormSection, StepProgress, APPLICATION_STEPS, TOTAL_STEPS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_landing(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    match app.mode() {
        AppMode::Wizard => render_wizard(f, app),
        AppMode::Auth => render_auth(f, app),
        AppMode::Applications => render_applications(f, app),
        AppMode::Landing => {}
    }

    if let Some(notice) = app.active_notice() {
        render_notice(f, notice.kind, &notice.title, &notice.body);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let user = app
        .current_user
        .as_ref()
        .map(|u| format!("Logged in as {}", u.full_name))
        .unwrap_or_else(|| "Not logged in".to_string());
    let header = Paragraph::new(format!("Founders Fuel | {}", user))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_landing(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "FinBytes Founders Fuel",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Apply with your startup idea in five short steps."),
        Line::from(""),
        Line::from(Span::styled(
            format!("[ {} ]  (a)", app.cta_label),
            Style::default().bg(Color::Blue).fg(Color::White),
        )),
    ];
    let landing = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Welcome"))
        .wrap(Wrap { trim: false });
    f.render_widget(landing, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = if app.submitting {
        "Submitting...".to_string()
    } else if app.auth.busy {
        "Contacting server...".to_string()
    } else if app.active_notice().is_some() {
        "Enter/Esc: acknowledge".to_string()
    } else {
        match app.mode() {
            AppMode::Landing => {
                if app.session.is_logged_in() {
                    "a: apply | m: my applications | o: logout | q: quit".to_string()
                } else {
                    "a: apply | l: login/register | q: quit".to_string()
                }
            }
            AppMode::Wizard => {
                let submit = if app.wizard.is_last_step() { "Enter/Ctrl+S: submit" } else { "Enter/Ctrl+N: next" };
                format!("Tab/↑↓: field | Space: toggle | {} | Ctrl+P: back | Esc: close", submit)
            }
            AppMode::Auth => "Tab/↑↓: field | ←→: login/register | Enter: submit | Esc: close".to_string(),
            AppMode::Applications => "Esc: close".to_string(),
        }
    };

    let style = match app.mode() {
        AppMode::Landing => Style::default(),
        AppMode::Wizard => Style::default().fg(Color::Green),
        AppMode::Auth => Style::default().fg(Color::Yellow),
        AppMode::Applications => Style::default().fg(Color::Magenta),
    };
    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn popup_area(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    let width = area.width * width_pct / 100;
    let height = area.height * height_pct / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn field_lines(section: &FormSection) -> Vec<Line<'static>> {
    section
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| field_line(field, index == section.focus))
        .collect()
}

fn field_line(field: &FieldState, focused: bool) -> Line<'static> {
    let marker = if field.spec.required { " *" } else { "" };
    let label_style = if field.flagged {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value = if field.spec.kind.is_checkbox() {
        format!("[{}]", if field.checked { "x" } else { " " })
    } else if field.spec.kind.is_secret() {
        "*".repeat(field.text.chars().count())
    } else {
        field.text.clone()
    };
    let value_style = if focused {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(format!("{}{}: ", field.spec.label, marker), label_style),
        Span::styled(if focused { format!("{}_", value) } else { value }, value_style),
    ])
}

fn render_wizard(f: &mut Frame, app: &App) {
    let area = popup_area(f.area(), 80, 80);
    f.render_widget(Clear, area);

    let step = app.wizard.current_step();
    let title = APPLICATION_STEPS
        .get(step - 1)
        .map(|s| s.title)
        .unwrap_or_default();

    let progress: Vec<Span> = app
        .wizard
        .progress()
        .iter()
        .enumerate()
        .map(|(index, state)| {
            let style = match state {
                StepProgress::Completed => Style::default().fg(Color::Green),
                StepProgress::Active => Style::default().fg(Color::Black).bg(Color::Yellow),
                StepProgress::Pending => Style::default().fg(Color::DarkGray),
            };
            Span::styled(format!(" {} ", index + 1), style)
        })
        .collect();

    let mut lines = vec![Line::from(progress), Line::from("")];
    if let Some(section) = app.wizard.active_section() {
        lines.extend(field_lines(section));
    }
    if app.submitting {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Submitting...", Style::default().fg(Color::Yellow))));
    }

    let wizard = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Application - Step {}/{}: {}", step, TOTAL_STEPS, title)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(wizard, area);
}

fn render_auth(f: &mut Frame, app: &App) {
    let area = popup_area(f.area(), 60, 60);
    f.render_widget(Clear, area);

    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(format!(" {} ", label), Style::default().bg(Color::Yellow).fg(Color::Black))
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::DarkGray))
        }
    };
    let mode = app.auth.mode();
    let mut lines = vec![
        Line::from(vec![
            tab("Login", mode == AuthMode::Login),
            Span::raw("  "),
            tab("Register", mode == AuthMode::Register),
        ]),
        Line::from(""),
    ];
    lines.extend(field_lines(app.auth.active_form()));
    if app.auth.busy {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Please wait...", Style::default().fg(Color::Yellow))));
    }

    let modal = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Login / Register"));
    f.render_widget(modal, area);
}

fn render_applications(f: &mut Frame, app: &App) {
    let area = popup_area(f.area(), 80, 60);
    f.render_widget(Clear, area);

    let header = Row::new(vec!["ID", "Startup", "Status", "Payment"])
        .style(Style::default().fg(Color::Yellow));
    let rows: Vec<Row> = app
        .applications
        .iter()
        .flatten()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.id.clone()),
                Cell::from(a.startup_name.clone().unwrap_or_default()),
                Cell::from(a.status.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(a.payment_status.clone().unwrap_or_else(|| "pending".to_string())),
            ])
        })
        .collect();
    let count = rows.len();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("My Applications ({})", count)),
    );
    f.render_widget(table, area);
}

fn render_notice(f: &mut Frame, kind: NoticeKind, title: &str, body: &str) {
    let area = popup_area(f.area(), 50, 30);
    f.render_widget(Clear, area);

    let color = match kind {
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    let notice = Paragraph::new(body.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .style(Style::default().fg(color)),
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false });
    f.render_widget(notice, area);
}
