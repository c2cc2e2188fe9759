use crate::application::{App, AppMode, Focus};
use crate::domain::Field;
use crate::presentation::format::{breakdown_lines, choice_display, format_currency, summary_lines};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const LABEL_WIDTH: usize = 24;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render_ui(f: &mut Frame, app: &App) {
    let banner_height = if app.form.api_error().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(Field::ALL.len() as u16 + 4),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_form(f, app, chunks[1]);
    if banner_height > 0 {
        render_error_banner(f, app, chunks[2]);
    }
    render_results(f, app, chunks[3]);
    render_status_bar(f, app, chunks[4]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled("Loan Calculator", Style::default().fg(Color::Cyan))];
    if let Some(payment) = app.header_payment.get() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" Monthly Payment: {} ", format_currency(payment)),
            Style::default().bg(Color::Green).fg(Color::Black),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn field_label(app: &App, field: Field) -> String {
    match field {
        Field::Term => format!("Term (years, 1-{})", app.form.term_max()),
        _ => field.label().to_string(),
    }
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::with_capacity(Field::ALL.len() + 2);

    for field in Field::ALL {
        let focused = app.focus == Focus::Field(field);
        let editing = focused && matches!(app.mode, AppMode::Editing);

        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let value = if editing {
            app.input.clone()
        } else if field.is_choice() {
            format!("< {} >", choice_display(app.form.field(field)))
        } else {
            app.form.field(field).to_string()
        };

        let value_style = match (editing, focused, app.form.error(field).is_some()) {
            (true, _, _) => Style::default().fg(Color::Green),
            (false, true, _) => Style::default().bg(Color::Blue).fg(Color::White),
            (false, false, true) => Style::default().fg(Color::Red),
            _ => Style::default(),
        };

        let mut spans = vec![
            Span::styled(format!("{:<width$}", field_label(app, field), width = LABEL_WIDTH), label_style),
            Span::styled(value, value_style),
        ];
        if let Some(message) = app.form.error(field) {
            spans.push(Span::styled(format!("  {}", message), Style::default().fg(Color::Red)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::raw(""));
    let submit_text = if app.form.is_loading() {
        format!("[ {} Calculating… ]", SPINNER[app.spinner_frame % SPINNER.len()])
    } else {
        "[ Submit ]".to_string()
    };
    let submit_style = if app.focus == Focus::Submit {
        Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
    } else if app.form.is_loading() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH)),
        Span::styled(submit_text, submit_style),
    ]));

    let block = Block::default().borders(Borders::ALL).title("Loan Details");
    let inner = block.inner(area);
    f.render_widget(Paragraph::new(lines).block(block), area);

    if matches!(app.mode, AppMode::Editing) {
        if let Focus::Field(field) = app.focus {
            let row = Field::ALL.iter().position(|candidate| *candidate == field).unwrap_or(0) as u16;
            let x = inner.x + LABEL_WIDTH as u16 + app.cursor_position as u16;
            f.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y + row));
        }
    }
}

fn render_error_banner(f: &mut Frame, app: &App, area: Rect) {
    let message = app.form.api_error().unwrap_or_default();
    let banner = Paragraph::new(message)
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .wrap(Wrap { trim: true });
    f.render_widget(banner, area);
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Calculation Results");
    let Some(result) = app.form.result() else {
        let hint = if app.form.is_loading() {
            "Waiting for the loan service…"
        } else {
            "Fill in the form and submit to see the breakdown."
        };
        let placeholder = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    };

    let mut lines: Vec<Line> = summary_lines(result)
        .into_iter()
        .map(|l| Line::styled(l, Style::default().add_modifier(Modifier::BOLD)))
        .collect();
    lines.push(Line::raw(""));
    lines.extend(breakdown_lines(result).into_iter().map(Line::raw));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "↑↓/Tab: move | Enter: edit/select/submit | ←→: change choice | Ctrl+R: submit | Ctrl+E: export CSV | Ctrl+N: clear | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!("Editing: {} (Enter to save, Esc to cancel)", app.input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("Loan Calculator Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"LOAN CALCULATOR

=== FIELDS ===
Loan Type           Fixed Rate, Variable Rate or Interest Only
Loan Amount ($)     Must be greater than zero
Term (years)        1-30, or 1-10 for Interest Only loans
Credit Score        Excellent, Good, Fair or Poor
House Age (years)   Zero or more

All fields are required. Every problem is listed next to its field
when you submit, and nothing is sent until the form is valid.

=== RESULTS ===
Monthly payment, total payment and total interest are shown in dollars.
Interest rates are shown as percentages with two decimals.
The header shows the last successful monthly payment; it disappears
when a calculation fails or a new one starts.

=== NAVIGATION ===
Up/Down, Tab        Move between fields
Shift+Tab           Move to the previous field
Enter               Edit a text field, change a choice, or submit
Left/Right, Space   Change the selected choice
Ctrl+R              Submit from any field
Ctrl+N              Clear the form
Ctrl+E              Export the current result to CSV
F1 or ?             Show this help
q                   Quit

=== EDITING ===
Enter               Save the value
Esc                 Discard changes
Left/Right/Home/End Move the cursor
Backspace/Delete    Remove characters

=== HELP NAVIGATION ===
↑↓ or j/k           Scroll help text up/down one line
Page Up/Down        Scroll help text up/down 5 lines
Home                Jump to top of help text
Esc/F1/?/q          Close this help window"#
}
