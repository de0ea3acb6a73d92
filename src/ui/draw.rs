use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::model::InferenceModel;
use crate::predictor::{format_usd, SessionState};
use crate::ui::app::App;
use crate::ui::form::Field;
use crate::ui::theme::Theme;

/// Draws the entire UI.
pub fn draw<M: InferenceModel>(f: &mut Frame, app: &App<M>) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    if let SessionState::Error {
        error,
        halted: true,
    } = app.session.state()
    {
        draw_halted(f, area, &error.to_string());
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(cols[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(0)])
        .split(cols[1]);

    draw_form(f, left[0], app);
    draw_model_info(f, left[1], app);
    draw_summary(f, right[0], app);
    draw_result(f, right[1], app.session.state());

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("↑↓", Theme::key()),
            Span::styled(" move   ", Theme::muted()),
            Span::styled("←→", Theme::key()),
            Span::styled(" change   ", Theme::muted()),
            Span::styled("0-9 .", Theme::key()),
            Span::styled(" type   ", Theme::muted()),
            Span::styled("enter", Theme::key()),
            Span::styled(" estimate   ", Theme::muted()),
            Span::styled("q / esc", Theme::key()),
            Span::styled(" quit", Theme::muted()),
        ]))
        .alignment(Alignment::Center),
        rows[2],
    );
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(format!(" {title} "))
        .title_style(Theme::title())
}

fn draw_header(f: &mut Frame, area: Rect) {
    let p = Paragraph::new(Line::from(vec![
        Span::styled("Medical Insurance Cost Estimator", Theme::title()),
        Span::styled("  |  annual premium estimate from six attributes", Theme::dim()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn draw_form<M: InferenceModel>(f: &mut Frame, area: Rect, app: &App<M>) {
    let form = &app.form;
    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|&field| {
            let focused = field == form.focus();
            let mut value = form.display_value(field);
            if focused && form.is_editing() {
                value.push('█');
            }
            let (marker, style) = if focused {
                ("▶ ", Theme::highlight())
            } else {
                ("  ", Theme::text())
            };
            Line::from(vec![
                Span::styled(marker, Theme::key()),
                Span::styled(format!("{:<10}", field.label()), style),
                Span::styled(format!(" {value:<12}"), style),
                Span::styled(format!(" {}", field.hint()), Theme::muted()),
            ])
        })
        .collect();

    let block = panel("Applicant").border_style(Theme::border_focus());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_summary<M: InferenceModel>(f: &mut Frame, area: Rect, app: &App<M>) {
    let a = app.form.applicant();
    let header = Row::new(vec!["field", "value"]).style(Theme::title());
    let rows = [
        ("Age", a.age.to_string()),
        ("Sex", a.sex.to_string()),
        ("BMI", format!("{:.1}", a.bmi)),
        ("Children", a.children.to_string()),
        ("Smoker", a.smoker.to_string()),
        ("Region", a.region.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| Row::new(vec![Cell::from(k), Cell::from(v)]).style(Theme::text()));

    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(8)])
        .header(header)
        .block(panel("Summary"));
    f.render_widget(table, area);
}

fn draw_model_info<M: InferenceModel>(f: &mut Frame, area: Rect, app: &App<M>) {
    let mut lines = vec![Line::from(vec![
        Span::styled("algorithm  ", Theme::dim()),
        Span::styled("random forest regressor", Theme::text()),
    ])];
    match app.session.summary() {
        Some(s) => {
            lines.push(Line::from(vec![
                Span::styled("samples    ", Theme::dim()),
                Span::styled(s.n_samples.to_string(), Theme::text()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("R² (train) ", Theme::dim()),
                Span::styled(format!("{:.4}", s.r_squared), Theme::text()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("MAE        ", Theme::dim()),
                Span::styled(format_usd(s.mae), Theme::text()),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "no training summary in artifact",
            Theme::muted(),
        ))),
    }
    f.render_widget(
        Paragraph::new(lines)
            .block(panel("Model"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_result(f: &mut Frame, area: Rect, state: &SessionState) {
    let lines = match state {
        SessionState::Idle => vec![Line::from(Span::styled(
            "Press enter to estimate the cost.",
            Theme::muted(),
        ))],
        SessionState::InputsCollected(_) => {
            vec![Line::from(Span::styled("Calculating...", Theme::dim()))]
        }
        SessionState::Predicted { quote, .. } => {
            let mut lines = vec![
                Line::from(Span::styled("Estimated annual cost", Theme::dim())),
                Line::from(Span::styled(format_usd(quote.annual), Theme::amount())),
                Line::from(""),
            ];
            lines.extend(quote.rows().into_iter().skip(1).map(|(label, amount)| {
                Line::from(vec![
                    Span::styled(format!("{label:<9}"), Theme::dim()),
                    Span::styled(amount, Theme::text()),
                ])
            }));
            lines
        }
        SessionState::Error { error, .. } => vec![Line::from(vec![
            Span::styled(" ✖ ", Theme::error()),
            Span::styled(error.to_string(), Theme::error()),
        ])],
    };
    f.render_widget(
        Paragraph::new(lines)
            .block(panel("Estimate"))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_halted(f: &mut Frame, area: Rect, reason: &str) {
    let outer = centered_rect(60, 50, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(outer);

    f.render_widget(
        Paragraph::new(Span::styled("Model unavailable", Theme::error())),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(Span::styled(
            "Train a model with medcost-train, then start again.",
            Theme::muted(),
        )),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(reason)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::error())
                    .title(" Reason ")
                    .title_style(Theme::error()),
            )
            .style(Theme::text())
            .wrap(Wrap { trim: true }),
        chunks[2],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[q / esc]", Theme::key()),
            Span::styled(" quit", Theme::dim()),
        ])),
        chunks[3],
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
