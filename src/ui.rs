use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use biblehub_scraper::Field;
use crate::app::{App, Focus};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    let [cards_area, config_area, results_area] = Layout::vertical([
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Min(0),
    ])
    .areas(body_area);

    let [scripture_area, options_area] = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(50),
    ])
    .areas(cards_area);

    render_card(
        app,
        frame,
        scripture_area,
        "Scripture Selection",
        "Choose the biblical passage you want to scrape",
        &[Field::Book, Field::Chapter, Field::Verse],
    );
    render_card(
        app,
        frame,
        options_area,
        "Scraping Options",
        "Configure what type of content to extract",
        &[Field::ScrapeType, Field::Commentary, Field::Language],
    );
    render_configuration(app, frame, config_area);
    render_results(app, frame, results_area);

    render_footer(app, frame, footer_area);

    if app.picker.is_some() {
        render_picker(app, frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Bible Hub Scraper ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            "Extract biblical content, commentaries, and study materials",
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_card(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    title: &str,
    description: &str,
    fields: &[Field],
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title));

    let selection = app.controller.selection();
    let catalog = app.controller.catalog();

    let mut lines = vec![Line::styled(
        description.to_string(),
        Style::default().fg(Color::DarkGray),
    )];

    for &field in fields {
        let focused = app.focus == Focus::Field(field);
        let value = selection.get(field);

        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let (text, value_style) = if value.is_empty() {
            (field.placeholder().to_string(), Style::default().fg(Color::DarkGray))
        } else {
            (catalog.display_value(field, value), Style::default().fg(Color::White))
        };
        let value_style = if focused {
            value_style.bg(Color::Blue)
        } else {
            value_style
        };

        lines.push(Line::from(Span::styled(field.label(), label_style)));
        lines.push(Line::from(vec![
            Span::raw(if focused { "> " } else { "  " }),
            Span::styled(format!("{} ▾", text), value_style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_configuration(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Selected Configuration ");

    let badge_style = Style::default().bg(Color::Gray).fg(Color::Black);
    let mut badges: Vec<Span> = Vec::new();
    for badge in app.controller.badges() {
        badges.push(Span::styled(format!(" {} ", badge), badge_style));
        badges.push(Span::raw(" "));
    }
    if badges.is_empty() {
        badges.push(Span::styled("Nothing selected yet", Style::default().fg(Color::DarkGray)));
    }

    let focused = app.focus == Focus::Submit;
    let (button_text, button_style) = if app.controller.is_loading() {
        let frame_idx = app.animation_frame as usize % SPINNER.len();
        (
            format!(" {} Scraping... ", SPINNER[frame_idx]),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        )
    } else if app.controller.can_submit() {
        let style = Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD);
        (
            " Start Scraping ".to_string(),
            if focused { style.add_modifier(Modifier::REVERSED) } else { style },
        )
    } else {
        let style = Style::default().bg(Color::Black).fg(Color::DarkGray);
        (
            " Start Scraping ".to_string(),
            if focused { style.add_modifier(Modifier::UNDERLINED) } else { style },
        )
    };

    let mut lines = vec![
        Line::from(badges),
        Line::from(vec![
            Span::raw(if focused { "> " } else { "  " }),
            Span::styled(button_text, button_style),
        ]),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::styled(status.clone(), Style::default().fg(Color::Yellow)));
    } else if let Some(error) = app.controller.last_error() {
        lines.push(Line::styled(error.to_string(), Style::default().fg(Color::Red)));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_results(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Scraping Results ");

    app.results_area = Some(area);
    app.result_height = block.inner(area).height;

    let paragraph = match app.controller.result() {
        Some(result) => Paragraph::new(result.to_string())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((app.result_scroll, 0)),
        None => Paragraph::new("Results will appear here...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block),
    };

    frame.render_widget(paragraph, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let pairs: Vec<(&str, &str)> = if app.picker.is_some() {
        vec![
            ("↑/↓", "move"),
            ("a-z", "jump"),
            ("Enter", "choose"),
            ("Esc", "close"),
        ]
    } else {
        let mut pairs = vec![("j/k", "focus"), ("Enter", "open"), ("s", "scrape")];
        if app.controller.is_loading() {
            pairs.push(("Esc", "cancel"));
        }
        pairs.extend([("Del", "clear"), ("r", "reset"), ("PgUp/PgDn", "results"), ("q", "quit")]);
        pairs
    };

    let mode = if app.controller.is_loading() { " SCRAPING " } else { " FORM " };
    let mode_style = if app.controller.is_loading() {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().bg(Color::Blue).fg(Color::White)
    };

    let mut spans = vec![Span::styled(mode, mode_style), Span::styled(" ", label_style)];
    for (key, label) in pairs {
        spans.push(Span::styled(format!(" {} ", key), key_style));
        spans.push(Span::styled(format!(" {} ", label), label_style));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_picker(app: &mut App, frame: &mut Frame, area: Rect) {
    let catalog = app.controller.catalog();
    let Some(picker) = app.picker.as_mut() else {
        return;
    };

    // Calculate popup size and position (centered)
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = u16::try_from(picker.options.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(20)
        .min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", picker.field.label()));

    let items: Vec<ListItem> = picker
        .options
        .iter()
        .map(|option| {
            let label = catalog.display_value(picker.field, option);
            match catalog.scrape_type(option).filter(|_| picker.field == Field::ScrapeType) {
                Some(kind) => ListItem::new(Line::from(vec![
                    Span::raw(format!(" {} ", label)),
                    Span::styled(kind.description.clone(), Style::default().fg(Color::DarkGray)),
                ])),
                None => ListItem::new(format!(" {} ", label)),
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, popup_area, &mut picker.state);
}
