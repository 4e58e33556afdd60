//! HTML rendering of a [`BoardView`]

use std::fmt::Write;

use super::{assets, BoardView, CardView, SILENCE_LABEL};

/// Full page: stylesheet, add-timer control, cards and the client script
pub fn render_page(view: &BoardView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Timers</title>
<style>{style}</style>
</head>
<body>
<header>
  <h1>Timers</h1>
  <button id="addTimerBtn" class="btn" type="button">+ Add timer</button>
</header>
<main id="timers" data-revision="{revision}">{cards}</main>
<script>{script}</script>
</body>
</html>
"#,
        style = assets::STYLE,
        revision = view.revision,
        cards = render_cards(view),
        script = assets::SCRIPT,
    )
}

/// Just the cards, for the page to swap in when the board changes
pub fn render_cards(view: &BoardView) -> String {
    let mut html = String::new();
    for card in &view.timers {
        render_card(&mut html, card);
    }
    html
}

fn render_card(out: &mut String, card: &CardView) {
    let disabled = |flag: bool| if flag { " disabled" } else { "" };
    let inputs = disabled(card.inputs_disabled);
    let toggle_class = if card.running { "pause" } else { "start" };

    let _ = write!(
        out,
        r#"<div class="timer{alarming}" data-id="{id}" data-phase="{phase}" data-pulses="{pulses}">
  <div class="top">
    <input class="name" type="text" value="{name}" placeholder="Enter a subject (optional)" aria-label="Timer subject">
    <button class="remove" type="button" title="Remove" data-action="remove">&times;</button>
  </div>
  <div class="duration">
    <input class="h" type="number" min="0" max="99" value="{h}" aria-label="Hours"{inputs}><label>h</label>
    <input class="m" type="number" min="0" max="59" value="{m}" aria-label="Minutes"{inputs}><label>m</label>
    <input class="s" type="number" min="0" max="59" value="{s}" aria-label="Seconds"{inputs}><label>s</label>
  </div>
  <div class="display">{display}</div>
  <div class="barWrap"><div class="bar" style="width: {progress:.1}%"></div></div>
  <div class="controls">
    <button class="btn startPause {toggle_class}" type="button" data-action="toggle"{toggle_disabled}>{toggle_label}</button>
    <button class="btn reset" type="button" data-action="reset-default"{reset_disabled}>Reset default time</button>
"#,
        alarming = if card.alarm_visible { " alarming" } else { "" },
        id = card.id,
        phase = card.phase.as_str(),
        pulses = card.alarm_pulses,
        name = escape_html(&card.name),
        h = card.duration.hours,
        m = card.duration.minutes,
        s = card.duration.seconds,
        display = card.display,
        progress = card.progress_percent,
        toggle_disabled = disabled(card.start_pause_disabled),
        toggle_label = card.start_pause_label,
        reset_disabled = disabled(card.reset_disabled),
    );
    if card.alarm_visible {
        let _ = writeln!(
            out,
            r#"    <button class="btn stopAlarm" type="button" data-action="acknowledge">{}</button>"#,
            SILENCE_LABEL
        );
    }
    out.push_str("  </div>\n</div>\n");
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
