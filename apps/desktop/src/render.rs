//! Plain-text rendering of the hero view for the terminal.

use std::fmt::Write as _;

use client_core::view::{ButtonView, FieldView, FormView, HeroCard, HeroesView};

const BAR_WIDTH: usize = 10;

pub fn render(view: &HeroesView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "==== {} ====", view.title);

    if let Some(error) = &view.error {
        let _ = writeln!(out, "⚠️  {}", error.title);
        let _ = writeln!(out, "    {}", error.message);
    }

    let _ = writeln!(
        out,
        "{}  {}",
        button(&view.toggle_form),
        button(&view.refresh)
    );

    if let Some(form) = &view.form {
        render_form(&mut out, form);
    }

    if view.cards.is_empty() {
        let _ = writeln!(out, "(sin superhéroes)");
    }
    for card in &view.cards {
        render_card(&mut out, card);
    }
    out
}

fn button(button: &ButtonView) -> String {
    if button.disabled {
        format!("( {} )", button.label)
    } else {
        format!("[ {} ]", button.label)
    }
}

fn field(field: &FieldView) -> String {
    match (field.value.is_empty(), field.placeholder) {
        (true, Some(placeholder)) => format!("{}: <{placeholder}>", field.label),
        _ => format!("{}: {}", field.label, field.value),
    }
}

fn render_form(out: &mut String, form: &FormView) {
    let lock = if form.inputs_disabled { " (bloqueado)" } else { "" };
    let _ = writeln!(out, "---- nuevo heroe{lock} ----");
    let _ = writeln!(out, "  {}", field(&form.name));
    let _ = writeln!(out, "  {}", field(&form.superpower));
    let _ = writeln!(
        out,
        "  {}  {}",
        field(&form.humility_score),
        form.score_badge
    );
    let _ = writeln!(out, "  {}", button(&form.submit));
}

fn render_card(out: &mut String, card: &HeroCard) {
    // Ratio is already clamped to [0, 1].
    let filled = (card.humility_ratio * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let _ = writeln!(out, "* {} {}", card.name, card.short_id);
    let _ = writeln!(out, "    Superpoder: {}", card.superpower);
    let _ = writeln!(out, "    Nivel Humildad: [{bar}] {} 🛡️", card.humility);
}
