//! Render-ready projection of [`ViewState`]: labels, enabled flags and hero
//! cards, with no styling.

use shared::domain::{HeroRecord, HUMILITY_SCORE_MAX};

use crate::controller::ViewState;

pub const TITLE: &str = "CodeHeroes";
pub const ERROR_BANNER_TITLE: &str = "Error de sistema!";
pub const SHORT_ID_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBanner {
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub name: FieldView,
    pub superpower: FieldView,
    pub humility_score: FieldView,
    /// Badge next to the score input, e.g. `⚡5`.
    pub score_badge: String,
    pub submit: ButtonView,
    pub inputs_disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroCard {
    pub name: String,
    pub short_id: String,
    pub superpower: String,
    pub humility: String,
    /// Fill ratio of the humility bar in `0.0..=1.0`.
    pub humility_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroesView {
    pub title: &'static str,
    pub error: Option<ErrorBanner>,
    pub toggle_form: ButtonView,
    pub refresh: ButtonView,
    pub form: Option<FormView>,
    pub cards: Vec<HeroCard>,
}

impl HeroesView {
    pub fn from_state(state: &ViewState) -> Self {
        let busy = state.status.is_busy();
        let form_visible = state.status.form_visible;

        Self {
            title: TITLE,
            error: state
                .status
                .error_message
                .as_ref()
                .map(|message| ErrorBanner {
                    title: ERROR_BANNER_TITLE,
                    message: message.clone(),
                }),
            toggle_form: ButtonView {
                label: if form_visible { "Cancelar" } else { "Nuevo Heroe" },
                disabled: busy,
            },
            refresh: ButtonView {
                label: if busy {
                    "Sincronizando..."
                } else {
                    "Actualizar Sistema"
                },
                disabled: busy,
            },
            form: form_visible.then(|| form_view(state, busy)),
            cards: state.heroes.iter().map(HeroCard::from_record).collect(),
        }
    }
}

fn form_view(state: &ViewState, busy: bool) -> FormView {
    let draft = &state.draft;
    let score = format_score(draft.humility_score);
    FormView {
        name: FieldView {
            label: "Nombre del Heroe",
            value: draft.name.clone(),
            placeholder: Some("Ej: Debugger Man"),
        },
        superpower: FieldView {
            label: "Superpoder Tecnológico",
            value: draft.superpower.clone(),
            placeholder: Some("Ej: Capacidad de resolver bugs en segundos"),
        },
        humility_score: FieldView {
            label: "Nivel de Humildad (1-10)",
            value: score.clone(),
            placeholder: None,
        },
        score_badge: format!("⚡{score}"),
        submit: ButtonView {
            label: if busy {
                "Compilando Heroe..."
            } else {
                "Desplegar Heroe"
            },
            // The whole fieldset is disabled while busy; the button itself is not.
            disabled: false,
        },
        inputs_disabled: busy,
    }
}

impl HeroCard {
    pub fn from_record(hero: &HeroRecord) -> Self {
        let ratio = hero.humility_score / HUMILITY_SCORE_MAX;
        Self {
            name: hero.name.clone(),
            short_id: format!("#{}", hero.id.prefix(SHORT_ID_LEN)),
            superpower: hero.superpower.clone(),
            humility: format!("{}/10", format_score(hero.humility_score)),
            humility_ratio: if ratio.is_nan() {
                0.0
            } else {
                ratio.clamp(0.0, 1.0)
            },
        }
    }
}

/// Formats a score the way a JavaScript number prints: integral values
/// drop the fraction, non-finite values use `Infinity`/`NaN`, and magnitudes
/// of at least 1e21 or below 1e-6 switch to exponent form (`1e+21`, `1e-7`).
pub fn format_score(score: f64) -> String {
    if score.is_nan() {
        "NaN".to_string()
    } else if score.is_infinite() {
        let sign = if score > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if score == 0.0 {
        "0".to_string()
    } else if score.abs() >= 1e21 || score.abs() < 1e-6 {
        let formatted = format!("{score:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else {
        // `Display` for f64 already gives the shortest round-trip form.
        score.to_string()
    }
}
