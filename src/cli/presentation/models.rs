//! Models command presentation: catalog table with optional probe status.

use super::shared::{format_section_heading, to_pretty_json};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;

/// One catalog row; `live` is present only when probed.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub model: String,
    pub default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,
}

pub fn format_models_text(rows: &[ModelStatus], default_model: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Model Catalog")));

    let probed = rows.iter().any(|r| r.live.is_some());
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    if probed {
        table.set_header(vec!["#", "Model", "Default", "Status"]);
    } else {
        table.set_header(vec!["#", "Model", "Default"]);
    }
    for (i, row) in rows.iter().enumerate() {
        let default_str = if row.default { "yes" } else { "" };
        let mut cells = vec![(i + 1).to_string(), row.model.clone(), default_str.to_string()];
        if probed {
            cells.push(match row.live {
                Some(true) => "live".to_string(),
                Some(false) => "unavailable".to_string(),
                None => "-".to_string(),
            });
        }
        table.add_row(cells);
    }
    out.push_str(&format!("{}\n", table));

    if !rows.iter().any(|r| r.default) {
        out.push_str(&format!(
            "\nDefault model {} is not in the catalog.\n",
            default_model
        ));
    }
    if probed {
        let live = rows.iter().filter(|r| r.live == Some(true)).count();
        out.push_str(&format!("\nLive: {}/{}\n", live, rows.len()));
    }
    out
}

pub fn format_models_json(rows: &[ModelStatus], default_model: &str) -> String {
    to_pretty_json(&serde_json::json!({
        "models": rows,
        "default_model": default_model,
        "total": rows.len(),
    }))
}
