// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload page — the form, plus the status of the previous upload.
//
// Rendered on the server with dioxus-ssr; the page has no client script and
// posts straight back to `/`.

use dioxus::prelude::*;

use printdrop_core::AppConfig;
use printdrop_core::human_errors::{HumanMessage, Severity};

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub printer_pattern: String,
    /// Value of the file input's `accept` attribute, e.g. `.doc,.docx,.pdf`.
    pub accept: String,
    /// Extensions as shown to people, e.g. `doc, docx, pdf`.
    pub allowed_label: String,
    pub status: Option<HumanMessage>,
    /// Stored filename of the previous upload.
    pub stored_as: Option<String>,
}

impl PageView {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            printer_pattern: config.printer_match.clone(),
            accept: config
                .allowed_extensions
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(","),
            allowed_label: config.allowed_extensions.join(", "),
            status: None,
            stored_as: None,
        }
    }

    pub fn with_status(mut self, status: HumanMessage) -> Self {
        self.status = Some(status);
        self
    }
}

/// Render the complete HTML document.
pub fn render(view: &PageView) -> String {
    let body = dioxus_ssr::render_element(rsx! {
        UploadPage { view: view.clone() }
    });
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>printdrop</title></head>\
         <body style=\"font-family: system-ui, sans-serif; margin: 0; background: #f7f7f8;\">{body}</body></html>"
    )
}

#[component]
fn UploadPage(view: PageView) -> Element {
    rsx! {
        main { style: "max-width: 520px; margin: 48px auto; padding: 24px; background: white; border-radius: 12px; border: 1px solid #e0e0e0;",
            h1 { style: "margin-top: 0;", "Print a document" }
            p { style: "color: #666;",
                "Files are printed on {view.printer_pattern}. Accepted types: {view.allowed_label}."
            }

            if let Some(status) = view.status.clone() {
                StatusBanner { status }
            }
            if let Some(stored) = view.stored_as.clone() {
                p { style: "color: #666; font-size: 14px;", "Saved as {stored}" }
            }

            form {
                method: "post",
                action: "/",
                enctype: "multipart/form-data",
                style: "display: flex; flex-direction: column; gap: 12px; margin-top: 16px;",
                input { r#type: "file", name: "file", accept: "{view.accept}" }
                button {
                    r#type: "submit",
                    style: "padding: 10px 16px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;",
                    "Upload and print"
                }
            }
        }
    }
}

#[component]
fn StatusBanner(status: HumanMessage) -> Element {
    let (border, background) = banner_colors(status.severity);
    rsx! {
        div {
            class: "status",
            style: "margin: 16px 0; padding: 12px 16px; border-radius: 8px; border: 1px solid {border}; background: {background};",
            strong { "{status.message}" }
            p { style: "margin: 4px 0 0; color: #444;", "{status.suggestion}" }
        }
    }
}

fn banner_colors(severity: Severity) -> (&'static str, &'static str) {
    match severity {
        Severity::Done => ("#34c759", "#eefaf1"),
        Severity::ActionRequired => ("#ff9500", "#fff6e9"),
        Severity::HostProblem => ("#ff3b30", "#ffefee"),
    }
}
