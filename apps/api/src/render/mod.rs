// Rendering: Grouped Entries → HTML (handlebars) → PDF (headless Chromium).

pub mod handlers;
pub mod pdf;
pub mod template;
