use mailalert_core::error::CoreError;
use mailalert_core::template::{RenderContext, TemplateKind, TemplateSet};
use mailalert_db::models::alert::Alert;

/// Renders the HTML body of an alert notification.
#[derive(Debug, Clone)]
pub struct ContentRenderer {
    templates: TemplateSet,
}

impl ContentRenderer {
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    /// Render `alert` with the template its error type selects.
    pub fn render(&self, alert: &Alert) -> Result<String, CoreError> {
        let kind = TemplateKind::for_error_type(&alert.error_type);
        let ctx = RenderContext::new(
            alert.id,
            &alert.source_file_name,
            &alert.error_type,
            alert.error_timestamp,
            &alert.affected_channel,
            &alert.payload,
        );
        self.templates.render(kind, &ctx)
    }
}
