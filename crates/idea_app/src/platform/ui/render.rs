use idea_core::{
    AppViewModel, DocumentView, LOADING_CAPTION, LOADING_SUBCAPTION, UNAVAILABLE_MESSAGE,
};

use super::layout;

/// Renders the full HTML page for a view. Same view, same bytes.
pub fn render_page(view: &AppViewModel) -> String {
    layout::page(&render_card(&view.document), view.is_live())
}

fn render_card(document: &DocumentView) -> String {
    match document {
        DocumentView::Loading => format!(
            "<div class=\"loading\">\n\
<div class=\"spinner\" role=\"status\"></div>\n\
<p class=\"caption\">{LOADING_CAPTION}</p>\n\
<p class=\"subcaption\">{LOADING_SUBCAPTION}</p>\n\
</div>\n"
        ),
        DocumentView::Content { html, .. } => {
            format!("<article class=\"prose\">\n{html}</article>\n")
        }
        DocumentView::Unavailable => {
            format!("<div class=\"placeholder\"><p>{UNAVAILABLE_MESSAGE}</p></div>\n")
        }
    }
}
