//! Standalone HTML export.
//!
//! The artifact embeds the serialized document and pre-renders, with the same
//! fragment code as [`super::html`], one auth panel per endpoint and one
//! property table per type for every role. A small inline script only
//! switches which pre-rendered variant is visible, so parsing, linking and
//! visibility rules cannot drift from the interactive renderer.

use crate::error::Result;
use crate::model::Document;
use crate::render::html::{
    page_head, render_auth, render_endpoint_open, render_intro, render_property_table,
    render_sidebar, render_type_open, render_types_open,
};
use crate::render::json::to_embedded_json;
use crate::render::view::{DocumentView, EndpointView, TypeView};
use crate::render::{html_escape, Renderer};
use crate::visibility::ViewState;
use tracing::debug;

pub struct ExportRenderer;

const SCRIPT: &str = r#"(function () {
  var state = JSON.parse(document.getElementById('view-state').textContent);
  function roleFor(typeName) {
    return Object.prototype.hasOwnProperty.call(state.perspectives, typeName)
      ? state.perspectives[typeName]
      : state.persona;
  }
  function show(container, role) {
    container.querySelectorAll('.variant').forEach(function (v) {
      v.hidden = v.dataset.role !== role;
    });
  }
  function render() {
    document.body.dataset.persona = state.persona;
    document.querySelectorAll('.persona').forEach(function (b) {
      b.classList.toggle('active', b.dataset.role === state.persona);
    });
    document.querySelectorAll('.endpoint').forEach(function (ep) {
      show(ep, state.persona);
    });
    document.querySelectorAll('.type').forEach(function (t) {
      var role = roleFor(t.dataset.type);
      show(t, role);
      var select = t.querySelector('select');
      if (select) select.value = role;
    });
  }
  document.querySelectorAll('.persona').forEach(function (b) {
    b.addEventListener('click', function () {
      state.persona = b.dataset.role;
      render();
    });
  });
  document.querySelectorAll('.type select').forEach(function (s) {
    s.addEventListener('change', function () {
      state.perspectives[s.closest('.type').dataset.type] = s.value;
      render();
    });
  });
  render();
})();
"#;

impl Renderer for ExportRenderer {
    fn render(&self, doc: &Document, view: &ViewState) -> Result<String> {
        let dv = DocumentView::build(doc, view);

        // Every role the page can switch to, plus an initial persona or
        // override role the document itself does not mention.
        let mut variant_roles = dv.roles.clone();
        for role in std::iter::once(&view.persona).chain(view.perspectives.values()) {
            if !variant_roles.iter().any(|r| r == role) {
                variant_roles.push(role.clone());
            }
        }
        debug!(roles = variant_roles.len(), "pre-rendering export variants");

        let mut out = String::new();
        out.push_str(&page_head(dv.title()));
        out.push_str(&format!(
            "<body data-persona=\"{}\">\n",
            html_escape(&view.persona)
        ));
        out.push_str(&format!(
            "<script type=\"application/json\" id=\"app-data\">{}</script>\n",
            to_embedded_json(doc)?
        ));
        let state = serde_json::json!({
            "persona": view.persona,
            "perspectives": view.perspectives,
        });
        out.push_str(&format!(
            "<script type=\"application/json\" id=\"view-state\">{}</script>\n",
            serde_json::to_string(&state)?.replace("</", "<\\/")
        ));

        out.push_str("<div class=\"layout\">\n");
        out.push_str(&render_sidebar(&dv, true));
        out.push_str("<main>\n");
        out.push_str(&render_intro(&dv));

        out.push_str("<section class=\"endpoints\">\n<h2>API Endpoints</h2>\n");
        for ep in &dv.endpoints {
            out.push_str(&render_endpoint_open(ep));
            for role in &variant_roles {
                let variant = EndpointView::build(doc, ep.endpoint, role);
                out.push_str(&variant_open(role, role == &view.persona));
                out.push_str(&render_auth(variant.auth, &variant.rules));
                out.push_str("</div>\n");
            }
            out.push_str("</div>\n</article>\n");
        }
        out.push_str("</section>\n");

        out.push_str(&render_types_open());
        for tv in &dv.types {
            out.push_str(&render_type_open(tv, true));
            for role in &variant_roles {
                let variant = TypeView::build(doc, tv.ty, role);
                out.push_str(&variant_open(role, role == tv.role));
                out.push_str(&render_property_table(&variant, &doc.custom_types));
                out.push_str("</div>\n");
            }
            out.push_str("</article>\n");
        }
        out.push_str("</section>\n");

        out.push_str("</main>\n</div>\n");
        out.push_str("<script>\n");
        out.push_str(SCRIPT);
        out.push_str("</script>\n</body>\n</html>\n");
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn variant_open(role: &str, visible: bool) -> String {
    let hidden = if visible { "" } else { " hidden" };
    format!(
        "<div class=\"variant\" data-role=\"{}\"{}>\n",
        html_escape(role),
        hidden
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::html::HtmlRenderer;

    fn export(doc: &Document, view: &ViewState) -> String {
        ExportRenderer.render(doc, view).unwrap()
    }

    #[test]
    fn embeds_document_data() {
        let doc = Document::default();
        let html = export(&doc, &ViewState::default());
        let start = html.find("id=\"app-data\">").unwrap() + "id=\"app-data\">".len();
        let end = start + html[start..].find("</script>").unwrap();
        let embedded: Document = serde_json::from_str(&html[start..end]).unwrap();
        assert_eq!(embedded, doc);
    }

    #[test]
    fn one_variant_per_role_and_item() {
        let doc = Document::default();
        let html = export(&doc, &ViewState::default());
        let roles = 5;
        let items = doc.endpoints.len() + doc.custom_types.len();
        assert_eq!(html.matches("class=\"variant\"").count(), roles * items);
        // only the active persona's variants start visible
        assert_eq!(html.matches("<div class=\"variant\" data-role=\"Standard\">").count(), items);
    }

    #[test]
    fn variants_match_interactive_render() {
        let doc = Document::default();
        let exported = export(&doc, &ViewState::default());
        for persona in ["Standard", "Owner", "Moderator"] {
            let interactive = HtmlRenderer.render(&doc, &ViewState::new(persona)).unwrap();
            let dv_state = ViewState::new(persona);
            let dv = DocumentView::build(&doc, &dv_state);
            for tv in &dv.types {
                let table = render_property_table(tv, &doc.custom_types);
                assert!(interactive.contains(&table));
                assert!(exported.contains(&table), "missing {} table for {}", tv.ty.name, persona);
            }
        }
    }

    #[test]
    fn override_selects_initial_type_variant() {
        let view = ViewState::default().with_perspective("Room", "Owner");
        let html = export(&Document::default(), &view);
        assert!(html.contains("\"perspectives\":{\"Room\":\"Owner\"}"));
        let room = &html[html.find("id=\"type-Room\"").unwrap()..];
        let room = &room[..room.find("</article>").unwrap()];
        assert!(room.contains("<div class=\"variant\" data-role=\"Owner\">"));
        assert!(room.contains("<div class=\"variant\" data-role=\"Standard\" hidden>"));
    }

    #[test]
    fn unknown_persona_gets_its_own_variant() {
        let html = export(&Document::default(), &ViewState::new("Auditor"));
        assert!(html.contains("<div class=\"variant\" data-role=\"Auditor\">"));
        assert!(html.contains("Access undefined for Auditor"));
    }

    #[test]
    fn unlisted_override_role_keeps_placeholder_rows() {
        let doc = Document::default();
        let view = ViewState::default().with_perspective("Room", "Auditor");
        let html = export(&doc, &view);

        let room = &html[html.find("id=\"type-Room\"").unwrap()..];
        let room = &room[..room.find("</article>").unwrap()];
        assert_eq!(room.matches("<div class=\"variant\" data-role=\"Auditor\">").count(), 1);

        // the visible table is the one the single-state page shows
        let interactive = HtmlRenderer.render(&doc, &view).unwrap();
        let state = view.clone();
        let dv = DocumentView::build(&doc, &state);
        let table = render_property_table(&dv.types[0], &doc.custom_types);
        assert!(table.contains("Hidden for Auditor"));
        assert!(interactive.contains(&table));
        assert!(room.contains(&table));
    }

    #[test]
    fn persona_buttons_are_interactive() {
        let html = export(&Document::default(), &ViewState::default());
        assert!(html.contains("<button type=\"button\" class=\"persona active\" data-role=\"Standard\">Standard</button>"));
        assert!(html.contains("addEventListener('click'"));
    }
}
