//! HTML rendering for the petition pages.
//!
//! Stored `name` and `comment` were sanitized on the way in and are written
//! as-is; anything echoed back from a rejected form is escaped here.

use std::fmt::Write;

use axum::response::Html;
use service::signature::domain::{FieldError, Listing, Signature, SignatureForm};
use service::signature::sanitize::{escape_html, parse_flag};

const ANONYMOUS_LABEL: &str = "Nafnlaust";

/// Everything the listing page shows.
pub struct IndexView<'a> {
    pub errors: &'a [FieldError],
    pub form: &'a SignatureForm,
    pub listing: &'a Listing,
}

pub fn index(view: &IndexView<'_>) -> Html<String> {
    let mut body = String::new();
    body.push_str("<h1>Undirskriftarlisti</h1>\n");
    render_errors(&mut body, view.errors);
    render_form(&mut body, view.form);
    render_signatures(&mut body, view.listing);
    Html(layout("Undirskriftarlisti", &body))
}

pub fn error_page(title: &str, text: &str) -> Html<String> {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Til baka</a></p>\n",
        escape_html(title),
        escape_html(text)
    );
    Html(layout(title, &body))
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"is\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<main>\n{body}</main>\n</body>\n</html>\n",
        escape_html(title)
    )
}

fn render_errors(out: &mut String, errors: &[FieldError]) {
    if errors.is_empty() {
        return;
    }
    out.push_str("<ul class=\"errors\">\n");
    for e in errors {
        let _ = writeln!(out, "<li data-field=\"{}\">{}</li>", e.field, escape_html(e.msg));
    }
    out.push_str("</ul>\n");
}

fn render_form(out: &mut String, form: &SignatureForm) {
    let checked = if parse_flag(form.anonymous.as_deref()) { " checked" } else { "" };
    let _ = write!(
        out,
        concat!(
            "<form method=\"post\" action=\"/\">\n",
            "<label>Nafn <input type=\"text\" name=\"name\" value=\"{name}\"></label>\n",
            "<label>Kennitala <input type=\"text\" name=\"nationalId\" value=\"{national_id}\"></label>\n",
            "<label>Athugasemd <textarea name=\"comment\">{comment}</textarea></label>\n",
            "<label><input type=\"checkbox\" name=\"anonymous\"{checked}> Ekki birta nafn á lista</label>\n",
            "<button>Skrifa undir</button>\n",
            "</form>\n"
        ),
        name = escape_html(&form.name),
        national_id = escape_html(&form.national_id),
        comment = escape_html(&form.comment),
        checked = checked,
    );
}

fn render_signatures(out: &mut String, listing: &Listing) {
    let _ = writeln!(out, "<p class=\"counted\">Fjöldi undirskrifta: {}</p>", listing.counted);
    if listing.signatures.is_empty() {
        out.push_str("<p>Engar undirskriftir.</p>\n");
    } else {
        out.push_str("<table>\n<tr><th>Dags</th><th>Nafn</th><th>Athugasemd</th></tr>\n");
        for sig in &listing.signatures {
            render_row(out, sig);
        }
        out.push_str("</table>\n");
    }

    out.push_str("<nav class=\"pages\">\n");
    let links = &listing.links;
    if let Some(prev) = &links.prev {
        let _ = writeln!(out, "<a rel=\"prev\" href=\"{}\">Fyrri síða</a>", escape_html(&prev.href));
    }
    let _ = writeln!(
        out,
        "<a rel=\"self\" href=\"{}\">{}–{}</a>",
        escape_html(&links.self_link.href),
        listing.pagination.offset,
        listing.pagination.offset.saturating_add(listing.signatures.len() as u64)
    );
    if let Some(next) = &links.next {
        let _ = writeln!(out, "<a rel=\"next\" href=\"{}\">Næsta síða</a>", escape_html(&next.href));
    }
    out.push_str("</nav>\n");
}

fn render_row(out: &mut String, sig: &Signature) {
    let name = if sig.anonymous { ANONYMOUS_LABEL } else { sig.name.as_str() };
    let _ = writeln!(
        out,
        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
        sig.created_at.format("%d.%m.%Y"),
        name,
        sig.comment
    );
}
