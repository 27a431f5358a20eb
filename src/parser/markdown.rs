use pulldown_cmark::{CowStr, Event, Options as CmarkOptions, Parser, Tag, html};

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Compiles editor-written markdown into HTML for the blog and about pages.
pub fn render_markdown(markdown_content: &str) -> String {
    let mut options = CmarkOptions::empty();
    options.insert(CmarkOptions::ENABLE_STRIKETHROUGH);
    options.insert(CmarkOptions::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown_content, options);

    // raw html in the source is shown as text, never passed through
    let event_iterator = parser.map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url, false),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url, true),
            title,
            id,
        }),
        other => other,
    });

    let mut html_content = String::new();
    html::push_html(&mut html_content, event_iterator);
    html_content
}

// relative urls and anchors pass, absolute ones only with a known scheme.
// images may also be inline uploads stored as data urls.
fn safe_url(url: CowStr<'_>, image: bool) -> CowStr<'_> {
    // browsers ignore whitespace and control characters inside a scheme
    let squashed: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();

    let allowed = match squashed.split_once(':') {
        // a colon after the first '/', '?' or '#' is part of a relative path
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => {
            LINK_SCHEMES.contains(&scheme) || (image && squashed.starts_with("data:image/"))
        }
        _ => true,
    };

    if allowed {
        url
    } else {
        tracing::debug!(url = %url, "dropped unsafe markdown link");
        CowStr::Borrowed(if image { "" } else { "#" })
    }
}
