//! GitHub-flavored Markdown rendering for the idea buffer.
//!
//! Single newlines become hard line breaks, bare `http(s)://` URLs, `www.`
//! hosts and email addresses become links, and raw HTML is shown as text
//! instead of being interpreted.

use linkify::{LinkFinder, LinkKind};
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};

fn gfm_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Renders Markdown to an HTML fragment. Output depends only on the input.
pub fn render_markdown(markdown: &str) -> String {
    let mut events: Vec<Event<'_>> = Vec::new();
    // Text inside links, images and code is never autolinked.
    let mut link_depth = 0usize;
    let mut code_depth = 0usize;

    for event in TextMergeStream::new(Parser::new_ext(markdown, gfm_options())) {
        match event {
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                link_depth += 1;
                events.push(event);
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
                events.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                code_depth += 1;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                code_depth = code_depth.saturating_sub(1);
                events.push(event);
            }
            Event::Text(text) if link_depth == 0 && code_depth == 0 => {
                push_autolinked(&mut events, text);
            }
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn push_autolinked<'a>(events: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    let links = find_autolinks(&text);
    if links.is_empty() {
        events.push(Event::Text(text));
        return;
    }

    let mut cursor = 0;
    for link in links {
        if link.start > cursor {
            events.push(Event::Text(CowStr::from(text[cursor..link.start].to_string())));
        }
        let label = text[link.start..link.end].to_string();
        events.push(Event::Start(Tag::Link {
            link_type: link.link_type,
            dest_url: CowStr::from(link.href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(CowStr::from(label)));
        events.push(Event::End(TagEnd::Link));
        cursor = link.end;
    }
    if cursor < text.len() {
        events.push(Event::Text(CowStr::from(text[cursor..].to_string())));
    }
}

#[derive(Debug, PartialEq)]
struct Autolink {
    start: usize,
    end: usize,
    link_type: LinkType,
    /// Bare address for emails; the HTML writer adds `mailto:`.
    href: String,
}

const SCHEMES: [&str; 2] = ["https://", "http://"];
const WWW: &str = "www.";

/// GFM extended autolinks: `http(s)://` URLs, `www.` hosts and email addresses.
fn find_autolinks(text: &str) -> Vec<Autolink> {
    let mut finder = LinkFinder::new();
    finder.kinds(&[LinkKind::Url, LinkKind::Email]);
    // Scheme-less hosts are found too, then narrowed to `www.` below.
    finder.url_must_have_scheme(false);

    finder
        .links(text)
        .filter_map(|link| {
            let label = link.as_str();
            let (link_type, href) = match link.kind() {
                LinkKind::Email => (LinkType::Email, label.to_string()),
                LinkKind::Url if SCHEMES.iter().any(|s| starts_with_ignore_case(label, s)) => {
                    (LinkType::Autolink, label.to_string())
                }
                LinkKind::Url if starts_with_ignore_case(label, WWW) => {
                    (LinkType::Autolink, format!("http://{label}"))
                }
                _ => return None,
            };
            Some(Autolink {
                start: link.start(),
                end: link.end(),
                link_type,
                href,
            })
        })
        .collect()
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_line_renders_as_paragraph() {
        assert_eq!(
            render_markdown("Idea: A solar-powered bike lock.\n"),
            "<p>Idea: A solar-powered bike lock.</p>\n"
        );
    }

    #[test]
    fn single_newlines_are_hard_breaks() {
        assert_eq!(
            render_markdown("line one\nline two\n"),
            "<p>line one<br />\nline two</p>\n"
        );
    }

    #[test]
    fn heading_followed_by_list() {
        let html = render_markdown("# Title\n- item one\n- item two\n");
        let heading = html.find("<h1>Title</h1>").expect("heading");
        let list = html.find("<ul>").expect("list");
        assert!(heading < list);
        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains("<li>item one</li>"));
        assert!(html.contains("<li>item two</li>"));
    }

    #[test]
    fn gfm_tables_strikethrough_and_tasks() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn bare_urls_become_links() {
        assert_eq!(
            render_markdown("Visit https://example.com/path.\n"),
            "<p>Visit <a href=\"https://example.com/path\">https://example.com/path</a>.</p>\n"
        );
        assert_eq!(
            render_markdown("See www.example.com today\n"),
            "<p>See <a href=\"http://www.example.com\">www.example.com</a> today</p>\n"
        );
    }

    #[test]
    fn urls_inside_code_and_links_are_left_alone() {
        let html = render_markdown("`https://a.example`\n\n[site](https://b.example)\n");
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains("<code>https://a.example</code>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>\n\nsome <b>bold</b>\n");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let input = "# Plan\nStep https://x.example\n";
        assert_eq!(render_markdown(input), render_markdown(input));
    }

    #[test]
    fn autolink_trims_unbalanced_parenthesis() {
        let links = find_autolinks("(see https://example.com/a_(b))");
        assert_eq!(
            links,
            vec![Autolink {
                start: 5,
                end: 30,
                link_type: LinkType::Autolink,
                href: "https://example.com/a_(b)".to_string(),
            }]
        );
    }

    #[test]
    fn email_addresses_become_mailto_links() {
        assert_eq!(
            render_markdown("Contact founders@example.com today\n"),
            "<p>Contact <a href=\"mailto:founders@example.com\">founders@example.com</a> today</p>\n"
        );
    }

    #[test]
    fn bare_domains_and_other_schemes_are_not_links() {
        assert!(find_autolinks("see example.com/pricing").is_empty());
        assert!(find_autolinks("open ftp://files.example.com").is_empty());
    }

    #[test]
    fn scheme_without_host_is_not_a_link() {
        assert!(find_autolinks("just http:// here").is_empty());
        assert!(find_autolinks("nohttp://x").is_empty());
    }
}
