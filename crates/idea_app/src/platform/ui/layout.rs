//! Static page chrome around the document card.

use super::constants::*;

const STYLESHEET: &str = r#"
:root { color-scheme: light dark; }
body {
  margin: 0; min-height: 100vh; font-family: system-ui, sans-serif;
  background: linear-gradient(135deg, #f8fafc, #eff6ff, #e0e7ff); color: #111827;
}
@media (prefers-color-scheme: dark) {
  body { background: linear-gradient(135deg, #020617, #111827, #0f172a); color: #f9fafb; }
  .card { background: rgba(31, 41, 55, 0.5); border-color: #374151; }
  .tagline, .caption, .footer { color: #d1d5db; }
}
.container { max-width: 56rem; margin: 0 auto; padding: 4rem 1rem; }
header, .footer { text-align: center; }
.badge {
  display: inline-block; padding: 0.5rem 1rem; border-radius: 9999px;
  background: #dbeafe; color: #1d4ed8; font-size: 0.875rem; font-weight: 600;
}
h1.title { font-size: 3.75rem; font-weight: 700; letter-spacing: -0.025em; margin: 1.5rem 0; }
.accent {
  background: linear-gradient(90deg, #2563eb, #1d4ed8, #4f46e5);
  -webkit-background-clip: text; background-clip: text; color: transparent;
}
.tagline { font-size: 1.25rem; color: #4b5563; max-width: 42rem; margin: 0 auto 4rem; }
.card {
  background: #fff; border: 1px solid #f3f4f6; border-radius: 1.5rem;
  box-shadow: 0 25px 50px -12px rgba(0, 0, 0, 0.25); padding: 3rem; min-height: 400px;
}
.loading { display: flex; flex-direction: column; align-items: center; justify-content: center; height: 24rem; }
.spinner {
  width: 4rem; height: 4rem; margin-bottom: 1.5rem; border-radius: 50%;
  border: 4px solid #e5e7eb; border-top-color: #3b82f6; border-right-color: #6366f1;
  animation: spin 1s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.caption { font-size: 1.125rem; font-weight: 500; color: #4b5563; margin: 0; }
.subcaption { font-size: 0.875rem; color: #9ca3af; margin-top: 0.5rem; }
.placeholder { text-align: center; padding: 3rem 0; color: #6b7280; }
.prose { font-size: 1.125rem; line-height: 1.75; }
.prose table { border-collapse: collapse; }
.prose th, .prose td { border: 1px solid #d1d5db; padding: 0.25rem 0.75rem; }
.footer { margin-top: 4rem; font-size: 0.875rem; color: #4b5563; }
"#;

/// Wraps `card` in the full HTML document. `live` adds an auto-refresh.
pub fn page(card: &str, live: bool) -> String {
    let refresh = if live {
        format!("<meta http-equiv=\"refresh\" content=\"{LIVE_REFRESH_SECS}\">\n")
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
{refresh}\
<title>{PAGE_TITLE}</title>\n\
<meta name=\"description\" content=\"{PAGE_DESCRIPTION}\">\n\
<style>{STYLESHEET}</style>\n\
</head>\n\
<body>\n\
<main class=\"container\">\n\
<header>\n\
<span class=\"badge\">{BADGE_TEXT}</span>\n\
<h1 class=\"title\"><span class=\"accent\">{TITLE_ACCENT}</span><br>{TITLE_MAIN}</h1>\n\
<p class=\"tagline\">{TAGLINE}</p>\n\
</header>\n\
<section class=\"card\">\n\
{card}\
</section>\n\
<footer class=\"footer\"><p>{FOOTER_TEXT}</p></footer>\n\
</main>\n\
</body>\n\
</html>\n"
    )
}
